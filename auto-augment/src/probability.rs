use crate::common::*;

/// A probability value within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Probability(R64);

impl Probability {
    pub fn one() -> Self {
        Self(r64(1.0))
    }

    pub fn to_f64(&self) -> f64 {
        self.0.raw()
    }

    /// Draws a uniform value in `[0, 1)` and reports whether it does not exceed this
    /// probability.
    pub fn sample<R>(&self, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        rng.gen::<f64>() <= self.to_f64()
    }
}

impl Serialize for Probability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Probability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Self::try_from(value).map_err(|err| D::Error::custom(format!("{}", err)))
    }
}

impl PartialEq<f64> for Probability {
    fn eq(&self, rhs: &f64) -> bool {
        self.0.raw().eq(rhs)
    }
}

impl AbsDiffEq<f64> for Probability {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &f64, epsilon: Self::Epsilon) -> bool {
        self.0.raw().abs_diff_eq(other, epsilon)
    }
}

impl TryFrom<f64> for Probability {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !(0.0..=1.0).contains(&value) {
            return Err(AugmentError::invalid_argument(format!(
                "probability must be within range [0.0, 1.0], but get {}",
                value
            ))
            .into());
        }
        Ok(Self(r64(value)))
    }
}

impl From<Probability> for f64 {
    fn from(prob: Probability) -> Self {
        prob.0.raw()
    }
}

impl Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

//! The learned sub-policy tables of the fixed-policy strategy.

use crate::{catalogue::Catalogue, common::*, op::Op, probability::Probability};

/// A named table of learned sub-policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AutoAugmentPolicy {
    #[serde(rename = "imagenet")]
    ImageNet,
    #[serde(rename = "cifar10")]
    Cifar10,
    #[serde(rename = "svhn")]
    Svhn,
}

impl AutoAugmentPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ImageNet => "imagenet",
            Self::Cifar10 => "cifar10",
            Self::Svhn => "svhn",
        }
    }

    /// Builds the 25 sub-policies of this table.
    ///
    /// Each step is checked against `catalogue`: its operation must be listed, and it
    /// carries a bin index below `bins` exactly when the operation takes a magnitude.
    pub fn sub_policies(&self, catalogue: &Catalogue, bins: usize) -> Result<Vec<SubPolicy>> {
        let table = match self {
            Self::ImageNet => &IMAGENET,
            Self::Cifar10 => &CIFAR10,
            Self::Svhn => &SVHN,
        };

        table
            .iter()
            .map(|[first, second]| -> Result<_> {
                let first = PolicyStep::from_raw(*first, catalogue, bins)?;
                let second = PolicyStep::from_raw(*second, catalogue, bins)?;
                Ok(SubPolicy([first, second]))
            })
            .try_collect()
    }
}

impl Default for AutoAugmentPolicy {
    fn default() -> Self {
        Self::ImageNet
    }
}

impl Display for AutoAugmentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AutoAugmentPolicy {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let policy = match name.to_ascii_lowercase().as_str() {
            "imagenet" => Self::ImageNet,
            "cifar10" => Self::Cifar10,
            "svhn" => Self::Svhn,
            _ => return Err(AugmentError::UnrecognizedPolicy(name.to_string()).into()),
        };
        Ok(policy)
    }
}

impl<'de> Deserialize<'de> for AutoAugmentPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        let policy = Self::from_str(&text).map_err(|err| D::Error::custom(format!("{}", err)))?;
        Ok(policy)
    }
}

/// One operation of a sub-policy, applied with a fixed probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyStep {
    pub op: Op,
    pub probability: Probability,
    /// The magnitude bin, absent for magnitude-free operations.
    pub bin: Option<usize>,
}

impl PolicyStep {
    fn from_raw((op, probability, bin): RawStep, catalogue: &Catalogue, bins: usize) -> Result<Self> {
        let entry = catalogue.lookup(op)?;
        match (entry.scale.is_constant(), bin) {
            (true, None) => {}
            (false, Some(bin)) if bin < bins => {}
            _ => {
                return Err(AugmentError::invalid_argument(format!(
                    "invalid bin {:?} for the {} step",
                    bin, op
                ))
                .into())
            }
        }

        Ok(Self {
            op,
            probability: Probability::try_from(probability)?,
            bin,
        })
    }
}

/// A pair of steps applied in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubPolicy(pub [PolicyStep; 2]);

impl SubPolicy {
    pub fn steps(&self) -> &[PolicyStep; 2] {
        &self.0
    }
}

type RawStep = (Op, f64, Option<usize>);

const IMAGENET: [[RawStep; 2]; 25] = [
    [(Op::Posterize, 0.4, Some(8)), (Op::Rotate, 0.6, Some(9))],
    [(Op::Solarize, 0.6, Some(5)), (Op::AutoContrast, 0.6, None)],
    [(Op::Equalize, 0.8, None), (Op::Equalize, 0.6, None)],
    [(Op::Posterize, 0.6, Some(7)), (Op::Posterize, 0.6, Some(6))],
    [(Op::Equalize, 0.4, None), (Op::Solarize, 0.2, Some(4))],
    [(Op::Equalize, 0.4, None), (Op::Rotate, 0.8, Some(8))],
    [(Op::Solarize, 0.6, Some(3)), (Op::Equalize, 0.6, None)],
    [(Op::Posterize, 0.8, Some(5)), (Op::Equalize, 1.0, None)],
    [(Op::Rotate, 0.2, Some(3)), (Op::Solarize, 0.6, Some(8))],
    [(Op::Equalize, 0.6, None), (Op::Posterize, 0.4, Some(6))],
    [(Op::Rotate, 0.8, Some(8)), (Op::Color, 0.4, Some(0))],
    [(Op::Rotate, 0.4, Some(9)), (Op::Equalize, 0.6, None)],
    [(Op::Equalize, 0.0, None), (Op::Equalize, 0.8, None)],
    [(Op::Invert, 0.6, None), (Op::Equalize, 1.0, None)],
    [(Op::Color, 0.6, Some(4)), (Op::Contrast, 1.0, Some(8))],
    [(Op::Rotate, 0.8, Some(8)), (Op::Color, 1.0, Some(2))],
    [(Op::Color, 0.8, Some(8)), (Op::Solarize, 0.8, Some(7))],
    [(Op::Sharpness, 0.4, Some(7)), (Op::Invert, 0.6, None)],
    [(Op::ShearX, 0.6, Some(5)), (Op::Equalize, 1.0, None)],
    [(Op::Color, 0.4, Some(0)), (Op::Equalize, 0.6, None)],
    [(Op::Equalize, 0.4, None), (Op::Solarize, 0.2, Some(4))],
    [(Op::Solarize, 0.6, Some(5)), (Op::AutoContrast, 0.6, None)],
    [(Op::Invert, 0.6, None), (Op::Equalize, 1.0, None)],
    [(Op::Color, 0.6, Some(4)), (Op::Contrast, 1.0, Some(8))],
    [(Op::Equalize, 0.8, None), (Op::Equalize, 0.6, None)],
];

const CIFAR10: [[RawStep; 2]; 25] = [
    [(Op::Invert, 0.1, None), (Op::Contrast, 0.2, Some(6))],
    [(Op::Rotate, 0.7, Some(2)), (Op::TranslateX, 0.3, Some(9))],
    [(Op::Sharpness, 0.8, Some(1)), (Op::Sharpness, 0.9, Some(3))],
    [(Op::ShearY, 0.5, Some(8)), (Op::TranslateY, 0.7, Some(9))],
    [(Op::AutoContrast, 0.5, None), (Op::Equalize, 0.9, None)],
    [(Op::ShearY, 0.2, Some(7)), (Op::Posterize, 0.3, Some(7))],
    [(Op::Color, 0.4, Some(3)), (Op::Brightness, 0.6, Some(7))],
    [(Op::Sharpness, 0.3, Some(9)), (Op::Brightness, 0.7, Some(9))],
    [(Op::Equalize, 0.6, None), (Op::Equalize, 0.5, None)],
    [(Op::Contrast, 0.6, Some(7)), (Op::Sharpness, 0.6, Some(5))],
    [(Op::Color, 0.7, Some(7)), (Op::TranslateX, 0.5, Some(8))],
    [(Op::Equalize, 0.3, None), (Op::AutoContrast, 0.4, None)],
    [(Op::TranslateY, 0.4, Some(3)), (Op::Sharpness, 0.2, Some(6))],
    [(Op::Brightness, 0.9, Some(6)), (Op::Color, 0.2, Some(8))],
    [(Op::Solarize, 0.5, Some(2)), (Op::Invert, 0.0, None)],
    [(Op::Equalize, 0.2, None), (Op::AutoContrast, 0.6, None)],
    [(Op::Equalize, 0.2, None), (Op::Equalize, 0.6, None)],
    [(Op::Color, 0.9, Some(9)), (Op::Equalize, 0.6, None)],
    [(Op::AutoContrast, 0.8, None), (Op::Solarize, 0.2, Some(8))],
    [(Op::Brightness, 0.1, Some(3)), (Op::Color, 0.7, Some(0))],
    [(Op::Solarize, 0.4, Some(5)), (Op::AutoContrast, 0.9, None)],
    [(Op::TranslateY, 0.9, Some(9)), (Op::TranslateY, 0.7, Some(9))],
    [(Op::AutoContrast, 0.9, None), (Op::Solarize, 0.8, Some(3))],
    [(Op::Equalize, 0.8, None), (Op::Invert, 0.1, None)],
    [(Op::TranslateY, 0.7, Some(9)), (Op::AutoContrast, 0.9, None)],
];

const SVHN: [[RawStep; 2]; 25] = [
    [(Op::ShearX, 0.9, Some(4)), (Op::Invert, 0.2, None)],
    [(Op::ShearY, 0.9, Some(8)), (Op::Invert, 0.7, None)],
    [(Op::Equalize, 0.6, None), (Op::Solarize, 0.6, Some(6))],
    [(Op::Invert, 0.9, None), (Op::Equalize, 0.6, None)],
    [(Op::Equalize, 0.6, None), (Op::Rotate, 0.9, Some(3))],
    [(Op::ShearX, 0.9, Some(4)), (Op::AutoContrast, 0.8, None)],
    [(Op::ShearY, 0.9, Some(8)), (Op::Invert, 0.4, None)],
    [(Op::ShearY, 0.9, Some(5)), (Op::Solarize, 0.2, Some(6))],
    [(Op::Invert, 0.9, None), (Op::AutoContrast, 0.8, None)],
    [(Op::Equalize, 0.6, None), (Op::Rotate, 0.9, Some(3))],
    [(Op::ShearX, 0.9, Some(4)), (Op::Solarize, 0.3, Some(3))],
    [(Op::ShearY, 0.8, Some(8)), (Op::Invert, 0.7, None)],
    [(Op::Equalize, 0.9, None), (Op::TranslateY, 0.6, Some(6))],
    [(Op::Invert, 0.9, None), (Op::Equalize, 0.6, None)],
    [(Op::Contrast, 0.3, Some(3)), (Op::Rotate, 0.8, Some(4))],
    [(Op::Invert, 0.8, None), (Op::TranslateY, 0.0, Some(2))],
    [(Op::ShearY, 0.7, Some(6)), (Op::Solarize, 0.4, Some(8))],
    [(Op::Invert, 0.6, None), (Op::Rotate, 0.8, Some(4))],
    [(Op::ShearY, 0.3, Some(7)), (Op::TranslateX, 0.9, Some(3))],
    [(Op::ShearX, 0.1, Some(6)), (Op::Invert, 0.6, None)],
    [(Op::Solarize, 0.7, Some(2)), (Op::TranslateY, 0.6, Some(7))],
    [(Op::ShearY, 0.8, Some(4)), (Op::Invert, 0.8, None)],
    [(Op::ShearX, 0.7, Some(9)), (Op::TranslateY, 0.8, Some(3))],
    [(Op::ShearY, 0.8, Some(5)), (Op::AutoContrast, 0.7, None)],
    [(Op::ShearX, 0.7, Some(2)), (Op::Invert, 0.1, None)],
];

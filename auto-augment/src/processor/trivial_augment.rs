use crate::{
    augment::Augment, catalogue::Catalogue, common::*, dispatch::apply_op,
    magnitude::SamplingParams,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TrivialAugmentWideInit {
    pub num_magnitude_bins: usize,
    pub interpolation: Interpolation,
    pub fill: Fill,
}

impl TrivialAugmentWideInit {
    pub fn build(self) -> Result<TrivialAugmentWide> {
        let Self {
            num_magnitude_bins,
            interpolation,
            fill,
        } = self;

        ensure!(
            num_magnitude_bins >= 1,
            AugmentError::invalid_argument("num_magnitude_bins must be positive")
        );
        fill.validate()
            .map_err(|err| AugmentError::invalid_argument(format!("{}", err)))?;

        Ok(TrivialAugmentWide {
            num_magnitude_bins,
            catalogue: Catalogue::trivial_augment_wide(),
            interpolation,
            fill,
        })
    }
}

impl Default for TrivialAugmentWideInit {
    fn default() -> Self {
        Self {
            num_magnitude_bins: 31,
            interpolation: Interpolation::Nearest,
            fill: Fill::default(),
        }
    }
}

#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct TrivialAugmentWide {
    #[getset(get_copy = "pub")]
    num_magnitude_bins: usize,
    catalogue: Catalogue,
    #[getset(get_copy = "pub")]
    interpolation: Interpolation,
    #[getset(get = "pub")]
    fill: Fill,
}

impl Augment for TrivialAugmentWide {
    fn forward<R>(&self, image: &Tensor, rng: &mut R) -> Result<Tensor>
    where
        R: Rng + ?Sized,
    {
        tch::no_grad(|| {
            let params = SamplingParams::from_image(image)?;
            let bins = self.num_magnitude_bins;

            let entry = self.catalogue.random_entry(rng);
            let magnitude = params.random_magnitude(entry, bins, bins, rng)?;
            debug!("apply {} with magnitude {}", entry.op, magnitude);
            apply_op(image, entry.op, magnitude, self.interpolation, &self.fill)
        })
    }
}

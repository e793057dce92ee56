use crate::{
    augment::Augment, catalogue::Catalogue, common::*, dispatch::apply_op,
    magnitude::SamplingParams,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RandAugmentInit {
    pub num_ops: usize,
    pub magnitude: usize,
    pub num_magnitude_bins: usize,
    pub interpolation: Interpolation,
    pub fill: Fill,
}

impl RandAugmentInit {
    pub fn build(self) -> Result<RandAugment> {
        let Self {
            num_ops,
            magnitude,
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

        Ok(RandAugment {
            num_ops,
            magnitude,
            num_magnitude_bins,
            catalogue: Catalogue::rand_augment(),
            interpolation,
            fill,
        })
    }
}

impl Default for RandAugmentInit {
    fn default() -> Self {
        Self {
            num_ops: 2,
            magnitude: 9,
            num_magnitude_bins: 31,
            interpolation: Interpolation::Nearest,
            fill: Fill::default(),
        }
    }
}

#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct RandAugment {
    #[getset(get_copy = "pub")]
    num_ops: usize,
    /// Kept for configuration compatibility. Bins are drawn uniformly at random.
    #[getset(get_copy = "pub")]
    magnitude: usize,
    #[getset(get_copy = "pub")]
    num_magnitude_bins: usize,
    catalogue: Catalogue,
    #[getset(get_copy = "pub")]
    interpolation: Interpolation,
    #[getset(get = "pub")]
    fill: Fill,
}

impl Augment for RandAugment {
    fn forward<R>(&self, image: &Tensor, rng: &mut R) -> Result<Tensor>
    where
        R: Rng + ?Sized,
    {
        tch::no_grad(|| {
            let params = SamplingParams::from_image(image)?;
            let bins = self.num_magnitude_bins;

            (0..self.num_ops).try_fold(image.shallow_clone(), |image, _| -> Result<_> {
                let entry = self.catalogue.random_entry(rng);
                let magnitude = params.random_magnitude(entry, bins, bins, rng)?;
                apply_op(&image, entry.op, magnitude, self.interpolation, &self.fill)
            })
        })
    }
}

use crate::{
    augment::Augment,
    catalogue::Catalogue,
    common::*,
    dispatch::apply_op,
    magnitude::SamplingParams,
    policy::{AutoAugmentPolicy, SubPolicy},
};

pub const AUTO_AUGMENT_BINS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoAugmentInit {
    pub policy: AutoAugmentPolicy,
    pub interpolation: Interpolation,
    pub fill: Fill,
}

impl AutoAugmentInit {
    pub fn build(self) -> Result<AutoAugment> {
        let Self {
            policy,
            interpolation,
            fill,
        } = self;

        fill.validate()
            .map_err(|err| AugmentError::invalid_argument(format!("{}", err)))?;
        let catalogue = Catalogue::auto_augment();
        let sub_policies = policy.sub_policies(&catalogue, AUTO_AUGMENT_BINS)?;

        Ok(AutoAugment {
            policy,
            sub_policies,
            catalogue,
            interpolation,
            fill,
        })
    }
}

impl Default for AutoAugmentInit {
    fn default() -> Self {
        Self {
            policy: AutoAugmentPolicy::ImageNet,
            interpolation: Interpolation::Nearest,
            fill: Fill::default(),
        }
    }
}

#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct AutoAugment {
    #[getset(get_copy = "pub")]
    policy: AutoAugmentPolicy,
    #[getset(get = "pub")]
    sub_policies: Vec<SubPolicy>,
    catalogue: Catalogue,
    #[getset(get_copy = "pub")]
    interpolation: Interpolation,
    #[getset(get = "pub")]
    fill: Fill,
}

impl AutoAugment {
    pub fn apply_sub_policy<R>(
        &self,
        image: &Tensor,
        sub_policy: &SubPolicy,
        rng: &mut R,
    ) -> Result<Tensor>
    where
        R: Rng + ?Sized,
    {
        let params = SamplingParams::from_image(image)?;

        sub_policy
            .steps()
            .iter()
            .try_fold(image.shallow_clone(), |image, step| -> Result<_> {
                if !step.probability.sample(rng) {
                    trace!("skip {}", step.op);
                    return Ok(image);
                }

                let entry = self.catalogue.lookup(step.op)?;
                let magnitude = params.magnitude(
                    entry,
                    AUTO_AUGMENT_BINS,
                    step.bin.unwrap_or_default(),
                    rng,
                )?;
                apply_op(&image, step.op, magnitude, self.interpolation, &self.fill)
            })
    }
}

impl Augment for AutoAugment {
    fn forward<R>(&self, image: &Tensor, rng: &mut R) -> Result<Tensor>
    where
        R: Rng + ?Sized,
    {
        tch::no_grad(|| {
            let index = rng.gen_range(0..self.sub_policies.len());
            debug!("apply sub-policy {} of the {} policy", index, self.policy);
            self.apply_sub_policy(image, &self.sub_policies[index], rng)
        })
    }
}

//! Serializable strategy selection.

use crate::{
    augment::Augment,
    common::*,
    processor::{
        AugMix, AugMixInit, AutoAugment, AutoAugmentInit, RandAugment, RandAugmentInit,
        TrivialAugmentWide, TrivialAugmentWideInit,
    },
};

/// The configuration of one augmentation strategy, tagged by its `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AugmentConfig {
    AutoAugment(AutoAugmentInit),
    RandAugment(RandAugmentInit),
    TrivialAugmentWide(TrivialAugmentWideInit),
    AugMix(AugMixInit),
}

impl AugmentConfig {
    pub fn build(self) -> Result<Augmenter> {
        let augmenter = match self {
            Self::AutoAugment(init) => Augmenter::AutoAugment(init.build()?),
            Self::RandAugment(init) => Augmenter::RandAugment(init.build()?),
            Self::TrivialAugmentWide(init) => Augmenter::TrivialAugmentWide(init.build()?),
            Self::AugMix(init) => Augmenter::AugMix(init.build()?),
        };
        Ok(augmenter)
    }
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self::AutoAugment(AutoAugmentInit::default())
    }
}

/// A built strategy of any kind.
#[derive(Debug, Clone)]
pub enum Augmenter {
    AutoAugment(AutoAugment),
    RandAugment(RandAugment),
    TrivialAugmentWide(TrivialAugmentWide),
    AugMix(AugMix),
}

impl Augmenter {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AutoAugment(_) => "AutoAugment",
            Self::RandAugment(_) => "RandAugment",
            Self::TrivialAugmentWide(_) => "TrivialAugmentWide",
            Self::AugMix(_) => "AugMix",
        }
    }
}

impl Augment for Augmenter {
    fn forward<R>(&self, image: &Tensor, rng: &mut R) -> Result<Tensor>
    where
        R: Rng + ?Sized,
    {
        match self {
            Self::AutoAugment(augment) => augment.forward(image, rng),
            Self::RandAugment(augment) => augment.forward(image, rng),
            Self::TrivialAugmentWide(augment) => augment.forward(image, rng),
            Self::AugMix(augment) => augment.forward(image, rng),
        }
    }
}

impl From<AutoAugment> for Augmenter {
    fn from(augment: AutoAugment) -> Self {
        Self::AutoAugment(augment)
    }
}

impl From<RandAugment> for Augmenter {
    fn from(augment: RandAugment) -> Self {
        Self::RandAugment(augment)
    }
}

impl From<TrivialAugmentWide> for Augmenter {
    fn from(augment: TrivialAugmentWide) -> Self {
        Self::TrivialAugmentWide(augment)
    }
}

impl From<AugMix> for Augmenter {
    fn from(augment: AugMix) -> Self {
        Self::AugMix(augment)
    }
}

//! Stochastic image augmentation policies.
//!
//! The crate provides four strategies over a shared set of image operations.
//!
//! - [AutoAugment](processor::AutoAugment) applies learned sub-policies.
//! - [RandAugment](processor::RandAugment) chains uniformly drawn operations.
//! - [TrivialAugmentWide](processor::TrivialAugmentWide) applies one operation with a
//!   wide magnitude range.
//! - [AugMix](processor::AugMix) blends augmentation chains with the original image.
//!
//! All strategies draw randomness from a caller-provided [rand::Rng].

mod common;
pub mod augment;
pub mod catalogue;
pub mod config;
pub mod dirichlet;
pub mod dispatch;
pub mod error;
pub mod magnitude;
pub mod op;
pub mod policy;
pub mod probability;
pub mod processor;

pub use augment::{Augment, Sample};
pub use config::{AugmentConfig, Augmenter};
pub use error::AugmentError;
pub use op::Op;
pub use policy::AutoAugmentPolicy;
pub use tch_goodies::{Fill, Interpolation};

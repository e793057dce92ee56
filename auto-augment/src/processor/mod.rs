//! The augmentation strategies.

pub mod aug_mix;
pub mod auto_augment;
pub mod rand_augment;
pub mod trivial_augment;

pub use aug_mix::*;
pub use auto_augment::*;
pub use rand_augment::*;
pub use trivial_augment::*;

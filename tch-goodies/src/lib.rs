//! Tensor image operations used by the augmentation engine.
//!
//! Images are tensors of shape `[..., C, H, W]`. Integer images use the `0..=255`
//! value range, floating point images use `0.0..=1.0`.

mod common;
pub mod fill;
pub mod geometry;
pub mod photometric;
pub mod raster;
mod utils;

pub use fill::*;
pub use geometry::*;
pub use photometric::*;
pub use raster::*;
pub use utils::max_value;

pub use anyhow::{bail, ensure, format_err, Context, Error, Result};
pub use image::{DynamicImage, GenericImageView, ImageBuffer, Pixel};
pub use itertools::{iproduct, Itertools};
pub use log::trace;
pub use noisy_float::prelude::*;
pub use serde::{Deserialize, Serialize};
pub use tch::{Device, Kind, Tensor};

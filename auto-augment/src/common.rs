pub use crate::error::AugmentError;
pub use anyhow::{ensure, Error, Result};
pub use approx::AbsDiffEq;
pub use getset::{CopyGetters, Getters};
pub use image::DynamicImage;
pub use itertools::Itertools as _;
pub use log::{debug, trace};
pub use noisy_float::prelude::*;
pub use rand::prelude::*;
pub use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
pub use std::{
    convert::TryFrom,
    fmt::{self, Display},
    str::FromStr,
};
pub use tch::{Device, Kind, Tensor};
pub use tch_goodies::{Fill, Interpolation};

pub use anyhow::{bail, ensure, Context as _, Result};
pub use log::info;
pub use serde::{Deserialize, Serialize};
pub use std::{
    fs,
    path::{Path, PathBuf},
};

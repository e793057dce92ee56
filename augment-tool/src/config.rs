use crate::common::*;
use auto_augment::AugmentConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// The augmentation strategy and its options.
    pub augment: AugmentConfig,
    /// Seeds the random generator. Draws from system entropy if absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// The number of augmented copies written per input image.
    #[serde(default = "default_num_outputs")]
    pub num_outputs: usize,
    pub output_dir: PathBuf,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }
}

fn default_num_outputs() -> usize {
    1
}

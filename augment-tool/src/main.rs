use anyhow::{Context, Result};
use augment_tool::config::Config;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, Clone, StructOpt)]
/// Write randomly augmented copies of images
struct Args {
    #[structopt(long, default_value = "augment.json5")]
    /// configuration file
    pub config_file: PathBuf,
    /// input image files
    pub input_files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    // parse arguments
    let Args {
        config_file,
        input_files,
    } = Args::from_args();
    let config = Config::open(&config_file)
        .with_context(|| format!("failed to load config file '{}'", config_file.display()))?;

    augment_tool::start(&config, &input_files)?;

    Ok(())
}

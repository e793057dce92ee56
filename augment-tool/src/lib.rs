//! Applies an augmentation strategy to image files.

mod common;
pub mod config;

use crate::{common::*, config::Config};
use auto_augment::{Augment, Sample};
use image::DynamicImage;
use rand::prelude::*;

/// Writes `num_outputs` augmented copies of each input image into the output
/// directory, named `<stem>_<index>.png`. Returns the written paths.
pub fn start(config: &Config, input_files: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let Config {
        augment,
        seed,
        num_outputs,
        output_dir,
    } = config;
    ensure!(*num_outputs > 0, "num_outputs must be positive");

    let augmenter = augment.clone().build()?;
    let mut rng = match *seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "failed to create output directory '{}'",
            output_dir.display()
        )
    })?;
    info!("augment {} images with {}", input_files.len(), augmenter.name());

    let mut output_files = vec![];

    for input_file in input_files {
        let image = image::open(input_file)
            .with_context(|| format!("failed to open image '{}'", input_file.display()))?;
        // color operations accept gray or RGB images only
        let image = match image {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image,
            image => DynamicImage::ImageRgb8(image.to_rgb8()),
        };
        let stem = input_file
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("image");

        for index in 0..*num_outputs {
            let output = match augmenter.augment::<(), _>(Sample::Raster(image.clone()), &mut rng)? {
                Sample::Raster(output) => output,
                _ => bail!("the augmented sample is not a raster image"),
            };

            let output_file = output_dir.join(format!("{}_{}.png", stem, index));
            output
                .save(&output_file)
                .with_context(|| format!("failed to write image '{}'", output_file.display()))?;
            output_files.push(output_file);
        }

        info!("augmented '{}'", input_file.display());
    }

    Ok(output_files)
}

//! Applies a named operation with a sampled magnitude to an image.

use crate::{common::*, op::Op};
use tch_goodies::{
    adjust_brightness, adjust_contrast, adjust_saturation, adjust_sharpness, affine,
    autocontrast, equalize, invert, max_value, posterize, rotate, solarize, AffineParams,
};

/// Converts a translation magnitude to whole pixels, truncating toward zero.
pub fn translation_pixels(magnitude: f64) -> i64 {
    magnitude.trunc() as i64
}

/// Applies `op` to an image of shape `[..., C, H, W]`.
///
/// Shear magnitudes are in radians, translations in pixels, rotations in degrees.
/// Color adjustments take the factor offset from 1. Posterize takes the bit depth and
/// Solarize the threshold on the 8-bit scale. Interpolation and fill only affect
/// geometric operations. The input is never modified.
pub fn apply_op(
    image: &Tensor,
    op: Op,
    magnitude: f64,
    interpolation: Interpolation,
    fill: &Fill,
) -> Result<Tensor> {
    ensure!(
        magnitude.is_finite(),
        AugmentError::invalid_argument(format!("{} magnitude must be finite", op))
    );
    let bound = max_value(image.kind())
        .map_err(|err| AugmentError::invalid_argument(format!("{}", err)))?;
    if op.is_geometric() {
        check_fill(image, fill)?;
    }
    trace!("apply {} with magnitude {}", op, magnitude);

    let output = match op {
        Op::Identity => image.shallow_clone(),
        Op::ShearX => affine(
            image,
            &AffineParams::shear(magnitude.to_degrees(), 0.0),
            interpolation,
            fill,
        )?,
        Op::ShearY => affine(
            image,
            &AffineParams::shear(0.0, magnitude.to_degrees()),
            interpolation,
            fill,
        )?,
        Op::TranslateX => affine(
            image,
            &AffineParams::translation(translation_pixels(magnitude) as f64, 0.0),
            interpolation,
            fill,
        )?,
        Op::TranslateY => affine(
            image,
            &AffineParams::translation(0.0, translation_pixels(magnitude) as f64),
            interpolation,
            fill,
        )?,
        Op::Rotate => rotate(image, magnitude, interpolation, fill)?,
        Op::Brightness => adjust_brightness(image, 1.0 + magnitude)?,
        Op::Color => adjust_saturation(image, 1.0 + magnitude)?,
        Op::Contrast => adjust_contrast(image, 1.0 + magnitude)?,
        Op::Sharpness => adjust_sharpness(image, 1.0 + magnitude)?,
        Op::Posterize => {
            ensure!(
                (0.0..9.0).contains(&magnitude),
                AugmentError::invalid_argument(format!(
                    "posterize bits must be within 0..=8, but get {}",
                    magnitude
                ))
            );
            posterize(image, magnitude as u8)?
        }
        Op::Solarize => {
            ensure!(
                (0.0..=255.0).contains(&magnitude),
                AugmentError::invalid_argument(format!(
                    "solarize threshold must be within 0..=255, but get {}",
                    magnitude
                ))
            );
            let threshold = if bound == 255.0 {
                magnitude
            } else {
                magnitude / 255.0 * bound
            };
            solarize(image, threshold)?
        }
        Op::AutoContrast => autocontrast(image)?,
        Op::Equalize => equalize(image)?,
        Op::Invert => invert(image)?,
    };

    Ok(output)
}

fn check_fill(image: &Tensor, fill: &Fill) -> Result<()> {
    if let Fill::PerChannel(values) = fill {
        let channels = match image.size().as_slice() {
            [.., channels, _, _] => *channels,
            _ => return Ok(()),
        };
        ensure!(
            values.len() as i64 == channels,
            AugmentError::invalid_argument(format!(
                "the fill has {} values, but the image has {} channels",
                values.len(),
                channels
            ))
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(channels: i64, height: i64, width: i64) -> Tensor {
        Tensor::arange(channels * height * width, (Kind::Int64, Device::Cpu))
            .remainder(256)
            .to_kind(Kind::Uint8)
            .view([channels, height, width])
    }

    #[test]
    fn translation_truncates() -> Result<()> {
        let image = ramp(3, 16, 24);
        let fill = Fill::default();
        let half = apply_op(&image, Op::TranslateX, 10.5, Interpolation::Nearest, &fill)?;
        let whole = apply_op(&image, Op::TranslateX, 10.0, Interpolation::Nearest, &fill)?;
        let next = apply_op(&image, Op::TranslateX, 11.0, Interpolation::Nearest, &fill)?;
        assert!(half.equal(&whole));
        assert!(!half.equal(&next));

        assert_eq!(translation_pixels(-3.9), -3);
        Ok(())
    }

    #[test]
    fn solarize_black_image() -> Result<()> {
        let image = Tensor::zeros(&[3, 224, 224], (Kind::Uint8, Device::Cpu));
        let output = apply_op(
            &image,
            Op::Solarize,
            128.0,
            Interpolation::Nearest,
            &Fill::default(),
        )?;
        assert!(output.equal(&image));
        Ok(())
    }

    #[test]
    fn solarize_scales_float_threshold() -> Result<()> {
        let image = Tensor::of_slice(&[0.25f32, 0.75]).view([1, 1, 2]);
        let output = apply_op(
            &image,
            Op::Solarize,
            127.5,
            Interpolation::Nearest,
            &Fill::default(),
        )?;
        let expect = Tensor::of_slice(&[0.25f32, 0.25]).view([1, 1, 2]);
        assert!(output.allclose(&expect, 1e-6, 1e-6, false));
        Ok(())
    }

    #[test]
    fn magnitude_free_ops_ignore_magnitude() -> Result<()> {
        let image = ramp(3, 8, 8);
        let fill = Fill::default();
        for op in [Op::Identity, Op::AutoContrast, Op::Equalize, Op::Invert] {
            let lhs = apply_op(&image, op, 0.0, Interpolation::Nearest, &fill)?;
            let rhs = apply_op(&image, op, 123.0, Interpolation::Bilinear, &fill)?;
            assert!(lhs.equal(&rhs), "{} depends on the magnitude", op);
        }
        Ok(())
    }

    #[test]
    fn input_is_preserved() -> Result<()> {
        let image = ramp(3, 8, 8);
        let snapshot = image.copy();
        let fill = Fill::scalar(9.0)?;
        for op in Op::ALL {
            let magnitude = match op {
                Op::Posterize => 4.0,
                Op::Solarize => 100.0,
                _ => 0.2,
            };
            let output = apply_op(&image, op, magnitude, Interpolation::Bilinear, &fill)?;
            assert_eq!(output.size(), image.size());
            assert_eq!(output.kind(), Kind::Uint8);
        }
        assert!(image.equal(&snapshot));
        Ok(())
    }

    #[test]
    fn fill_channel_mismatch() -> Result<()> {
        let image = ramp(3, 8, 8);
        let fill = Fill::per_channel(&[1.0, 2.0])?;

        let err = apply_op(&image, Op::Rotate, 10.0, Interpolation::Nearest, &fill).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AugmentError>(),
            Some(AugmentError::InvalidArgument(_))
        ));

        // photometric operations never read the fill
        apply_op(&image, Op::Brightness, 0.5, Interpolation::Nearest, &fill)?;
        Ok(())
    }

    #[test]
    fn reject_unsupported_kind() {
        let image = Tensor::zeros(&[3, 8, 8], (Kind::Int64, Device::Cpu));
        let err = apply_op(
            &image,
            Op::Invert,
            0.0,
            Interpolation::Nearest,
            &Fill::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AugmentError>(),
            Some(AugmentError::InvalidArgument(_))
        ));
    }
}

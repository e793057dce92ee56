//! Color and tone adjustments on image tensors.

use crate::{
    common::*,
    utils::{blend, is_integral, max_value, to_batch},
};

/// Converts an RGB image to a single channel luma image in floating point.
///
/// Single channel images are returned as is.
pub fn rgb_to_grayscale(image: &Tensor) -> Result<Tensor> {
    tch::no_grad(|| -> Result<_> {
        let (batch, shape) = to_batch(image)?;
        let channels = shape[shape.len() - 3];
        let batch = batch.to_kind(Kind::Float);

        let gray = match channels {
            1 => batch,
            3 => {
                let red = batch.narrow(1, 0, 1);
                let green = batch.narrow(1, 1, 1);
                let blue = batch.narrow(1, 2, 1);
                red * 0.2989 + green * 0.587 + blue * 0.114
            }
            _ => bail!("expect 1 or 3 channels, but get {}", channels),
        };

        let mut gray_shape = shape;
        let len = gray_shape.len();
        gray_shape[len - 3] = 1;
        Ok(gray.reshape(&gray_shape))
    })
}

/// Scales the pixel values by `factor`.
pub fn adjust_brightness(image: &Tensor, factor: f64) -> Result<Tensor> {
    ensure!(factor >= 0.0, "brightness factor must be non-negative");
    tch::no_grad(|| -> Result<_> {
        let kind = image.kind();
        let bound = max_value(kind)?;
        let output = (image.to_kind(Kind::Float) * factor).clamp(0.0, bound);
        Ok(output.to_kind(kind))
    })
}

/// Blends the image with its grayscale version. A factor of zero yields the
/// grayscale image.
pub fn adjust_saturation(image: &Tensor, factor: f64) -> Result<Tensor> {
    ensure!(factor >= 0.0, "saturation factor must be non-negative");
    tch::no_grad(|| -> Result<_> {
        let kind = image.kind();
        let bound = max_value(kind)?;
        let (batch, shape) = to_batch(image)?;

        if shape[shape.len() - 3] == 1 {
            return Ok(image.shallow_clone());
        }

        let gray = grayscale_like(&batch, kind)?;
        let output = blend(&batch.to_kind(Kind::Float), &gray, factor, bound);
        Ok(output.to_kind(kind).reshape(&shape))
    })
}

/// Blends the image with the mean of its grayscale version.
pub fn adjust_contrast(image: &Tensor, factor: f64) -> Result<Tensor> {
    ensure!(factor >= 0.0, "contrast factor must be non-negative");
    tch::no_grad(|| -> Result<_> {
        let kind = image.kind();
        let bound = max_value(kind)?;
        let (batch, shape) = to_batch(image)?;

        let mean = grayscale_like(&batch, kind)?.adaptive_avg_pool2d(&[1, 1]);
        let output = blend(&batch.to_kind(Kind::Float), &mean, factor, bound);
        Ok(output.to_kind(kind).reshape(&shape))
    })
}

/// Blends the image with a smoothed version of itself. Border pixels are kept.
pub fn adjust_sharpness(image: &Tensor, factor: f64) -> Result<Tensor> {
    ensure!(factor >= 0.0, "sharpness factor must be non-negative");
    tch::no_grad(|| -> Result<_> {
        let kind = image.kind();
        let bound = max_value(kind)?;
        let (batch, shape) = to_batch(image)?;
        let (_, channels, height, width) = batch.size4()?;

        if batch.numel() == 0 || height <= 2 || width <= 2 {
            return Ok(image.shallow_clone());
        }

        let kernel = {
            let (a, b) = (1.0 / 13.0, 5.0 / 13.0);
            Tensor::of_slice(&[a, a, a, a, b, a, a, a, a])
                .to_kind(Kind::Float)
                .view([1, 1, 3, 3])
                .repeat(&[channels, 1, 1, 1])
                .to_device(image.device())
        };

        let float = batch.to_kind(Kind::Float);
        let blurred = float.conv2d(&kernel, None::<Tensor>, &[1, 1], &[0, 0], &[1, 1], channels);
        let blurred = if is_integral(kind) {
            blurred.round()
        } else {
            blurred
        };

        let inner = float.narrow(2, 1, height - 2).narrow(3, 1, width - 2);
        let blended = blend(&inner, &blurred, factor, bound);

        let output = float.copy();
        output
            .narrow(2, 1, height - 2)
            .narrow(3, 1, width - 2)
            .copy_(&blended);

        Ok(output.clamp(0.0, bound).to_kind(kind).reshape(&shape))
    })
}

/// Keeps the `bits` most significant bits of each 8-bit channel value.
pub fn posterize(image: &Tensor, bits: u8) -> Result<Tensor> {
    ensure!(bits <= 8, "bits must be within 0..=8, but get {}", bits);
    tch::no_grad(|| -> Result<_> {
        let kind = image.kind();
        max_value(kind)?;

        let output = if is_integral(kind) {
            let step = f64::from(1u32 << (8 - bits));
            (image.to_kind(Kind::Float) / step).floor() * step
        } else {
            let levels = f64::from(1u32 << bits);
            (image.to_kind(Kind::Float) * levels)
                .floor()
                .clamp(0.0, (levels - 1.0).max(0.0))
                / levels
        };
        Ok(output.to_kind(kind))
    })
}

/// Inverts all pixel values at or above `threshold`.
pub fn solarize(image: &Tensor, threshold: f64) -> Result<Tensor> {
    tch::no_grad(|| -> Result<_> {
        let kind = image.kind();
        let bound = max_value(kind)?;
        ensure!(
            threshold <= bound,
            "threshold {} exceeds the maximum pixel value {}",
            threshold,
            bound
        );

        let float = image.to_kind(Kind::Float);
        let mask = float.ge(threshold).to_kind(Kind::Float);
        let output = &float * (-&mask + 1.0) + (-&float + bound) * &mask;
        Ok(output.to_kind(kind))
    })
}

/// Stretches each channel so that its darkest pixel becomes 0 and its brightest
/// pixel becomes the maximum value. Constant channels are left unchanged.
pub fn autocontrast(image: &Tensor) -> Result<Tensor> {
    tch::no_grad(|| -> Result<_> {
        let kind = image.kind();
        let bound = max_value(kind)?;
        let (batch, shape) = to_batch(image)?;

        if batch.numel() == 0 {
            return Ok(image.shallow_clone());
        }

        let float = batch.to_kind(Kind::Float);
        let (maximum, _) = float.adaptive_max_pool2d(&[1, 1]);
        let (neg_minimum, _) = (-&float).adaptive_max_pool2d(&[1, 1]);
        let minimum = -neg_minimum;

        let constant = (&maximum - &minimum).le(0.0).to_kind(Kind::Float);
        let range = &maximum - &minimum + &constant * bound;
        let minimum = &minimum * (-&constant + 1.0);

        let output = ((&float - &minimum) * bound / &range).clamp(0.0, bound);
        Ok(output.to_kind(kind).reshape(&shape))
    })
}

/// Equalizes the histogram of each channel on the 8-bit scale.
pub fn equalize(image: &Tensor) -> Result<Tensor> {
    tch::no_grad(|| -> Result<_> {
        let kind = image.kind();
        max_value(kind)?;
        let (batch, shape) = to_batch(image)?;
        let (batch_size, channels, height, width) = batch.size4()?;

        if batch.numel() == 0 {
            return Ok(image.shallow_clone());
        }

        let quantized = if is_integral(kind) {
            batch.shallow_clone()
        } else {
            (batch.to_kind(Kind::Float) * 255.0)
                .round()
                .clamp(0.0, 255.0)
                .to_kind(Kind::Uint8)
        };
        let values: Vec<u8> = quantized.to_device(Device::Cpu).reshape(&[-1]).into();

        let plane_size = (height * width) as usize;
        let equalized: Vec<u8> = values
            .chunks(plane_size)
            .flat_map(equalize_plane)
            .collect();

        let output = Tensor::of_slice(&equalized)
            .view([batch_size, channels, height, width])
            .to_device(image.device());
        let output = if is_integral(kind) {
            output
        } else {
            output.to_kind(Kind::Float) / 255.0
        };
        Ok(output.to_kind(kind).reshape(&shape))
    })
}

/// Inverts all pixel values.
pub fn invert(image: &Tensor) -> Result<Tensor> {
    tch::no_grad(|| -> Result<_> {
        let kind = image.kind();
        let bound = max_value(kind)?;
        let output = -image.to_kind(Kind::Float) + bound;
        Ok(output.to_kind(kind))
    })
}

/// The grayscale version of a batch, truncated to integers for integer kinds.
fn grayscale_like(batch: &Tensor, kind: Kind) -> Result<Tensor> {
    let gray = rgb_to_grayscale(batch)?;
    let gray = if is_integral(kind) { gray.floor() } else { gray };
    Ok(gray)
}

fn equalize_plane(values: &[u8]) -> Vec<u8> {
    let mut histogram = [0i64; 256];
    values
        .iter()
        .for_each(|&value| histogram[value as usize] += 1);

    let last_count = histogram
        .iter()
        .rev()
        .find(|&&count| count != 0)
        .copied()
        .unwrap_or(0);
    let total: i64 = histogram.iter().sum();
    let step = (total - last_count) / 255;

    if step == 0 {
        return values.to_vec();
    }

    // lut[i] counts pixels strictly darker than i
    let mut lut = [0u8; 256];
    let mut cumsum = 0;
    histogram.iter().enumerate().for_each(|(index, &count)| {
        lut[index] = ((cumsum + step / 2) / step).min(255) as u8;
        cumsum += count;
    });

    values.iter().map(|&value| lut[value as usize]).collect()
}

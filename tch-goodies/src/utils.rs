use crate::common::*;

/// The largest pixel value representable by an image of the given kind.
pub fn max_value(kind: Kind) -> Result<f64> {
    let bound = match kind {
        Kind::Uint8 => 255.0,
        Kind::Half | Kind::Float | Kind::Double => 1.0,
        _ => bail!("unsupported image kind {:?}", kind),
    };
    Ok(bound)
}

pub(crate) fn is_integral(kind: Kind) -> bool {
    matches!(kind, Kind::Uint8)
}

/// Flattens the leading dimensions of a `[..., C, H, W]` image into a single batch
/// dimension. Returns the batch and the original shape.
pub(crate) fn to_batch(image: &Tensor) -> Result<(Tensor, Vec<i64>)> {
    let shape = image.size();
    let (channels, height, width) = match shape.as_slice() {
        [.., channels, height, width] => (*channels, *height, *width),
        _ => bail!(
            "expect an image of shape [..., C, H, W], but get {:?}",
            shape
        ),
    };
    let batch = image.reshape(&[-1, channels, height, width]);
    Ok((batch, shape))
}

/// Casts a floating point result back to the image kind, rounding first for integer
/// kinds.
pub(crate) fn round_to_kind(image: Tensor, kind: Kind, bound: f64) -> Tensor {
    if is_integral(kind) {
        image.round().clamp(0.0, bound).to_kind(kind)
    } else {
        image.to_kind(kind)
    }
}

/// Blends two floating point images as `ratio * lhs + (1 - ratio) * rhs`.
pub(crate) fn blend(lhs: &Tensor, rhs: &Tensor, ratio: f64, bound: f64) -> Tensor {
    (lhs * ratio + rhs * (1.0 - ratio)).clamp(0.0, bound)
}

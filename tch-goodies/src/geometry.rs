//! Affine warps on image tensors.

use crate::{
    common::*,
    fill::Fill,
    utils::{max_value, round_to_kind, to_batch},
};

/// Pixel interpolation used when resampling an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    Nearest,
    Bilinear,
    Bicubic,
}

impl Interpolation {
    // See https://github.com/pytorch/pytorch/blob/f597ac6efc70431e66d945c16fa12b767989b032/aten/src/ATen/native/GridSampler.h#L10-L11
    fn grid_sampler_mode(&self) -> i64 {
        match self {
            Self::Bilinear => 0,
            Self::Nearest => 1,
            Self::Bicubic => 2,
        }
    }
}

impl Default for Interpolation {
    fn default() -> Self {
        Self::Nearest
    }
}

/// Parameters of an affine warp around the image center.
///
/// Angles are in degrees. The rotation angle is clockwise, and `shear` holds the
/// horizontal and vertical shear angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineParams {
    pub angle: f64,
    pub translate: [f64; 2],
    pub scale: f64,
    pub shear: [f64; 2],
}

impl AffineParams {
    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            translate: [dx, dy],
            ..Default::default()
        }
    }

    pub fn shear(shear_x: f64, shear_y: f64) -> Self {
        Self {
            shear: [shear_x, shear_y],
            ..Default::default()
        }
    }

    /// Computes the 2x3 matrix that maps output pixel coordinates back to input
    /// coordinates, both relative to the image center.
    pub fn inverse_matrix(&self) -> Result<[f64; 6]> {
        let Self {
            angle,
            translate: [tx, ty],
            scale,
            shear: [shear_x, shear_y],
        } = *self;
        ensure!(scale > 0.0, "scale must be positive, but get {}", scale);

        let rot = angle.to_radians();
        let sx = shear_x.to_radians();
        let sy = shear_y.to_radians();

        // rotation-shear matrix without scaling
        let a = (rot - sy).cos() / sy.cos();
        let b = -(rot - sy).cos() * sx.tan() / sy.cos() - rot.sin();
        let c = (rot - sy).sin() / sy.cos();
        let d = -(rot - sy).sin() * sx.tan() / sy.cos() + rot.cos();

        let mut matrix = [d, -b, 0.0, -c, a, 0.0].map(|val| val / scale);
        matrix[2] += matrix[0] * -tx + matrix[1] * -ty;
        matrix[5] += matrix[3] * -tx + matrix[4] * -ty;

        ensure!(
            matrix.iter().all(|val| val.is_finite()),
            "degenerate affine parameters {:?}",
            self
        );
        Ok(matrix)
    }
}

impl Default for AffineParams {
    fn default() -> Self {
        Self {
            angle: 0.0,
            translate: [0.0, 0.0],
            scale: 1.0,
            shear: [0.0, 0.0],
        }
    }
}

/// Warps the image by an affine transform around its center.
///
/// The output keeps the input shape and kind. Pixels that map outside the input are
/// painted with `fill`.
pub fn affine(
    image: &Tensor,
    params: &AffineParams,
    interpolation: Interpolation,
    fill: &Fill,
) -> Result<Tensor> {
    let matrix = params.inverse_matrix()?;
    warp(image, &matrix, interpolation, fill)
}

/// Rotates the image counter-clockwise by `angle` degrees around its center without
/// expanding the canvas.
pub fn rotate(
    image: &Tensor,
    angle: f64,
    interpolation: Interpolation,
    fill: &Fill,
) -> Result<Tensor> {
    let params = AffineParams {
        angle: -angle,
        ..Default::default()
    };
    affine(image, &params, interpolation, fill)
}

fn warp(
    image: &Tensor,
    matrix: &[f64; 6],
    interpolation: Interpolation,
    fill: &Fill,
) -> Result<Tensor> {
    tch::no_grad(|| -> Result<_> {
        let kind = image.kind();
        let bound = max_value(kind)?;
        let device = image.device();
        let (batch, shape) = to_batch(image)?;
        let (batch_size, channels, height, width) = batch.size4()?;

        if batch.numel() == 0 {
            return Ok(image.shallow_clone());
        }

        trace!("warp {:?} image by matrix {:?}", shape, matrix);

        // append a mask channel to locate out-of-bound pixels after sampling
        let input = Tensor::cat(
            &[
                batch.to_kind(Kind::Float),
                Tensor::ones(&[batch_size, 1, height, width], (Kind::Float, device)),
            ],
            1,
        );
        let grid = affine_grid(matrix, height, width)
            .to_device(device)
            .expand(&[batch_size, height, width, 2], false);
        let sampled = input.grid_sampler(&grid, interpolation.grid_sampler_mode(), 0, false);

        let output = sampled.narrow(1, 0, channels);
        let mask = sampled.narrow(1, channels, 1).expand_as(&output);
        let mask = match interpolation {
            Interpolation::Nearest => mask.ge(0.5).to_kind(Kind::Float),
            _ => mask,
        };
        let fill = fill.to_tensor(channels, device)?;
        let output = &output * &mask + (-&mask + 1.0) * &fill;

        Ok(round_to_kind(output, kind, bound).reshape(&shape))
    })
}

/// Builds the normalized sampling grid of shape `[1, H, W, 2]` for `grid_sampler`
/// with `align_corners = false`.
fn affine_grid(matrix: &[f64; 6], height: i64, width: i64) -> Tensor {
    let half_h = height as f64 * 0.5;
    let half_w = width as f64 * 0.5;

    let grid: Vec<f32> = iproduct!(0..height, 0..width)
        .flat_map(|(row, col)| {
            let x = col as f64 - half_w + 0.5;
            let y = row as f64 - half_h + 0.5;
            let grid_x = (matrix[0] * x + matrix[1] * y + matrix[2]) / half_w;
            let grid_y = (matrix[3] * x + matrix[4] * y + matrix[5]) / half_h;
            [grid_x as f32, grid_y as f32]
        })
        .collect();

    Tensor::of_slice(&grid).view([1, height, width, 2])
}

use crate::common::*;
use tch_goodies::{TryIntoRaster as _, TryIntoTensor as _};

/// A value travelling through an augmentation pipeline.
///
/// Only images are transformed. Anything else, such as labels or bounding boxes,
/// passes through untouched.
#[derive(Debug)]
pub enum Sample<T> {
    /// An image tensor of shape `[..., C, H, W]`.
    Tensor(Tensor),
    /// A decoded raster image.
    Raster(DynamicImage),
    Other(T),
}

impl<T> Sample<T> {
    pub fn is_image(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl<T> From<Tensor> for Sample<T> {
    fn from(tensor: Tensor) -> Self {
        Self::Tensor(tensor)
    }
}

impl<T> From<DynamicImage> for Sample<T> {
    fn from(image: DynamicImage) -> Self {
        Self::Raster(image)
    }
}

/// A stochastic image augmentation.
pub trait Augment {
    /// Augments an image tensor of shape `[..., C, H, W]` with uint8 or floating point
    /// values. All randomness is drawn from `rng`, and the input is never modified.
    fn forward<R>(&self, image: &Tensor, rng: &mut R) -> Result<Tensor>
    where
        R: Rng + ?Sized;

    /// Augments image samples and passes everything else through.
    ///
    /// Raster images are augmented as `[C, H, W]` uint8 tensors and converted back.
    /// The alpha channel of gray-alpha and RGBA rasters is kept as is, and only the
    /// color channels are augmented.
    fn augment<T, R>(&self, sample: Sample<T>, rng: &mut R) -> Result<Sample<T>>
    where
        R: Rng + ?Sized,
    {
        let output = match sample {
            Sample::Tensor(image) => Sample::Tensor(self.forward(&image, rng)?),
            Sample::Raster(image) => {
                let has_alpha = matches!(
                    image,
                    DynamicImage::ImageLumaA8(_) | DynamicImage::ImageRgba8(_)
                );
                let tensor = image.try_into_tensor()?;
                let output = if has_alpha {
                    let channels = tensor.size()[0];
                    let color = tensor.narrow(0, 0, channels - 1).contiguous();
                    let alpha = tensor.narrow(0, channels - 1, 1);
                    let color = self.forward(&color, rng)?;
                    Tensor::cat(&[color, alpha], 0)
                } else {
                    self.forward(&tensor, rng)?
                };
                Sample::Raster(output.try_into_raster()?)
            }
            Sample::Other(other) => Sample::Other(other),
        };
        Ok(output)
    }
}

//! Conversions between raster images and `[C, H, W]` uint8 tensors.

use crate::common::*;

pub trait IntoTensor {
    fn into_tensor(self) -> Tensor;
}

impl<P> IntoTensor for &ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    fn into_tensor(self) -> Tensor {
        let (width, height) = self.dimensions();
        let channels = P::CHANNEL_COUNT as i64;

        // the raw buffer is laid out in HWC order
        Tensor::of_slice(self.as_raw())
            .view([height as i64, width as i64, channels])
            .permute(&[2, 0, 1])
            .contiguous()
    }
}

pub trait TryIntoTensor {
    type Error;

    fn try_into_tensor(self) -> Result<Tensor, Self::Error>;
}

impl TryIntoTensor for &DynamicImage {
    type Error = Error;

    fn try_into_tensor(self) -> Result<Tensor, Self::Error> {
        let (width, height) = self.dimensions();
        ensure!(
            width > 0 && height > 0,
            "image dimensions must be positive, but get {}x{}",
            width,
            height
        );

        let tensor = match self {
            DynamicImage::ImageLuma8(image) => image.into_tensor(),
            DynamicImage::ImageLumaA8(image) => image.into_tensor(),
            DynamicImage::ImageRgb8(image) => image.into_tensor(),
            DynamicImage::ImageRgba8(image) => image.into_tensor(),
            _ => (&self.to_rgb8()).into_tensor(),
        };
        Ok(tensor)
    }
}

pub trait TryIntoRaster {
    type Error;

    fn try_into_raster(self) -> Result<DynamicImage, Self::Error>;
}

impl TryIntoRaster for &Tensor {
    type Error = Error;

    /// Converts a `[C, H, W]` tensor with 1 to 4 channels into a raster image.
    /// Floating point tensors are rescaled from `0.0..=1.0` to `0..=255`.
    fn try_into_raster(self) -> Result<DynamicImage, Self::Error> {
        let (channels, height, width) = self
            .size3()
            .with_context(|| format!("expect a [C, H, W] image, but get {:?}", self.size()))?;

        let uint8 = match self.kind() {
            Kind::Uint8 => self.shallow_clone(),
            Kind::Half | Kind::Float | Kind::Double => (self.to_kind(Kind::Float) * 255.0)
                .round()
                .clamp(0.0, 255.0)
                .to_kind(Kind::Uint8),
            kind => bail!("unsupported image kind {:?}", kind),
        };
        let data: Vec<u8> = uint8
            .to_device(Device::Cpu)
            .permute(&[1, 2, 0])
            .contiguous()
            .reshape(&[-1])
            .into();

        let (width, height) = (width as u32, height as u32);
        let invalid_buffer = || format_err!("buffer does not match the image size");

        let image = match channels {
            1 => DynamicImage::ImageLuma8(
                ImageBuffer::from_raw(width, height, data).ok_or_else(invalid_buffer)?,
            ),
            2 => DynamicImage::ImageLumaA8(
                ImageBuffer::from_raw(width, height, data).ok_or_else(invalid_buffer)?,
            ),
            3 => DynamicImage::ImageRgb8(
                ImageBuffer::from_raw(width, height, data).ok_or_else(invalid_buffer)?,
            ),
            4 => DynamicImage::ImageRgba8(
                ImageBuffer::from_raw(width, height, data).ok_or_else(invalid_buffer)?,
            ),
            _ => bail!("expect 1 to 4 channels, but get {}", channels),
        };
        Ok(image)
    }
}

//! The pixel value painted into regions uncovered by geometric transforms.

use crate::common::*;

/// Out-of-bound fill value, either one value for all channels or one value per
/// channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fill {
    Scalar(R64),
    PerChannel(Vec<R64>),
}

impl Fill {
    pub fn scalar(value: f64) -> Result<Self> {
        let value = R64::try_new(value).ok_or_else(|| format_err!("fill must be finite"))?;
        Ok(Self::Scalar(value))
    }

    pub fn per_channel(values: &[f64]) -> Result<Self> {
        ensure!(!values.is_empty(), "per-channel fill must not be empty");
        let values: Vec<_> = values
            .iter()
            .map(|&value| R64::try_new(value).ok_or_else(|| format_err!("fill must be finite")))
            .try_collect()?;
        Ok(Self::PerChannel(values))
    }

    /// Checks that the fill is usable by any image.
    pub fn validate(&self) -> Result<()> {
        if let Self::PerChannel(values) = self {
            ensure!(!values.is_empty(), "per-channel fill must not be empty");
        }
        Ok(())
    }

    /// Builds a `[1, C, 1, 1]` tensor that broadcasts over a batch of images.
    pub fn to_tensor(&self, channels: i64, device: Device) -> Result<Tensor> {
        let values: Vec<f32> = match self {
            Self::Scalar(value) => vec![value.raw() as f32; channels as usize],
            Self::PerChannel(values) => {
                ensure!(
                    values.len() as i64 == channels,
                    "the fill has {} values, but the image has {} channels",
                    values.len(),
                    channels
                );
                values.iter().map(|value| value.raw() as f32).collect()
            }
        };
        Ok(Tensor::of_slice(&values)
            .view([1, channels, 1, 1])
            .to_device(device))
    }
}

impl Default for Fill {
    fn default() -> Self {
        Self::Scalar(r64(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_fill() -> Result<()> {
        let scalar: Fill = serde_json::from_str("128")?;
        assert_eq!(scalar, Fill::Scalar(r64(128.0)));

        let per_channel: Fill = serde_json::from_str("[0, 127.5, 255]")?;
        assert_eq!(
            per_channel,
            Fill::PerChannel(vec![r64(0.0), r64(127.5), r64(255.0)])
        );

        assert!(serde_json::from_str::<Fill>("\"white\"").is_err());
        Ok(())
    }

    #[test]
    fn fill_channel_mismatch() -> Result<()> {
        let fill = Fill::per_channel(&[1.0, 2.0])?;
        assert!(fill.to_tensor(3, Device::Cpu).is_err());
        assert_eq!(fill.to_tensor(2, Device::Cpu)?.size(), vec![1, 2, 1, 1]);
        assert!(Fill::per_channel(&[]).is_err());
        assert!(Fill::scalar(f64::NAN).is_err());
        Ok(())
    }
}

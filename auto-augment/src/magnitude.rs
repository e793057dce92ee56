use crate::{catalogue::CatalogueEntry, common::*};

/// Image dimensions the magnitude tables are derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct SamplingParams {
    channels: i64,
    height: i64,
    width: i64,
}

impl SamplingParams {
    pub fn new(channels: i64, height: i64, width: i64) -> Result<Self> {
        if channels <= 0 || height <= 0 || width <= 0 {
            return Err(AugmentError::invalid_argument(format!(
                "image dimensions must be positive, but get [{}, {}, {}]",
                channels, height, width
            ))
            .into());
        }
        Ok(Self {
            channels,
            height,
            width,
        })
    }

    /// Reads the trailing `[C, H, W]` dimensions of an image tensor.
    pub fn from_image(image: &Tensor) -> Result<Self> {
        let size = image.size();
        match *size.as_slice() {
            [.., channels, height, width] => Self::new(channels, height, width),
            _ => Err(AugmentError::invalid_argument(format!(
                "expect an image of shape [..., C, H, W], but get {:?}",
                size
            ))
            .into()),
        }
    }

    /// Looks up the magnitude at `bin_index` among `bins` bins and negates it with
    /// probability 0.5 when the entry is signed.
    ///
    /// Magnitude-free entries yield `0.0` regardless of the index and consume no
    /// randomness.
    pub fn magnitude<R>(
        &self,
        entry: &CatalogueEntry,
        bins: usize,
        bin_index: usize,
        rng: &mut R,
    ) -> Result<f64>
    where
        R: Rng + ?Sized,
    {
        let magnitudes = match entry.scale.magnitudes(bins, self.height, self.width) {
            Some(magnitudes) => magnitudes,
            None => return Ok(0.0),
        };
        let magnitude = *magnitudes.get(bin_index).ok_or_else(|| {
            AugmentError::invalid_argument(format!(
                "bin index {} is out of range for {} bins of {}",
                bin_index, bins, entry.op
            ))
        })?;

        let magnitude = if entry.signed && rng.gen_bool(0.5) {
            -magnitude
        } else {
            magnitude
        };
        Ok(magnitude)
    }

    /// Draws a bin index uniformly from `0..bin_limit` and looks up its magnitude.
    ///
    /// No index is drawn for magnitude-free entries.
    pub fn random_magnitude<R>(
        &self,
        entry: &CatalogueEntry,
        bins: usize,
        bin_limit: usize,
        rng: &mut R,
    ) -> Result<f64>
    where
        R: Rng + ?Sized,
    {
        if entry.scale.is_constant() {
            return Ok(0.0);
        }
        if bin_limit == 0 || bin_limit > bins {
            return Err(AugmentError::invalid_argument(format!(
                "bin limit must be within 1..={}, but get {}",
                bins, bin_limit
            ))
            .into());
        }
        let bin_index = rng.gen_range(0..bin_limit);
        self.magnitude(entry, bins, bin_index, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalogue::Catalogue, op::Op};
    use approx::assert_abs_diff_eq;

    #[test]
    fn image_dimensions() -> Result<()> {
        let batch = Tensor::zeros(&[2, 3, 20, 30], (Kind::Uint8, Device::Cpu));
        let params = SamplingParams::from_image(&batch)?;
        assert_eq!(
            (params.channels(), params.height(), params.width()),
            (3, 20, 30)
        );

        let flat = Tensor::zeros(&[20, 30], (Kind::Uint8, Device::Cpu));
        assert!(SamplingParams::from_image(&flat).is_err());
        Ok(())
    }

    #[test]
    fn magnitude_free_ignores_index() -> Result<()> {
        let params = SamplingParams::new(3, 32, 32)?;
        let entry = Catalogue::auto_augment().lookup(Op::Equalize)?;
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(params.magnitude(entry, 10, 999, &mut rng)?, 0.0);
        assert_eq!(params.random_magnitude(entry, 10, 10, &mut rng)?, 0.0);
        Ok(())
    }

    #[test]
    fn out_of_range_bin() -> Result<()> {
        let params = SamplingParams::new(3, 32, 32)?;
        let entry = Catalogue::auto_augment().lookup(Op::Rotate)?;
        let mut rng = StdRng::seed_from_u64(0);
        let err = params.magnitude(entry, 10, 10, &mut rng).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AugmentError>(),
            Some(AugmentError::InvalidArgument(_))
        ));
        Ok(())
    }

    #[test]
    fn signed_magnitudes_are_balanced() -> Result<()> {
        let params = SamplingParams::new(3, 32, 32)?;
        let entry = Catalogue::auto_augment().lookup(Op::Rotate)?;
        let mut rng = StdRng::seed_from_u64(42);

        let mut negatives = 0;
        for _ in 0..10000 {
            let magnitude = params.magnitude(entry, 10, 9, &mut rng)?;
            assert_abs_diff_eq!(magnitude.abs(), 30.0);
            if magnitude < 0.0 {
                negatives += 1;
            }
        }
        assert!((4500..5500).contains(&negatives));
        Ok(())
    }

    #[test]
    fn unsigned_magnitudes_keep_sign() -> Result<()> {
        let params = SamplingParams::new(3, 32, 32)?;
        let entry = Catalogue::auto_augment().lookup(Op::Solarize)?;
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            assert!(params.random_magnitude(entry, 10, 10, &mut rng)? >= 0.0);
        }
        Ok(())
    }

    #[test]
    fn bin_limit_restricts_range() -> Result<()> {
        let params = SamplingParams::new(3, 32, 32)?;
        let entry = Catalogue::aug_mix(true).lookup(Op::Rotate)?;
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let magnitude = params.random_magnitude(entry, 10, 3, &mut rng)?;
            assert!(magnitude.abs() <= 30.0 * 2.0 / 9.0 + 1e-9);
        }
        assert!(params.random_magnitude(entry, 10, 11, &mut rng).is_err());
        assert!(params.random_magnitude(entry, 10, 0, &mut rng).is_err());
        Ok(())
    }
}

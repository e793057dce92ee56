//! Augmentation spaces: which operations a strategy may pick and how their
//! magnitudes are binned.

use crate::{common::*, op::Op};

/// The magnitude values an operation takes across its bins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MagnitudeScale {
    /// The operation takes no magnitude.
    Constant,
    /// Evenly spaced values from `start` to `end`, both inclusive.
    Linear { start: f64, end: f64 },
    /// Evenly spaced values from zero to `ratio` times the image width.
    WidthRatio(f64),
    /// Evenly spaced values from zero to `ratio` times the image height.
    HeightRatio(f64),
    /// Bit depths decreasing from `max_bits` by `span` bits over the bins, rounded to
    /// integers.
    Bits { max_bits: f64, span: f64 },
}

impl MagnitudeScale {
    /// Computes the magnitude of every bin, or `None` for magnitude-free operations.
    pub fn magnitudes(&self, bins: usize, height: i64, width: i64) -> Option<Vec<f64>> {
        let values = match *self {
            Self::Constant => return None,
            Self::Linear { start, end } => linspace(start, end, bins),
            Self::WidthRatio(ratio) => linspace(0.0, ratio * width as f64, bins),
            Self::HeightRatio(ratio) => linspace(0.0, ratio * height as f64, bins),
            Self::Bits { max_bits, span } => {
                if bins == 1 {
                    vec![max_bits]
                } else {
                    let bins_per_bit = (bins - 1) as f64 / span;
                    (0..bins)
                        .map(|index| round_half_to_even(max_bits - index as f64 / bins_per_bit))
                        .collect()
                }
            }
        };
        Some(values)
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant)
    }
}

/// An operation together with its magnitude binning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatalogueEntry {
    pub op: Op,
    pub scale: MagnitudeScale,
    /// Whether the sampled magnitude is negated with probability 0.5.
    pub signed: bool,
}

impl CatalogueEntry {
    const fn new(op: Op, scale: MagnitudeScale, signed: bool) -> Self {
        Self { op, scale, signed }
    }

    const fn constant(op: Op) -> Self {
        Self::new(op, MagnitudeScale::Constant, false)
    }

    const fn linear(op: Op, end: f64) -> Self {
        Self::new(op, MagnitudeScale::Linear { start: 0.0, end }, true)
    }

    const fn solarize() -> Self {
        Self::new(
            Op::Solarize,
            MagnitudeScale::Linear {
                start: 255.0,
                end: 0.0,
            },
            false,
        )
    }

    const fn posterize(max_bits: f64, span: f64) -> Self {
        Self::new(Op::Posterize, MagnitudeScale::Bits { max_bits, span }, false)
    }
}

/// A read-only, ordered set of operations a strategy draws from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Catalogue {
    entries: &'static [CatalogueEntry],
}

impl Catalogue {
    /// The space of the fixed-policy strategy.
    pub fn auto_augment() -> Self {
        Self {
            entries: AUTO_AUGMENT,
        }
    }

    /// The space of the random chain strategy.
    pub fn rand_augment() -> Self {
        Self {
            entries: RAND_AUGMENT,
        }
    }

    /// The wide-range space of the single random operation strategy.
    pub fn trivial_augment_wide() -> Self {
        Self {
            entries: TRIVIAL_AUGMENT_WIDE,
        }
    }

    /// The space of the mixture strategy. Without `all_ops`, the color adjustments
    /// are left out.
    pub fn aug_mix(all_ops: bool) -> Self {
        let entries = if all_ops {
            AUG_MIX
        } else {
            &AUG_MIX[..AUG_MIX_PARTIAL_LEN]
        };
        Self { entries }
    }

    pub fn entries(&self) -> &'static [CatalogueEntry] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, op: Op) -> bool {
        self.entries.iter().any(|entry| entry.op == op)
    }

    pub fn lookup(&self, op: Op) -> Result<&'static CatalogueEntry> {
        self.entries
            .iter()
            .find(|entry| entry.op == op)
            .ok_or_else(|| AugmentError::UnsupportedOperation(op.to_string()).into())
    }

    /// Draws an entry uniformly at random.
    pub fn random_entry<R>(&self, rng: &mut R) -> &'static CatalogueEntry
    where
        R: Rng + ?Sized,
    {
        &self.entries[rng.gen_range(0..self.entries.len())]
    }
}

const TRANSLATE_RATIO: f64 = 150.0 / 331.0;

const AUTO_AUGMENT: &[CatalogueEntry] = &[
    CatalogueEntry::linear(Op::ShearX, 0.3),
    CatalogueEntry::linear(Op::ShearY, 0.3),
    CatalogueEntry::new(Op::TranslateX, MagnitudeScale::WidthRatio(TRANSLATE_RATIO), true),
    CatalogueEntry::new(Op::TranslateY, MagnitudeScale::HeightRatio(TRANSLATE_RATIO), true),
    CatalogueEntry::linear(Op::Rotate, 30.0),
    CatalogueEntry::linear(Op::Brightness, 0.9),
    CatalogueEntry::linear(Op::Color, 0.9),
    CatalogueEntry::linear(Op::Contrast, 0.9),
    CatalogueEntry::linear(Op::Sharpness, 0.9),
    CatalogueEntry::posterize(8.0, 4.0),
    CatalogueEntry::solarize(),
    CatalogueEntry::constant(Op::AutoContrast),
    CatalogueEntry::constant(Op::Equalize),
    CatalogueEntry::constant(Op::Invert),
];

const RAND_AUGMENT: &[CatalogueEntry] = &[
    CatalogueEntry::constant(Op::Identity),
    CatalogueEntry::linear(Op::ShearX, 0.3),
    CatalogueEntry::linear(Op::ShearY, 0.3),
    CatalogueEntry::new(Op::TranslateX, MagnitudeScale::WidthRatio(TRANSLATE_RATIO), true),
    CatalogueEntry::new(Op::TranslateY, MagnitudeScale::HeightRatio(TRANSLATE_RATIO), true),
    CatalogueEntry::linear(Op::Rotate, 30.0),
    CatalogueEntry::linear(Op::Brightness, 0.9),
    CatalogueEntry::linear(Op::Color, 0.9),
    CatalogueEntry::linear(Op::Contrast, 0.9),
    CatalogueEntry::linear(Op::Sharpness, 0.9),
    CatalogueEntry::posterize(8.0, 4.0),
    CatalogueEntry::solarize(),
    CatalogueEntry::constant(Op::AutoContrast),
    CatalogueEntry::constant(Op::Equalize),
];

const TRIVIAL_AUGMENT_WIDE: &[CatalogueEntry] = &[
    CatalogueEntry::constant(Op::Identity),
    CatalogueEntry::linear(Op::ShearX, 0.99),
    CatalogueEntry::linear(Op::ShearY, 0.99),
    CatalogueEntry::linear(Op::TranslateX, 32.0),
    CatalogueEntry::linear(Op::TranslateY, 32.0),
    CatalogueEntry::linear(Op::Rotate, 135.0),
    CatalogueEntry::linear(Op::Brightness, 0.99),
    CatalogueEntry::linear(Op::Color, 0.99),
    CatalogueEntry::linear(Op::Contrast, 0.99),
    CatalogueEntry::linear(Op::Sharpness, 0.99),
    CatalogueEntry::posterize(8.0, 6.0),
    CatalogueEntry::solarize(),
    CatalogueEntry::constant(Op::AutoContrast),
    CatalogueEntry::constant(Op::Equalize),
];

// the first AUG_MIX_PARTIAL_LEN entries form the reduced space
const AUG_MIX_PARTIAL_LEN: usize = 9;
const AUG_MIX: &[CatalogueEntry] = &[
    CatalogueEntry::linear(Op::ShearX, 0.3),
    CatalogueEntry::linear(Op::ShearY, 0.3),
    CatalogueEntry::new(Op::TranslateX, MagnitudeScale::WidthRatio(1.0 / 3.0), true),
    CatalogueEntry::new(Op::TranslateY, MagnitudeScale::HeightRatio(1.0 / 3.0), true),
    CatalogueEntry::linear(Op::Rotate, 30.0),
    CatalogueEntry::posterize(4.0, 4.0),
    CatalogueEntry::solarize(),
    CatalogueEntry::constant(Op::AutoContrast),
    CatalogueEntry::constant(Op::Equalize),
    CatalogueEntry::linear(Op::Brightness, 0.9),
    CatalogueEntry::linear(Op::Color, 0.9),
    CatalogueEntry::linear(Op::Contrast, 0.9),
    CatalogueEntry::linear(Op::Sharpness, 0.9),
];

fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (steps - 1) as f64;
            (0..steps)
                .map(|index| {
                    if index == steps - 1 {
                        end
                    } else {
                        start + step * index as f64
                    }
                })
                .collect()
        }
    }
}

fn round_half_to_even(value: f64) -> f64 {
    let rounded = value.round();
    if (value - value.trunc()).abs() == 0.5 && rounded % 2.0 != 0.0 {
        rounded - value.signum()
    } else {
        rounded
    }
}

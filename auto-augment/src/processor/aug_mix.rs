use crate::{
    augment::Augment, catalogue::Catalogue, common::*, dirichlet::Dirichlet, dispatch::apply_op,
    magnitude::SamplingParams,
};

pub const AUG_MIX_BINS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AugMixInit {
    pub severity: usize,
    pub mixture_width: usize,
    /// A non-positive depth draws each chain length from `1..=3`.
    pub chain_depth: i64,
    pub alpha: R64,
    pub all_ops: bool,
    pub interpolation: Interpolation,
    pub fill: Fill,
}

impl AugMixInit {
    pub fn build(self) -> Result<AugMix> {
        let Self {
            severity,
            mixture_width,
            chain_depth,
            alpha,
            all_ops,
            interpolation,
            fill,
        } = self;

        ensure!(
            (1..=AUG_MIX_BINS).contains(&severity),
            AugmentError::invalid_argument(format!(
                "severity must be within 1..={}, but get {}",
                AUG_MIX_BINS, severity
            ))
        );
        ensure!(
            mixture_width >= 1,
            AugmentError::invalid_argument("mixture_width must be positive")
        );
        fill.validate()
            .map_err(|err| AugmentError::invalid_argument(format!("{}", err)))?;

        let chain_depth = (chain_depth > 0).then(|| chain_depth as usize);
        let alpha = alpha.raw();
        let pair = Dirichlet::symmetric(alpha, 2)?;
        let mixture = Dirichlet::symmetric(alpha, mixture_width)?;

        Ok(AugMix {
            severity,
            mixture_width,
            chain_depth,
            alpha,
            pair,
            mixture,
            catalogue: Catalogue::aug_mix(all_ops),
            interpolation,
            fill,
        })
    }
}

impl Default for AugMixInit {
    fn default() -> Self {
        Self {
            severity: 3,
            mixture_width: 3,
            chain_depth: -1,
            alpha: r64(1.0),
            all_ops: true,
            interpolation: Interpolation::Bilinear,
            fill: Fill::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MixingWeights {
    pub original: Vec<f64>,
    pub chains: Vec<Vec<f64>>,
}

impl MixingWeights {
    pub fn batch_size(&self) -> usize {
        self.original.len()
    }

    pub fn totals(&self) -> Vec<f64> {
        self.original
            .iter()
            .zip(&self.chains)
            .map(|(original, chains)| original + chains.iter().sum::<f64>())
            .collect()
    }

    fn chain_column(&self, chain_index: usize) -> Vec<f64> {
        self.chains
            .iter()
            .map(|weights| weights[chain_index])
            .collect_vec()
    }
}

#[derive(Debug, Clone, CopyGetters)]
pub struct AugMix {
    #[getset(get_copy = "pub")]
    severity: usize,
    #[getset(get_copy = "pub")]
    mixture_width: usize,
    #[getset(get_copy = "pub")]
    chain_depth: Option<usize>,
    #[getset(get_copy = "pub")]
    alpha: f64,
    pair: Dirichlet,
    mixture: Dirichlet,
    catalogue: Catalogue,
    #[getset(get_copy = "pub")]
    interpolation: Interpolation,
    fill: Fill,
}

impl AugMix {
    pub fn fill(&self) -> &Fill {
        &self.fill
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn sample_mixing_weights<R>(&self, batch_size: usize, rng: &mut R) -> MixingWeights
    where
        R: Rng + ?Sized,
    {
        let pairs = (0..batch_size).map(|_| self.pair.sample(rng)).collect_vec();
        let original = pairs.iter().map(|pair| pair[0]).collect();
        let chains = pairs
            .iter()
            .map(|pair| {
                self.mixture
                    .sample(rng)
                    .into_iter()
                    .map(|weight| weight * pair[1])
                    .collect()
            })
            .collect();

        MixingWeights { original, chains }
    }

    pub fn mix<R>(&self, image: &Tensor, weights: &MixingWeights, rng: &mut R) -> Result<Tensor>
    where
        R: Rng + ?Sized,
    {
        let params = SamplingParams::from_image(image)?;
        let shape = image.size();
        let kind = image.kind();
        let device = image.device();
        let batch = image.reshape(&[-1, params.channels(), params.height(), params.width()]);
        let batch_size = batch.size()[0];

        ensure!(
            weights.batch_size() as i64 == batch_size
                && weights
                    .chains
                    .iter()
                    .all(|chains| chains.len() == self.mixture_width),
            AugmentError::invalid_argument(format!(
                "mixing weights do not match {} images with {} chains",
                batch_size, self.mixture_width
            ))
        );

        let mut mixed = weight_tensor(&weights.original, device) * batch.to_kind(Kind::Float);

        for chain_index in 0..self.mixture_width {
            let depth = match self.chain_depth {
                Some(depth) => depth,
                None => rng.gen_range(1..=3),
            };
            trace!("chain {} has depth {}", chain_index, depth);

            let augmented = (0..depth).try_fold(batch.shallow_clone(), |image, _| -> Result<_> {
                let entry = self.catalogue.random_entry(rng);
                let magnitude =
                    params.random_magnitude(entry, AUG_MIX_BINS, self.severity, rng)?;
                apply_op(&image, entry.op, magnitude, self.interpolation, &self.fill)
            })?;

            let chain_weights = weights.chain_column(chain_index);
            mixed += weight_tensor(&chain_weights, device) * augmented.to_kind(Kind::Float);
        }

        Ok(mixed.reshape(&shape).to_kind(kind))
    }
}

fn weight_tensor(values: &[f64], device: Device) -> Tensor {
    Tensor::of_slice(values)
        .to_kind(Kind::Float)
        .view([-1, 1, 1, 1])
        .to_device(device)
}

impl Augment for AugMix {
    fn forward<R>(&self, image: &Tensor, rng: &mut R) -> Result<Tensor>
    where
        R: Rng + ?Sized,
    {
        tch::no_grad(|| {
            let params = SamplingParams::from_image(image)?;
            let batch_size =
                image.numel() as i64 / (params.channels() * params.height() * params.width());
            let weights = self.sample_mixing_weights(batch_size as usize, rng);
            debug!("mix {} images with {} chains", batch_size, self.mixture_width);
            self.mix(image, &weights, rng)
        })
    }
}

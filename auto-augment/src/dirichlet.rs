use crate::common::*;
use rand_distr::{Distribution, Gamma, Open01};

/// A symmetric Dirichlet distribution.
///
/// Samples are drawn through log-gamma variates and normalized in log space, so that
/// concentrations close to zero still produce valid one-hot-like weights.
#[derive(Debug, Clone)]
pub struct Dirichlet {
    alpha: f64,
    size: usize,
    gamma: Gamma<f64>,
}

impl Dirichlet {
    pub fn symmetric(alpha: f64, size: usize) -> Result<Self> {
        ensure!(
            alpha.is_finite() && alpha > 0.0,
            AugmentError::invalid_argument(format!(
                "concentration must be positive, but get {}",
                alpha
            ))
        );
        ensure!(
            size >= 1,
            AugmentError::invalid_argument("Dirichlet size must be positive")
        );

        // for alpha < 1, Gamma(alpha) = Gamma(alpha + 1) * U^(1 / alpha)
        let shape = if alpha < 1.0 { alpha + 1.0 } else { alpha };
        let gamma = Gamma::new(shape, 1.0)
            .map_err(|err| AugmentError::invalid_argument(format!("{}", err)))?;

        Ok(Self { alpha, size, gamma })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl Distribution<Vec<f64>> for Dirichlet {
    fn sample<R>(&self, rng: &mut R) -> Vec<f64>
    where
        R: Rng + ?Sized,
    {
        if self.size == 1 {
            return vec![1.0];
        }

        let log_gammas: Vec<f64> = (0..self.size)
            .map(|_| {
                let log_gamma = self.gamma.sample(rng).ln();
                if self.alpha < 1.0 {
                    let uniform: f64 = Open01.sample(rng);
                    log_gamma + uniform.ln() / self.alpha
                } else {
                    log_gamma
                }
            })
            .collect();

        let max = log_gammas
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            let mut weights = vec![0.0; self.size];
            weights[rng.gen_range(0..self.size)] = 1.0;
            return weights;
        }

        let exps: Vec<f64> = log_gammas.iter().map(|&val| (val - max).exp()).collect();
        let total: f64 = exps.iter().sum();
        exps.into_iter().map(|val| val / total).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn weights_form_a_simplex() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(17);
        for &alpha in &[1e-6, 0.1, 1.0, 5.0] {
            let dirichlet = Dirichlet::symmetric(alpha, 3)?;
            for _ in 0..200 {
                let weights = dirichlet.sample(&mut rng);
                assert_eq!(weights.len(), 3);
                assert!(weights.iter().all(|&w| (0.0..=1.0).contains(&w)));
                assert_abs_diff_eq!(weights.iter().sum::<f64>(), 1.0, epsilon = 1e-6);
            }
        }
        Ok(())
    }

    #[test]
    fn tiny_concentration_is_one_hot() -> Result<()> {
        let dirichlet = Dirichlet::symmetric(1e-6, 4)?;
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let weights = dirichlet.sample(&mut rng);
            let max = weights.iter().copied().fold(0.0, f64::max);
            assert_abs_diff_eq!(max, 1.0, epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn single_component() -> Result<()> {
        let dirichlet = Dirichlet::symmetric(0.5, 1)?;
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(dirichlet.sample(&mut rng), vec![1.0]);
        Ok(())
    }

    #[test]
    fn reject_invalid_parameters() {
        assert!(Dirichlet::symmetric(0.0, 3).is_err());
        assert!(Dirichlet::symmetric(-1.0, 3).is_err());
        assert!(Dirichlet::symmetric(f64::NAN, 3).is_err());
        assert!(Dirichlet::symmetric(1.0, 0).is_err());
    }
}

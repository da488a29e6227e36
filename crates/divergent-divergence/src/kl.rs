//! Monte Carlo KL divergence between Gaussian-mixture surrogates of two trajectories.

use divergent_series::Series;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use crate::error::DivergenceError;
use crate::mixture::GaussianMixture;

/// Floor added to every adaptive variance so a repeated sample keeps a
/// non-degenerate component.
pub const VARIANCE_FLOOR: f64 = 1e-8;

/// How the isotropic variance of each surrogate component is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SigmaScale {
    /// The same variance for every component.
    Fixed(f64),
    /// Per component: the distance from that sample to the next one, plus
    /// [`VARIANCE_FLOOR`]. The last sample reuses the previous gap.
    Adaptive,
}

impl Default for SigmaScale {
    fn default() -> Self {
        Self::Fixed(1.0)
    }
}

/// Configuration for [`KlConfig::estimate`].
///
/// Each trajectory becomes an equally weighted mixture with one isotropic
/// Gaussian per sample. The estimator draws one ancestral sample per time
/// step of the true trajectory from its surrogate `p`, subsamples
/// `n_samples` of those with replacement, and returns
/// `-mean(ln p(x) - ln q(x))`.
///
/// The result is a stochastic estimate with the sign convention above: it is
/// not exact and not guaranteed non-negative. Densities are combined in log
/// space, so the log-ratio stays finite even where `q` underflows.
///
/// # Defaults
///
/// | Parameter | Default |
/// |---|---|
/// | `n_samples` | 300 |
/// | `sigma_scale` | `SigmaScale::Fixed(1.0)` |
/// | `seed` | 42 |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KlConfig {
    n_samples: usize,
    sigma_scale: SigmaScale,
    seed: u64,
}

impl Default for KlConfig {
    fn default() -> Self {
        Self {
            n_samples: 300,
            sigma_scale: SigmaScale::default(),
            seed: 42,
        }
    }
}

impl KlConfig {
    /// Create a configuration with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of Monte Carlo points averaged.
    #[must_use]
    pub fn with_n_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    /// Set the component variance policy.
    #[must_use]
    pub fn with_sigma_scale(mut self, sigma_scale: SigmaScale) -> Self {
        self.sigma_scale = sigma_scale;
        self
    }

    /// Set the seed used by [`KlConfig::estimate`].
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Return the number of Monte Carlo points.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Return the component variance policy.
    #[must_use]
    pub fn sigma_scale(&self) -> SigmaScale {
        self.sigma_scale
    }

    /// Return the seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Estimate the divergence with a generator seeded from [`KlConfig::seed`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`KlConfig::estimate_with_rng`].
    pub fn estimate(&self, y_true: &Series, y_generated: &Series) -> Result<f64, DivergenceError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.estimate_with_rng(y_true, y_generated, &mut rng)
    }

    /// Estimate the divergence drawing from `rng`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DivergenceError::ZeroParameter`] | `n_samples` is zero |
    /// | [`DivergenceError::ChannelMismatch`] | The trajectories differ in channel count |
    /// | [`DivergenceError::InvalidVariance`] | A fixed variance is not positive and finite |
    /// | [`DivergenceError::TooFewSamples`] | Adaptive variances with a single-sample trajectory |
    #[instrument(
        skip(self, y_true, y_generated, rng),
        fields(t = y_true.n_time(), n_samples = self.n_samples)
    )]
    pub fn estimate_with_rng<R: Rng + ?Sized>(
        &self,
        y_true: &Series,
        y_generated: &Series,
        rng: &mut R,
    ) -> Result<f64, DivergenceError> {
        if self.n_samples == 0 {
            return Err(DivergenceError::ZeroParameter { parameter: "n_samples" });
        }
        if y_true.n_channels() != y_generated.n_channels() {
            return Err(DivergenceError::ChannelMismatch {
                left: y_true.n_channels(),
                right: y_generated.n_channels(),
            });
        }

        let p_hat = self.surrogate(y_true)?;
        let q_hat = self.surrogate(y_generated)?;

        let t = y_true.n_time();
        let draws = p_hat.sample(t, &mut *rng);
        let mut total = 0.0;
        for _ in 0..self.n_samples {
            let x = &draws[rng.gen_range(0..t)];
            total += p_hat.log_density(x) - q_hat.log_density(x);
        }
        let estimate = -(total / self.n_samples as f64);
        debug!(estimate, "kl divergence estimate");
        Ok(estimate)
    }

    fn surrogate(&self, trajectory: &Series) -> Result<GaussianMixture, DivergenceError> {
        let variances = match self.sigma_scale {
            SigmaScale::Fixed(v) => vec![v; trajectory.n_time()],
            SigmaScale::Adaptive => adaptive_variances(trajectory)?,
        };
        GaussianMixture::isotropic(trajectory, &variances)
    }
}

/// Distance from each sample to the next plus [`VARIANCE_FLOOR`]; the last
/// sample repeats the previous gap.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DivergenceError::TooFewSamples`] | Fewer than two time steps |
pub fn adaptive_variances(trajectory: &Series) -> Result<Vec<f64>, DivergenceError> {
    let t = trajectory.n_time();
    if t < 2 {
        return Err(DivergenceError::TooFewSamples { required: 2, got: t });
    }
    let mut gaps: Vec<f64> = (0..t - 1)
        .map(|i| {
            let d: f64 = trajectory
                .row(i + 1)
                .iter()
                .zip(trajectory.row(i))
                .map(|(a, b)| (a - b).powi(2))
                .sum();
            d.sqrt() + VARIANCE_FLOOR
        })
        .collect();
    gaps.push(gaps[t - 2]);
    Ok(gaps)
}

/// Estimate the KL divergence with a seeded generator.
///
/// `sigma_scale` of `None` selects [`SigmaScale::Adaptive`].
///
/// # Errors
///
/// Same conditions as [`KlConfig::estimate_with_rng`].
pub fn estimate_kl_divergence(
    y_true: &Series,
    y_generated: &Series,
    n_samples: usize,
    sigma_scale: Option<f64>,
    seed: u64,
) -> Result<f64, DivergenceError> {
    let sigma_scale = sigma_scale.map_or(SigmaScale::Adaptive, SigmaScale::Fixed);
    KlConfig::new()
        .with_n_samples(n_samples)
        .with_sigma_scale(sigma_scale)
        .with_seed(seed)
        .estimate(y_true, y_generated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orbit(n: usize, phase: f64) -> Series {
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                let theta = i as f64 * 0.2 + phase;
                vec![theta.cos(), theta.sin()]
            })
            .collect();
        Series::from_rows(&rows).unwrap()
    }

    #[test]
    fn identical_orbits_estimate_zero() {
        let x = orbit(80, 0.0);
        let kl = KlConfig::new().estimate(&x, &x).unwrap();
        assert!(kl.abs() < 1e-12);
    }

    #[test]
    fn distant_orbits_have_large_magnitude() {
        let x = orbit(80, 0.0);
        let shifted = x.try_map(|v| v + 10.0).unwrap();
        let kl = KlConfig::new().estimate(&x, &shifted).unwrap();
        // log p - log q is large and positive, so the negated mean is very negative
        assert!(kl < -10.0, "kl was {kl}");
    }

    #[test]
    fn seeded_estimates_are_reproducible() {
        let x = orbit(60, 0.0);
        let y = orbit(60, 0.5);
        let cfg = KlConfig::new().with_seed(9);
        assert_eq!(cfg.estimate(&x, &y).unwrap(), cfg.estimate(&x, &y).unwrap());
    }

    #[test]
    fn adaptive_variances_reuse_last_gap() {
        let x = Series::univariate(&[0.0, 3.0, 7.0]).unwrap();
        let v = adaptive_variances(&x).unwrap();
        assert_eq!(v.len(), 3);
        assert!((v[0] - (3.0 + VARIANCE_FLOOR)).abs() < 1e-15);
        assert!((v[1] - (4.0 + VARIANCE_FLOOR)).abs() < 1e-15);
        assert_eq!(v[2], v[1]);
    }

    #[test]
    fn adaptive_floor_handles_repeated_samples() {
        let x = Series::univariate(&[1.0, 1.0, 1.0, 2.0]).unwrap();
        let y = Series::univariate(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        let kl = KlConfig::new()
            .with_sigma_scale(SigmaScale::Adaptive)
            .estimate(&x, &y)
            .unwrap();
        assert!(kl.is_finite());
    }

    #[test]
    fn adaptive_needs_two_samples() {
        let x = Series::univariate(&[1.0]).unwrap();
        assert!(matches!(
            KlConfig::new().with_sigma_scale(SigmaScale::Adaptive).estimate(&x, &x),
            Err(DivergenceError::TooFewSamples { required: 2, got: 1 })
        ));
    }

    #[test]
    fn rejects_invalid_settings() {
        let x = orbit(10, 0.0);
        assert!(matches!(
            KlConfig::new().with_n_samples(0).estimate(&x, &x),
            Err(DivergenceError::ZeroParameter { .. })
        ));
        assert!(matches!(
            KlConfig::new().with_sigma_scale(SigmaScale::Fixed(-1.0)).estimate(&x, &x),
            Err(DivergenceError::InvalidVariance { .. })
        ));
        let univariate = Series::univariate(&[1.0, 2.0]).unwrap();
        assert!(matches!(
            KlConfig::new().estimate(&x, &univariate),
            Err(DivergenceError::ChannelMismatch { left: 2, right: 1 })
        ));
    }

    #[test]
    fn free_function_matches_config() {
        let x = orbit(30, 0.0);
        let y = orbit(30, 1.0);
        let direct = estimate_kl_divergence(&x, &y, 300, Some(1.0), 42).unwrap();
        assert_eq!(direct, KlConfig::new().estimate(&x, &y).unwrap());
    }
}

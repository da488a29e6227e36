//! Gaussian mixture densities evaluated in log space.

use std::f64::consts::PI;

use divergent_series::Series;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rand_distr::StandardNormal;

use crate::error::DivergenceError;

const WEIGHT_TOLERANCE: f64 = 1e-9;
const SYMMETRY_TOLERANCE: f64 = 1e-12;

/// Covariance of one mixture component.
#[derive(Debug, Clone, PartialEq)]
pub enum Covariance {
    /// `variance * I`.
    Isotropic(f64),
    /// Dense row-major `d x d` matrix.
    Full(Vec<f64>),
}

/// Factor used to evaluate and sample a component.
#[derive(Debug, Clone, PartialEq)]
enum Factor {
    Isotropic { variance: f64, std: f64 },
    /// Lower Cholesky factor, row-major.
    Cholesky(Vec<f64>),
}

#[derive(Debug, Clone, PartialEq)]
struct Component {
    mean: Vec<f64>,
    factor: Factor,
    /// `ln w - 0.5 * (d ln 2pi + ln det)`, or `None` for a zero weight.
    log_scale: Option<f64>,
}

/// Finite mixture of multivariate Gaussians.
#[derive(Debug, Clone)]
pub struct GaussianMixture {
    dim: usize,
    components: Vec<Component>,
    chooser: WeightedIndex<f64>,
}

impl GaussianMixture {
    /// Build a mixture from per-component means, covariances and weights.
    ///
    /// Absent weights are uniform.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DivergenceError::EmptyMixture`] | `means` is empty or zero-dimensional |
    /// | [`DivergenceError::DimensionMismatch`] | Means, covariances or weights disagree in size |
    /// | [`DivergenceError::InvalidVariance`] | An isotropic variance is not positive and finite |
    /// | [`DivergenceError::NotPositiveDefinite`] | A full covariance fails the Cholesky factorization |
    /// | [`DivergenceError::InvalidWeights`] | Weights are negative, non-finite, or do not sum to one |
    pub fn new(
        means: Vec<Vec<f64>>,
        covariances: Vec<Covariance>,
        weights: Option<Vec<f64>>,
    ) -> Result<Self, DivergenceError> {
        let n = means.len();
        let dim = means.first().map_or(0, Vec::len);
        if n == 0 || dim == 0 {
            return Err(DivergenceError::EmptyMixture);
        }
        if covariances.len() != n {
            return Err(DivergenceError::DimensionMismatch {
                component: n,
                expected: n,
                got: covariances.len(),
            });
        }
        let weights = match weights {
            Some(w) => {
                validate_weights(&w, n)?;
                w
            }
            None => vec![1.0 / n as f64; n],
        };
        let chooser = WeightedIndex::new(&weights).map_err(|_| DivergenceError::InvalidWeights {
            reason: "all weights are zero",
        })?;

        let half_log_2pi = 0.5 * dim as f64 * (2.0 * PI).ln();
        let mut components = Vec::with_capacity(n);
        for (k, ((mean, cov), &w)) in means.into_iter().zip(covariances).zip(&weights).enumerate() {
            if mean.len() != dim {
                return Err(DivergenceError::DimensionMismatch {
                    component: k,
                    expected: dim,
                    got: mean.len(),
                });
            }
            let (factor, half_log_det) = factorize(k, dim, cov)?;
            let log_scale = (w > 0.0).then(|| w.ln() - half_log_2pi - half_log_det);
            components.push(Component {
                mean,
                factor,
                log_scale,
            });
        }

        Ok(Self {
            dim,
            components,
            chooser,
        })
    }

    /// One isotropic component per time step of `centers`, equally weighted.
    ///
    /// `variances` holds one variance per time step.
    ///
    /// # Errors
    ///
    /// Same conditions as [`GaussianMixture::new`].
    pub fn isotropic(centers: &Series, variances: &[f64]) -> Result<Self, DivergenceError> {
        if variances.len() != centers.n_time() {
            return Err(DivergenceError::DimensionMismatch {
                component: centers.n_time(),
                expected: centers.n_time(),
                got: variances.len(),
            });
        }
        Self::new(
            centers.rows().map(<[f64]>::to_vec).collect(),
            variances.iter().map(|&v| Covariance::Isotropic(v)).collect(),
            None,
        )
    }

    /// Return the number of components.
    #[must_use]
    pub fn n_components(&self) -> usize {
        self.components.len()
    }

    /// Return the dimension of the sample space.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Log density at `x`, combined across components with log-sum-exp.
    ///
    /// Stays finite far from every component, where the raw density would
    /// underflow to zero.
    ///
    /// # Panics
    ///
    /// Panics if `x.len()` differs from [`GaussianMixture::dim`].
    #[must_use]
    pub fn log_density(&self, x: &[f64]) -> f64 {
        assert_eq!(x.len(), self.dim, "point has dimension {}, mixture has {}", x.len(), self.dim);
        let terms: Vec<f64> = self
            .components
            .iter()
            .filter_map(|c| c.log_scale.map(|s| s - 0.5 * c.mahalanobis_sq(x)))
            .collect();
        log_sum_exp(&terms)
    }

    /// Density at `x`.
    #[must_use]
    pub fn density(&self, x: &[f64]) -> f64 {
        self.log_density(x).exp()
    }

    /// Draw `n` points by ancestral sampling: pick a component by weight,
    /// then sample its Gaussian.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<Vec<f64>> {
        (0..n)
            .map(|_| {
                let component = &self.components[self.chooser.sample(&mut *rng)];
                let z: Vec<f64> = (0..self.dim).map(|_| StandardNormal.sample(&mut *rng)).collect();
                component.transform(&z)
            })
            .collect()
    }
}

impl Component {
    fn mahalanobis_sq(&self, x: &[f64]) -> f64 {
        match &self.factor {
            Factor::Isotropic { variance, .. } => {
                x.iter().zip(&self.mean).map(|(a, m)| (a - m).powi(2)).sum::<f64>() / variance
            }
            Factor::Cholesky(l) => {
                // Solve L z = x - mean by forward substitution; the result is |z|^2
                let d = self.mean.len();
                let mut z = vec![0.0; d];
                for i in 0..d {
                    let mut acc = x[i] - self.mean[i];
                    for k in 0..i {
                        acc -= l[i * d + k] * z[k];
                    }
                    z[i] = acc / l[i * d + i];
                }
                z.iter().map(|v| v * v).sum()
            }
        }
    }

    fn transform(&self, z: &[f64]) -> Vec<f64> {
        match &self.factor {
            Factor::Isotropic { std, .. } => self.mean.iter().zip(z).map(|(m, e)| m + std * e).collect(),
            Factor::Cholesky(l) => {
                let d = self.mean.len();
                (0..d)
                    .map(|i| self.mean[i] + (0..=i).map(|k| l[i * d + k] * z[k]).sum::<f64>())
                    .collect()
            }
        }
    }
}

fn validate_weights(weights: &[f64], n: usize) -> Result<(), DivergenceError> {
    if weights.len() != n {
        return Err(DivergenceError::DimensionMismatch {
            component: n,
            expected: n,
            got: weights.len(),
        });
    }
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(DivergenceError::InvalidWeights {
            reason: "weights must be finite and non-negative",
        });
    }
    if (weights.iter().sum::<f64>() - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(DivergenceError::InvalidWeights {
            reason: "weights must sum to one",
        });
    }
    Ok(())
}

/// Return the sampling factor and half the log-determinant of `cov`.
fn factorize(component: usize, dim: usize, cov: Covariance) -> Result<(Factor, f64), DivergenceError> {
    match cov {
        Covariance::Isotropic(variance) => {
            if !(variance.is_finite() && variance > 0.0) {
                return Err(DivergenceError::InvalidVariance {
                    component,
                    value: variance,
                });
            }
            let factor = Factor::Isotropic {
                variance,
                std: variance.sqrt(),
            };
            Ok((factor, 0.5 * dim as f64 * variance.ln()))
        }
        Covariance::Full(matrix) => {
            if matrix.len() != dim * dim {
                return Err(DivergenceError::DimensionMismatch {
                    component,
                    expected: dim * dim,
                    got: matrix.len(),
                });
            }
            let l = cholesky(&matrix, dim).ok_or(DivergenceError::NotPositiveDefinite { component })?;
            let half_log_det = (0..dim).map(|i| l[i * dim + i].ln()).sum();
            Ok((Factor::Cholesky(l), half_log_det))
        }
    }
}

/// Lower Cholesky factor of a symmetric positive definite row-major matrix.
fn cholesky(a: &[f64], d: usize) -> Option<Vec<f64>> {
    for i in 0..d {
        for j in 0..i {
            let (x, y) = (a[i * d + j], a[j * d + i]);
            if !x.is_finite() || (x - y).abs() > SYMMETRY_TOLERANCE * x.abs().max(y.abs()).max(1.0) {
                return None;
            }
        }
    }
    let mut l = vec![0.0; d * d];
    for i in 0..d {
        for j in 0..=i {
            let dot: f64 = (0..j).map(|k| l[i * d + k] * l[j * d + k]).sum();
            if i == j {
                let pivot = a[i * d + i] - dot;
                if !(pivot.is_finite() && pivot > 0.0) {
                    return None;
                }
                l[i * d + i] = pivot.sqrt();
            } else {
                l[i * d + j] = (a[i * d + j] - dot) / l[j * d + j];
            }
        }
    }
    Some(l)
}

fn log_sum_exp(terms: &[f64]) -> f64 {
    let max = terms.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return max;
    }
    max + terms.iter().map(|t| (t - max).exp()).sum::<f64>().ln()
}

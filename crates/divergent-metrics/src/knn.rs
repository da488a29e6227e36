//! Kraskov–Stögbauer–Grassberger nearest-neighbour mutual information.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::error::MetricError;
use crate::information::MutualInformationEstimator;

/// Relative size of the jitter added to break ties between equal values.
const JITTER: f64 = 1e-10;

/// k-nearest-neighbour mutual information estimator (KSG, algorithm 1).
///
/// Both samples are scaled to unit variance and perturbed by a tiny seeded
/// Gaussian jitter, so repeated values do not collapse neighbour distances.
/// Negative estimates, which only arise from finite-sample bias, are clipped
/// to zero.
///
/// # Defaults
///
/// | Parameter | Default |
/// |---|---|
/// | `neighbors` | 3 |
/// | `seed` | 42 |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnnMutualInformation {
    neighbors: usize,
    seed: u64,
}

impl Default for KnnMutualInformation {
    fn default() -> Self {
        Self {
            neighbors: 3,
            seed: 42,
        }
    }
}

impl KnnMutualInformation {
    /// Create an estimator with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the neighbour count `k`. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_neighbors(mut self, k: usize) -> Self {
        self.neighbors = k.max(1);
        self
    }

    /// Set the seed of the tie-breaking jitter.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Return the neighbour count.
    #[must_use]
    pub fn neighbors(&self) -> usize {
        self.neighbors
    }

    /// Return the jitter seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl MutualInformationEstimator for KnnMutualInformation {
    fn name(&self) -> &str {
        "knn"
    }

    fn estimate(&self, x: &[f64], y: &[f64]) -> Result<f64, MetricError> {
        let n = x.len().min(y.len());
        let k = self.neighbors;
        if n <= k {
            return Err(MetricError::TooFewSamples {
                metric: "mutual_information",
                required: k,
                got: n,
            });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let x = prepare(&x[..n], &mut rng);
        let y = prepare(&y[..n], &mut rng);

        let mut sum_psi_x = 0.0;
        let mut sum_psi_y = 0.0;
        let mut joint = Vec::with_capacity(n - 1);
        for i in 0..n {
            joint.clear();
            joint.extend(
                (0..n)
                    .filter(|&j| j != i)
                    .map(|j| (x[i] - x[j]).abs().max((y[i] - y[j]).abs())),
            );
            let (_, &mut radius, _) = joint.select_nth_unstable_by(k - 1, f64::total_cmp);

            let nx = (0..n).filter(|&j| j != i && (x[i] - x[j]).abs() < radius).count();
            let ny = (0..n).filter(|&j| j != i && (y[i] - y[j]).abs() < radius).count();
            sum_psi_x += digamma((nx + 1) as f64);
            sum_psi_y += digamma((ny + 1) as f64);
        }

        let n_f = n as f64;
        let mi = digamma(n_f) + digamma(k as f64) - sum_psi_x / n_f - sum_psi_y / n_f;
        Ok(mi.max(0.0))
    }
}

/// Scale to unit variance (when not constant) and add seeded jitter.
fn prepare(values: &[f64], rng: &mut ChaCha8Rng) -> Vec<f64> {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
    let scale = if std > 0.0 { std } else { 1.0 };
    let scaled: Vec<f64> = values.iter().map(|v| v / scale).collect();

    let amplitude = JITTER * (scaled.iter().map(|v| v.abs()).sum::<f64>() / n).max(1.0);
    scaled
        .into_iter()
        .map(|v| {
            let noise: f64 = StandardNormal.sample(&mut *rng);
            v + amplitude * noise
        })
        .collect()
}

/// Digamma function for positive arguments.
///
/// Shifts the argument above 10 with the recurrence `psi(x) = psi(x + 1) - 1/x`
/// and finishes with the asymptotic series.
pub(crate) fn digamma(mut x: f64) -> f64 {
    let mut result = 0.0;
    while x < 10.0 {
        result -= 1.0 / x;
        x += 1.0;
    }
    let inv = 1.0 / x;
    let inv2 = inv * inv;
    result + x.ln() - 0.5 * inv
        - inv2 * (1.0 / 12.0 - inv2 * (1.0 / 120.0 - inv2 * (1.0 / 252.0 - inv2 * (1.0 / 240.0 - inv2 / 132.0))))
}

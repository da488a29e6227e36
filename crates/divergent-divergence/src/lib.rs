//! Distributional divergences between a true and a generated trajectory.
//!
//! Pure math library, zero I/O. Provides Gaussian mixtures with log-space
//! densities and ancestral sampling, a Monte Carlo KL estimator built on
//! per-sample mixture surrogates, and the Hellinger distance between
//! low-frequency power spectra.

mod error;
mod kl;
mod mixture;
mod spectral;

pub use error::DivergenceError;
pub use kl::{KlConfig, SigmaScale, VARIANCE_FLOOR, adaptive_variances, estimate_kl_divergence};
pub use mixture::{Covariance, GaussianMixture};
pub use spectral::{SpectralConfig, average_hellinger_distance, hellinger_distance, power_spectrum};

//! Error types for mixture construction and divergence estimation.

use divergent_series::{ErrorKind, SeriesError};

/// Errors from Gaussian mixtures, KL estimation and spectral distances.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DivergenceError {
    /// Wraps a construction error from the input series.
    #[error("invalid input series: {0}")]
    Series(#[from] SeriesError),

    /// Returned when the two trajectories disagree on the number of channels.
    #[error("cannot compare series with {left} and {right} channels")]
    ChannelMismatch {
        /// Channel count of the true series.
        left: usize,
        /// Channel count of the generated series.
        right: usize,
    },

    /// Returned when a mixture is built with no components.
    #[error("a mixture needs at least one component")]
    EmptyMixture,

    /// Returned when a mean, covariance or weight vector has the wrong size.
    #[error("component {component}: expected dimension {expected}, got {got}")]
    DimensionMismatch {
        /// Offending component, or the component count for per-mixture vectors.
        component: usize,
        /// Expected length.
        expected: usize,
        /// Length supplied.
        got: usize,
    },

    /// Returned when an isotropic variance is not strictly positive and finite.
    #[error("component {component}: variance must be positive and finite, got {value}")]
    InvalidVariance {
        /// Offending component.
        component: usize,
        /// The rejected variance.
        value: f64,
    },

    /// Returned when a full covariance matrix is asymmetric or not positive definite.
    #[error("component {component}: covariance is not symmetric positive definite")]
    NotPositiveDefinite {
        /// Offending component.
        component: usize,
    },

    /// Returned when mixture weights are negative or do not sum to one.
    #[error("invalid mixture weights: {reason}")]
    InvalidWeights {
        /// What is wrong with the weights.
        reason: &'static str,
    },

    /// Returned when an estimator setting is zero.
    #[error("{parameter} must be at least 1")]
    ZeroParameter {
        /// Name of the setting.
        parameter: &'static str,
    },

    /// Returned when a trajectory is too short for adaptive covariances.
    #[error("adaptive covariance needs at least {required} samples, got {got}")]
    TooFewSamples {
        /// Minimum number of time steps.
        required: usize,
        /// Time steps supplied.
        got: usize,
    },

    /// Returned when a power spectrum carries no energy in the retained bins.
    #[error("spectrum of channel {channel} is zero in the retained bins")]
    ZeroSpectrum {
        /// Offending channel.
        channel: usize,
    },
}

impl DivergenceError {
    /// Classify this error in the shared taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ZeroSpectrum { .. } | Self::TooFewSamples { .. } => ErrorKind::SingularComputation,
            _ => ErrorKind::PreconditionViolation,
        }
    }
}

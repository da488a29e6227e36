//! Error types for pointwise, seasonal, correlation, and information metrics.

use divergent_series::{ErrorKind, SeriesError};

/// Errors from metric computation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricError {
    /// Wraps a shape or construction error from the inputs.
    #[error("invalid input series: {0}")]
    Series(#[from] SeriesError),

    /// Returned when two series must share a shape and do not.
    #[error("{metric} requires identical shapes, got {left:?} and {right:?}")]
    ShapeMismatch {
        /// Metric that rejected the inputs.
        metric: &'static str,
        /// Shape of `y_true`.
        left: [usize; 2],
        /// Shape of `y_pred`.
        right: [usize; 2],
    },

    /// Returned when the season length is not in the open interval `(0, len)`.
    #[error("season length must satisfy 0 < m < {len}, got {m}")]
    InvalidSeasonLength {
        /// Requested season length.
        m: usize,
        /// Number of time steps in the reference series.
        len: usize,
    },

    /// Returned when an external scale does not have one entry per channel.
    #[error("scale has {got} entries, expected one per channel ({expected})")]
    InvalidScale {
        /// Number of channels.
        expected: usize,
        /// Number of scale entries supplied.
        got: usize,
    },

    /// Returned when the MSIS quantile level is outside `(0, 1)`.
    #[error("interval level a must be in (0, 1), got {a}")]
    InvalidIntervalLevel {
        /// The rejected level.
        a: f64,
    },

    /// Returned when a horizon is zero or longer than the series.
    #[error("horizon must be in [1, {len}], got {horizon}")]
    InvalidHorizon {
        /// Requested horizon.
        horizon: usize,
        /// Number of time steps in `y_true`.
        len: usize,
    },

    /// Returned when an estimator is undefined at the given sample count.
    #[error("{metric} needs more than {required} samples, got {got}")]
    TooFewSamples {
        /// Metric that rejected the inputs.
        metric: &'static str,
        /// Minimum sample count (exclusive).
        required: usize,
        /// Samples provided.
        got: usize,
    },

    /// Returned when a denominator degenerates to zero.
    #[error("{metric} is undefined: {reason}")]
    Singular {
        /// Metric whose denominator degenerated.
        metric: &'static str,
        /// Which quantity vanished.
        reason: &'static str,
    },

    /// Returned when an optional backend is not present at call time.
    #[error("{capability} is unavailable: no backend was provided or compiled in")]
    CapabilityUnavailable {
        /// The missing capability.
        capability: &'static str,
    },
}

impl MetricError {
    /// Classify this error in the shared taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Singular { .. } | Self::TooFewSamples { .. } => ErrorKind::SingularComputation,
            Self::CapabilityUnavailable { .. } => ErrorKind::CapabilityUnavailable,
            _ => ErrorKind::PreconditionViolation,
        }
    }
}

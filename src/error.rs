//! Unified error type for the metric registry and dispatcher.

use divergent_divergence::DivergenceError;
use divergent_dtw::DtwError;
use divergent_metrics::MetricError;
use divergent_series::{ErrorKind, SeriesError};

/// Errors surfaced by [`crate::compute_metrics`] and the registry helpers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DivergentError {
    /// Wraps an input validation error.
    #[error(transparent)]
    Series(#[from] SeriesError),

    /// Wraps an error from a point-wise, seasonal, correlation or information metric.
    #[error(transparent)]
    Metric(#[from] MetricError),

    /// Wraps an error from DTW alignment.
    #[error("alignment failed: {0}")]
    Dtw(#[from] DtwError),

    /// Wraps an error from KL or spectral divergence estimation.
    #[error(transparent)]
    Divergence(#[from] DivergenceError),

    /// Returned when a metric name is not in the registry.
    #[error("unknown metric {name:?}; valid names are: {valid}")]
    UnknownMetric {
        /// The name that failed to resolve.
        name: String,
        /// Comma-separated list of every registered name.
        valid: String,
    },
}

impl DivergentError {
    /// Classify this error in the shared taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Series(e) => e.kind(),
            Self::Metric(e) => e.kind(),
            Self::Dtw(e) => e.kind(),
            Self::Divergence(e) => e.kind(),
            Self::UnknownMetric { .. } => ErrorKind::UnknownMetricName,
        }
    }

    /// Whether the dispatcher may record this error against one metric and
    /// keep computing the rest.
    #[must_use]
    pub fn is_isolatable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::SingularComputation | ErrorKind::CapabilityUnavailable
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_delegate_to_source() {
        let singular: DivergentError = MetricError::Singular {
            metric: "r2_score",
            reason: "true series is constant",
        }
        .into();
        assert_eq!(singular.kind(), ErrorKind::SingularComputation);
        assert!(singular.is_isolatable());

        let mismatch: DivergentError = DtwError::ChannelMismatch { left: 1, right: 2 }.into();
        assert_eq!(mismatch.kind(), ErrorKind::PreconditionViolation);
        assert!(!mismatch.is_isolatable());
    }

    #[test]
    fn unknown_metric_lists_names() {
        let err = DivergentError::UnknownMetric {
            name: "foo".into(),
            valid: "mse, mae".into(),
        };
        assert_eq!(err.kind(), ErrorKind::UnknownMetricName);
        assert_eq!(err.to_string(), "unknown metric \"foo\"; valid names are: mse, mae");
    }
}

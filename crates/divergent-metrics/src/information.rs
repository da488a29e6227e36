//! Mutual information between a true and a predicted series.
//!
//! Mutual information is an optional capability: the caller passes a backend
//! at call time and the metric fails with
//! [`MetricError::CapabilityUnavailable`] when there is none. The crate ships
//! one backend, [`KnnMutualInformation`], behind the `knn-mi` feature.

use std::sync::Arc;

use divergent_series::Series;
use tracing::debug;

use crate::error::MetricError;

#[cfg(feature = "knn-mi")]
pub use crate::knn::KnnMutualInformation;

/// Estimates the mutual information between two equal-length samples.
///
/// Implementations must be safe to share across threads; a single backend
/// instance may serve concurrent callers.
pub trait MutualInformationEstimator: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Mutual information in nats between `x` and `y`.
    ///
    /// # Errors
    ///
    /// Implementations report unusable samples (too few points, for example)
    /// through [`MetricError`].
    fn estimate(&self, x: &[f64], y: &[f64]) -> Result<f64, MetricError>;
}

/// Return the backend compiled into this build, if any.
#[must_use]
pub fn available_backend() -> Option<Arc<dyn MutualInformationEstimator>> {
    #[cfg(feature = "knn-mi")]
    {
        Some(Arc::new(KnnMutualInformation::default()))
    }
    #[cfg(not(feature = "knn-mi"))]
    {
        None
    }
}

/// Mutual information between `y_true` and `y_pred`, averaged across channels.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MetricError::CapabilityUnavailable`] | `backend` is `None` |
/// | [`MetricError::ShapeMismatch`] | Shapes differ |
/// | any | Propagated from the backend |
pub fn mutual_information(
    y_true: &Series,
    y_pred: &Series,
    backend: Option<&dyn MutualInformationEstimator>,
) -> Result<f64, MetricError> {
    let Some(backend) = backend else {
        return Err(MetricError::CapabilityUnavailable {
            capability: "mutual_information",
        });
    };
    if y_true.shape() != y_pred.shape() {
        return Err(MetricError::ShapeMismatch {
            metric: "mutual_information",
            left: y_true.shape(),
            right: y_pred.shape(),
        });
    }
    let n_channels = y_true.n_channels();
    let mut total = 0.0;
    for c in 0..n_channels {
        let mi = backend.estimate(&y_true.channel(c), &y_pred.channel(c))?;
        debug!(backend = backend.name(), channel = c, mi, "channel mutual information");
        total += mi;
    }
    Ok(total / n_channels as f64)
}

//! Re-evaluate a metric over growing forecast prefixes.

use divergent_series::Series;

use crate::error::MetricError;

/// Apply `metric` to the prefixes `[0, i + 1)` for every `i` in `[0, horizon)`.
///
/// The result holds one value per horizon step, in order, so it shows how
/// the error grows with forecast length. `horizon` defaults to the full
/// length of `y_true`. Prefixes of `y_pred` are clamped to its own length,
/// which keeps a broadcast single-step prediction valid.
///
/// The metric's own error type is kept; it only needs to absorb
/// [`MetricError`] for the horizon check.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MetricError::InvalidHorizon`] | `horizon` is zero or exceeds `y_true.n_time()` |
/// | any | The first error returned by `metric` |
pub fn horizoned_metric<T, E, F>(
    y_true: &Series,
    y_pred: &Series,
    horizon: Option<usize>,
    mut metric: F,
) -> Result<Vec<T>, E>
where
    E: From<MetricError>,
    F: FnMut(&Series, &Series) -> Result<T, E>,
{
    let len = y_true.n_time();
    let horizon = horizon.unwrap_or(len);
    if horizon == 0 || horizon > len {
        return Err(MetricError::InvalidHorizon { horizon, len }.into());
    }
    (0..horizon)
        .map(|i| metric(&y_true.head(i + 1), &y_pred.head(i + 1)))
        .collect()
}

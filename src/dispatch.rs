//! Registry-driven metric evaluation: the full battery, horizon curves, and
//! metrics on DTW-aligned series.

use divergent_dtw::Dtw;
use divergent_metrics::horizoned_metric;
use divergent_series::{Series, broadcast_pair, standardize};
use tracing::{debug, instrument, warn};

use crate::config::{MetricsConfig, TimeAxis};
use crate::error::DivergentError;
use crate::registry::{Metric, MetricValue};
use crate::report::MetricReport;

/// Compute every metric selected in `config` on one pair of series.
///
/// Steps, in order:
///
/// 1. With [`TimeAxis::Columns`], both inputs are transposed.
/// 2. With `standardize`, each series is z-scored per channel.
/// 3. The shapes are checked for broadcast compatibility and both series are
///    expanded to the common shape.
/// 4. Each selected metric is evaluated independently.
///
/// A metric whose computation is singular or needs an unavailable backend is
/// recorded in [`MetricReport::failures`] and the others still run. Any other
/// error aborts the call.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DivergentError::Series`] | The shapes are not broadcastable |
/// | any precondition error | Returned by a metric, e.g. a season length not below the series length |
#[instrument(
    skip(y_true, y_pred, config),
    fields(shape_true = ?y_true.shape(), shape_pred = ?y_pred.shape(), n_metrics = config.metrics().len())
)]
pub fn compute_metrics(
    y_true: &Series,
    y_pred: &Series,
    config: &MetricsConfig,
) -> Result<MetricReport, DivergentError> {
    let (y_true, y_pred) = prepare(y_true, y_pred, config);
    let (y_true, y_pred) = broadcast_pair(&y_true, &y_pred)?;

    let mut report = MetricReport::default();
    for &metric in config.metrics() {
        match metric.evaluate(&y_true, &y_pred, config) {
            Ok(value) => {
                debug!(metric = metric.name(), ?value, "metric computed");
                report.record_value(metric, value);
            }
            Err(err) if err.is_isolatable() => {
                warn!(metric = metric.name(), kind = %err.kind(), error = %err, "metric failed");
                report.record_failure(metric, err);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(report)
}

/// Evaluate `metric` on the prefixes `[0, i + 1)` for every `i` in `[0, horizon)`.
///
/// Orientation and standardization follow `config` and are applied once to
/// the full series before slicing. `horizon` defaults to the length of
/// `y_true`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DivergentError::Metric`] | `horizon` is zero or exceeds the series length |
/// | any | The first error of `metric` on any prefix |
#[instrument(skip(y_true, y_pred, config), fields(metric = metric.name()))]
pub fn horizoned(
    metric: Metric,
    y_true: &Series,
    y_pred: &Series,
    horizon: Option<usize>,
    config: &MetricsConfig,
) -> Result<Vec<MetricValue>, DivergentError> {
    let (y_true, y_pred) = prepare(y_true, y_pred, config);
    horizoned_metric(&y_true, &y_pred, horizon, |t, p| metric.evaluate(t, p, config))
}

/// Align the two series with DTW, re-index both along the warping path, then
/// evaluate `metric` on the aligned pair.
///
/// The series may differ in length; they must agree in channel count. The
/// alignment costs O(n·m) time and memory.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DivergentError::Dtw`] | The series differ in channel count |
/// | any | Returned by `metric` on the aligned pair |
#[instrument(skip(y_true, y_pred, config), fields(metric = metric.name()))]
pub fn aligned_metric(
    metric: Metric,
    y_true: &Series,
    y_pred: &Series,
    config: &MetricsConfig,
) -> Result<MetricValue, DivergentError> {
    let (y_true, y_pred) = prepare(y_true, y_pred, config);
    let alignment = Dtw::new().align(&y_true, &y_pred)?;
    debug!(cost = alignment.cost(), path_len = alignment.path().len(), "series aligned");
    let (warped_true, warped_pred) = alignment.warp(&y_true, &y_pred)?;
    metric.evaluate(&warped_true, &warped_pred, config)
}

fn prepare(y_true: &Series, y_pred: &Series, config: &MetricsConfig) -> (Series, Series) {
    let (t, p) = match config.time_axis() {
        TimeAxis::Rows => (y_true.clone(), y_pred.clone()),
        TimeAxis::Columns => (y_true.transposed(), y_pred.transposed()),
    };
    if config.standardize() {
        (standardize(&t), standardize(&p))
    } else {
        (t, p)
    }
}

//! Scale-free metrics normalized by a naive seasonal baseline.

use divergent_series::{Series, broadcast_pair, check_broadcastable};

use crate::error::MetricError;

/// Default MSIS interval level (a 95% prediction interval).
pub const DEFAULT_INTERVAL_LEVEL: f64 = 0.05;

/// Mean absolute difference between a series and itself shifted by `m` steps.
///
/// This is the in-sample error of the seasonal naive forecast, used as the
/// denominator of [`mase`] and [`msis`].
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MetricError::InvalidSeasonLength`] | `m == 0` or `m >= y_past.n_time()` |
pub fn calculate_season_error(y_past: &Series, m: usize) -> Result<f64, MetricError> {
    let len = y_past.n_time();
    if m == 0 || m >= len {
        return Err(MetricError::InvalidSeasonLength { m, len });
    }
    let (total, count) = (m..len)
        .flat_map(|t| y_past.row(t).iter().zip(y_past.row(t - m)))
        .fold((0.0, 0usize), |(sum, n), (fwd, back)| (sum + (fwd - back).abs(), n + 1));
    Ok(total / count as f64)
}

fn checked_season_error(y_past: &Series, m: usize, metric: &'static str) -> Result<f64, MetricError> {
    let season_error = calculate_season_error(y_past, m)?;
    if season_error == 0.0 {
        return Err(MetricError::Singular {
            metric,
            reason: "seasonal naive forecast is exact on the reference series",
        });
    }
    Ok(season_error)
}

/// Mean absolute scaled error.
///
/// The absolute error between `y` and `yhat` is scaled by the seasonal naive
/// error of `y_train` (or of `y` itself when `y_train` is `None`). The
/// training series may span a different time range, so only its channel axis
/// has to broadcast against the forecast.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MetricError::Series`] | Channel counts of `y`, `yhat` and `y_train` do not broadcast |
/// | [`MetricError::InvalidSeasonLength`] | `m` not in `(0, y_train.n_time())` |
/// | [`MetricError::Singular`] | The seasonal naive error is zero |
pub fn mase(y: &Series, yhat: &Series, y_train: Option<&Series>, m: usize) -> Result<f64, MetricError> {
    let y_train = y_train.unwrap_or(y);
    check_broadcastable(&[yhat.n_channels()], &[y_train.n_channels()])?;
    check_broadcastable(&[y.n_channels()], &[y_train.n_channels()])?;

    let season_error = checked_season_error(y_train, m, "mase")?;
    let (t, p) = broadcast_pair(y, yhat)?;
    let n = t.as_slice().len() as f64;
    let mae = t
        .as_slice()
        .iter()
        .zip(p.as_slice())
        .map(|(a, b)| (a - b).abs())
        .sum::<f64>()
        / n;
    Ok(mae / season_error)
}

/// Mean scaled interval score.
///
/// Scores a `(1 - a)` prediction interval `[yhat_lower, yhat_upper]`: its
/// width plus a `2 / a` penalty for every observation outside it, scaled by
/// the seasonal naive error of `y_obs`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MetricError::InvalidIntervalLevel`] | `a` not in `(0, 1)` |
/// | [`MetricError::Series`] | A bound does not broadcast against `y` |
/// | [`MetricError::InvalidSeasonLength`] | `m` not in `(0, y_obs.n_time())` |
/// | [`MetricError::Singular`] | The seasonal naive error is zero |
pub fn msis(
    y: &Series,
    yhat_lower: &Series,
    yhat_upper: &Series,
    y_obs: &Series,
    m: usize,
    a: f64,
) -> Result<f64, MetricError> {
    if !(a > 0.0 && a < 1.0) {
        return Err(MetricError::InvalidIntervalLevel { a });
    }
    check_broadcastable(&yhat_lower.shape(), &y.shape())?;
    check_broadcastable(&yhat_upper.shape(), &y.shape())?;

    let (y_lo, lower) = broadcast_pair(y, yhat_lower)?;
    let (y_full, upper) = broadcast_pair(&y_lo, yhat_upper)?;
    let lower = lower.broadcast_to(y_full.shape())?;

    let penalty = 2.0 / a;
    let n = y_full.as_slice().len() as f64;
    let numer = y_full
        .as_slice()
        .iter()
        .zip(lower.as_slice())
        .zip(upper.as_slice())
        .map(|((&obs, &lo), &hi)| {
            let mut score = hi - lo;
            if obs < lo {
                score += penalty * (lo - obs);
            }
            if hi < obs {
                score += penalty * (obs - hi);
            }
            score
        })
        .sum::<f64>()
        / n;

    let season_error = checked_season_error(y_obs, m, "msis")?;
    Ok(numer / season_error)
}

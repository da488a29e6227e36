//! Point-wise error metrics over broadcast-aligned series.
//!
//! Every function broadcasts its inputs with [`broadcast_pair`] first, so a
//! shape violation fails before any value is read. Denominators that vanish
//! for the given inputs are reported as [`MetricError::Singular`]; the only
//! epsilons are the ones the formulas themselves carry (NRMSE, RMSLE).

use divergent_series::{Series, broadcast_pair, channel_moments};

use crate::error::MetricError;

/// Epsilon used by NRMSE and RMSLE.
pub const EPSILON: f64 = 1e-8;

fn aligned(y_true: &Series, y_pred: &Series) -> Result<(Series, Series), MetricError> {
    Ok(broadcast_pair(y_true, y_pred)?)
}

fn mean_of(values: impl Iterator<Item = f64>, n: usize) -> f64 {
    values.sum::<f64>() / n as f64
}

fn abs_errors(t: &Series, p: &Series) -> Vec<f64> {
    t.as_slice()
        .iter()
        .zip(p.as_slice())
        .map(|(a, b)| (a - b).abs())
        .collect()
}

/// Mean squared error.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MetricError::Series`] | Shapes are not broadcastable |
pub fn mse(y_true: &Series, y_pred: &Series) -> Result<f64, MetricError> {
    let (t, p) = aligned(y_true, y_pred)?;
    let n = t.as_slice().len();
    Ok(mean_of(
        t.as_slice().iter().zip(p.as_slice()).map(|(a, b)| (a - b).powi(2)),
        n,
    ))
}

/// Root mean squared error.
///
/// # Errors
///
/// Same conditions as [`mse`].
pub fn rmse(y_true: &Series, y_pred: &Series) -> Result<f64, MetricError> {
    Ok(mse(y_true, y_pred)?.sqrt())
}

/// Mean absolute error.
///
/// # Errors
///
/// Same conditions as [`mse`].
pub fn mae(y_true: &Series, y_pred: &Series) -> Result<f64, MetricError> {
    let (t, p) = aligned(y_true, y_pred)?;
    let n = t.as_slice().len();
    Ok(mean_of(abs_errors(&t, &p).into_iter(), n))
}

/// Weighted absolute percentage error: `100 * sum|err| / sum|true|`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MetricError::Series`] | Shapes are not broadcastable |
/// | [`MetricError::Singular`] | Every true value is zero |
pub fn wape(y_true: &Series, y_pred: &Series) -> Result<f64, MetricError> {
    let (t, p) = aligned(y_true, y_pred)?;
    let denom: f64 = t.as_slice().iter().map(|v| v.abs()).sum();
    if denom == 0.0 {
        return Err(MetricError::Singular {
            metric: "wape",
            reason: "true values sum to zero",
        });
    }
    Ok(100.0 * abs_errors(&t, &p).iter().sum::<f64>() / denom)
}

/// Coefficient of variation of the error: `100 * std(err) / mean(true)`.
///
/// Uses the population standard deviation over all elements.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MetricError::Series`] | Shapes are not broadcastable |
/// | [`MetricError::Singular`] | The mean of the true values is zero |
pub fn coefficient_of_variation(y_true: &Series, y_pred: &Series) -> Result<f64, MetricError> {
    let (t, p) = aligned(y_true, y_pred)?;
    let n = t.as_slice().len();
    let true_mean = mean_of(t.as_slice().iter().copied(), n);
    if true_mean == 0.0 {
        return Err(MetricError::Singular {
            metric: "coefficient_of_variation",
            reason: "mean of true values is zero",
        });
    }
    let errors: Vec<f64> = t.as_slice().iter().zip(p.as_slice()).map(|(a, b)| a - b).collect();
    let err_mean = mean_of(errors.iter().copied(), n);
    let err_std = mean_of(errors.iter().map(|e| (e - err_mean).powi(2)), n).sqrt();
    Ok(100.0 * err_std / true_mean)
}

/// Mean absolute ranged relative error: `100 * mean(|err| / range(true))`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MetricError::Series`] | Shapes are not broadcastable |
/// | [`MetricError::Singular`] | The true series is constant |
pub fn marre(y_true: &Series, y_pred: &Series) -> Result<f64, MetricError> {
    let (t, p) = aligned(y_true, y_pred)?;
    let max = t.as_slice().iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = t.as_slice().iter().copied().fold(f64::INFINITY, f64::min);
    let range = max - min;
    if range == 0.0 {
        return Err(MetricError::Singular {
            metric: "marre",
            reason: "true series is constant",
        });
    }
    let n = t.as_slice().len();
    Ok(100.0 * mean_of(abs_errors(&t, &p).iter().map(|e| e / range), n))
}

/// Optimality percentage error: `sum|err| / sum|true - mean(true)|`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MetricError::Series`] | Shapes are not broadcastable |
/// | [`MetricError::Singular`] | The true series is constant |
pub fn ope(y_true: &Series, y_pred: &Series) -> Result<f64, MetricError> {
    let (t, p) = aligned(y_true, y_pred)?;
    let n = t.as_slice().len();
    let true_mean = mean_of(t.as_slice().iter().copied(), n);
    let denom: f64 = t.as_slice().iter().map(|v| (v - true_mean).abs()).sum();
    if denom == 0.0 {
        return Err(MetricError::Singular {
            metric: "ope",
            reason: "true series is constant",
        });
    }
    Ok(abs_errors(&t, &p).iter().sum::<f64>() / denom)
}

/// Shift every channel so its minimum sits at `EPSILON`.
fn shift_non_negative(series: &Series) -> Vec<f64> {
    let n_channels = series.n_channels();
    let minima: Vec<f64> = (0..n_channels)
        .map(|c| series.channel(c).into_iter().fold(f64::INFINITY, f64::min))
        .collect();
    series
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, &v)| v - minima[i % n_channels] + EPSILON)
        .collect()
}

/// Root mean squared log error.
///
/// Both series are first shifted per channel so that their minimum becomes
/// `EPSILON`, which keeps the logarithm defined for negative inputs.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MetricError::Series`] | Shapes are not broadcastable |
pub fn rmsle(y_true: &Series, y_pred: &Series) -> Result<f64, MetricError> {
    let (t, p) = aligned(y_true, y_pred)?;
    let shifted_true = shift_non_negative(&t);
    let shifted_pred = shift_non_negative(&p);
    let n = shifted_true.len();
    Ok(mean_of(
        shifted_true
            .iter()
            .zip(&shifted_pred)
            .map(|(a, b)| (b.ln_1p() - a.ln_1p()).powi(2)),
        n,
    )
    .sqrt())
}

/// Coefficient of determination: `1 - SS_res / SS_tot`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MetricError::Series`] | Shapes are not broadcastable |
/// | [`MetricError::Singular`] | The true series is constant (`SS_tot = 0`) |
pub fn r2_score(y_true: &Series, y_pred: &Series) -> Result<f64, MetricError> {
    let (t, p) = aligned(y_true, y_pred)?;
    let n = t.as_slice().len();
    let true_mean = mean_of(t.as_slice().iter().copied(), n);
    let ss_tot: f64 = t.as_slice().iter().map(|v| (v - true_mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return Err(MetricError::Singular {
            metric: "r2_score",
            reason: "true series is constant",
        });
    }
    let ss_res: f64 = t
        .as_slice()
        .iter()
        .zip(p.as_slice())
        .map(|(a, b)| (a - b).powi(2))
        .sum();
    Ok(1.0 - ss_res / ss_tot)
}

/// Mean absolute percentage error: `100 * mean(|err| / |true|)`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MetricError::Series`] | Shapes are not broadcastable |
/// | [`MetricError::Singular`] | Any true value is zero |
pub fn mape(y_true: &Series, y_pred: &Series) -> Result<f64, MetricError> {
    let (t, p) = aligned(y_true, y_pred)?;
    if t.as_slice().contains(&0.0) {
        return Err(MetricError::Singular {
            metric: "mape",
            reason: "a true value is zero",
        });
    }
    let n = t.as_slice().len();
    Ok(100.0
        * mean_of(
            t.as_slice()
                .iter()
                .zip(p.as_slice())
                .map(|(a, b)| (a - b).abs() / a.abs()),
            n,
        ))
}

/// Symmetric mean absolute percentage error, doubled: `200 * mean(|err| / (|true| + |pred|))`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MetricError::Series`] | Shapes are not broadcastable |
/// | [`MetricError::Singular`] | Some true and predicted value are both zero |
pub fn smape(y_true: &Series, y_pred: &Series) -> Result<f64, MetricError> {
    let (t, p) = aligned(y_true, y_pred)?;
    let pairs: Vec<(f64, f64)> = t.as_slice().iter().copied().zip(p.as_slice().iter().copied()).collect();
    if pairs.iter().any(|(a, b)| a.abs() + b.abs() == 0.0) {
        return Err(MetricError::Singular {
            metric: "smape",
            reason: "a true and predicted value are both zero",
        });
    }
    let n = pairs.len();
    Ok(200.0 * mean_of(pairs.iter().map(|(a, b)| (a - b).abs() / (a.abs() + b.abs())), n))
}

/// Normalized root mean squared error: `sqrt(mean(err^2 / (sigma^2 + EPSILON)))`.
///
/// `sigma` is the per-channel population standard deviation of `y_true`,
/// unless `scale` supplies one value per channel.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MetricError::Series`] | Shapes are not broadcastable |
/// | [`MetricError::InvalidScale`] | `scale` length differs from the channel count |
pub fn nrmse(y_true: &Series, y_pred: &Series, scale: Option<&[f64]>) -> Result<f64, MetricError> {
    let (t, p) = aligned(y_true, y_pred)?;
    let n_channels = t.n_channels();
    let sigma: Vec<f64> = match scale {
        Some(s) if s.len() != n_channels => {
            return Err(MetricError::InvalidScale {
                expected: n_channels,
                got: s.len(),
            });
        }
        Some(s) => s.to_vec(),
        None => channel_moments(&t).iter().map(|m| m.std).collect(),
    };
    let n = t.as_slice().len();
    Ok(mean_of(
        t.as_slice()
            .iter()
            .zip(p.as_slice())
            .enumerate()
            .map(|(i, (a, b))| (a - b).powi(2) / (sigma[i % n_channels].powi(2) + EPSILON)),
        n,
    )
    .sqrt())
}

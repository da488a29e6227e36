//! Linear, rank and concordance correlation between two series.
//!
//! Correlations are computed per channel and averaged across channels. Unlike
//! the point-wise metrics, both inputs must have exactly the same shape.

use std::cmp::Ordering;

use divergent_series::Series;

use crate::error::MetricError;

fn per_channel(
    metric: &'static str,
    y_true: &Series,
    y_pred: &Series,
    f: impl Fn(&[f64], &[f64]) -> Option<f64>,
) -> Result<f64, MetricError> {
    if y_true.shape() != y_pred.shape() {
        return Err(MetricError::ShapeMismatch {
            metric,
            left: y_true.shape(),
            right: y_pred.shape(),
        });
    }
    let n_channels = y_true.n_channels();
    let mut total = 0.0;
    for c in 0..n_channels {
        total += f(&y_true.channel(c), &y_pred.channel(c)).ok_or(MetricError::Singular {
            metric,
            reason: "a channel is constant",
        })?;
    }
    Ok(total / n_channels as f64)
}

/// Pearson linear correlation of two equal-length samples.
///
/// Returns `None` if either sample has zero variance.
#[must_use]
pub fn pearson_coefficient(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Fractional ranks starting at 1; tied values share their average rank.
#[must_use]
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1..=end
        let rank = (start + end + 1) as f64 / 2.0;
        for &i in &order[start..end] {
            ranks[i] = rank;
        }
        start = end;
    }
    ranks
}

/// Kendall tau-b of two equal-length samples.
///
/// Returns `None` if either sample is constant.
#[must_use]
pub fn kendall_tau_b(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    let (mut concordant, mut discordant) = (0i64, 0i64);
    let (mut ties_x, mut ties_y) = (0i64, 0i64);
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = x[i].total_cmp(&x[j]);
            let dy = y[i].total_cmp(&y[j]);
            match (dx, dy) {
                (Ordering::Equal, Ordering::Equal) => {}
                (Ordering::Equal, _) => ties_x += 1,
                (_, Ordering::Equal) => ties_y += 1,
                _ if dx == dy => concordant += 1,
                _ => discordant += 1,
            }
        }
    }
    // pairs not tied in x, and pairs not tied in y
    let untied_x = (concordant + discordant + ties_y) as f64;
    let untied_y = (concordant + discordant + ties_x) as f64;
    if untied_x == 0.0 || untied_y == 0.0 {
        return None;
    }
    Some(((concordant - discordant) as f64 / (untied_x * untied_y).sqrt()).clamp(-1.0, 1.0))
}

/// Pearson correlation, averaged across channels.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MetricError::ShapeMismatch`] | Shapes differ |
/// | [`MetricError::Singular`] | A channel of either series is constant |
pub fn pearson(y_true: &Series, y_pred: &Series) -> Result<f64, MetricError> {
    per_channel("pearson", y_true, y_pred, pearson_coefficient)
}

/// Spearman rank correlation, averaged across channels.
///
/// Pearson correlation of the average-tie ranks.
///
/// # Errors
///
/// Same conditions as [`pearson`].
pub fn spearman(y_true: &Series, y_pred: &Series) -> Result<f64, MetricError> {
    per_channel("spearman", y_true, y_pred, |x, y| {
        pearson_coefficient(&average_ranks(x), &average_ranks(y))
    })
}

/// Kendall tau-b, averaged across channels.
///
/// # Errors
///
/// Same conditions as [`pearson`].
pub fn kendall(y_true: &Series, y_pred: &Series) -> Result<f64, MetricError> {
    per_channel("kendall", y_true, y_pred, kendall_tau_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(values: &[f64]) -> Series {
        Series::univariate(values).unwrap()
    }

    #[test]
    fn perfect_positive_and_negative() {
        let t = ts(&[1.0, 2.0, 3.0, 4.0]);
        let up = ts(&[2.0, 4.0, 6.0, 8.0]);
        let down = ts(&[4.0, 3.0, 2.0, 1.0]);
        for f in [pearson, spearman, kendall] {
            assert!((f(&t, &up).unwrap() - 1.0).abs() < 1e-12);
            assert!((f(&t, &down).unwrap() + 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn spearman_is_monotone_invariant() {
        let t = ts(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let cubed = ts(&[1.0, 8.0, 27.0, 64.0, 125.0]);
        assert!((spearman(&t, &cubed).unwrap() - 1.0).abs() < 1e-12);
        assert!(pearson(&t, &cubed).unwrap() < 1.0);
    }

    #[test]
    fn average_ranks_with_ties() {
        assert_eq!(average_ranks(&[10.0, 20.0, 20.0, 5.0]), vec![2.0, 3.5, 3.5, 1.0]);
    }

    #[test]
    fn kendall_known_value() {
        // pairs: 5 concordant, 1 discordant → (5 - 1) / 6
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [1.0, 3.0, 2.0, 4.0];
        assert!((kendall_tau_b(&x, &y).unwrap() - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn kendall_tie_correction() {
        // tau-b: C=2, D=0, ties only in x: 1 → 2 / sqrt(3 * 2)
        let x = [1.0, 1.0, 2.0];
        let y = [1.0, 2.0, 3.0];
        let expected = 2.0 / 6.0_f64.sqrt();
        assert!((kendall_tau_b(&x, &y).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn multichannel_average() {
        let t = Series::from_rows(&[vec![1.0, 1.0], vec![2.0, 2.0], vec![3.0, 3.0]]).unwrap();
        let p = Series::from_rows(&[vec![1.0, 3.0], vec![2.0, 2.0], vec![3.0, 1.0]]).unwrap();
        assert!(pearson(&t, &p).unwrap().abs() < 1e-12);
    }

    #[test]
    fn shape_mismatch_is_precondition() {
        let t = ts(&[1.0, 2.0, 3.0]);
        let p = ts(&[1.0, 2.0]);
        assert!(matches!(
            pearson(&t, &p),
            Err(MetricError::ShapeMismatch { metric: "pearson", .. })
        ));
    }

    #[test]
    fn constant_channel_is_singular() {
        let t = ts(&[1.0, 1.0, 1.0]);
        let p = ts(&[1.0, 2.0, 3.0]);
        for f in [pearson, spearman, kendall] {
            assert!(matches!(f(&t, &p), Err(MetricError::Singular { .. })));
        }
    }
}

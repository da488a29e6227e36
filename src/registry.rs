//! The closed registry of named metrics.

use std::fmt;
use std::str::FromStr;

use divergent_metrics as metrics;
use divergent_series::Series;
use serde::{Deserialize, Serialize};

use crate::config::MetricsConfig;
use crate::error::DivergentError;

/// A metric that [`crate::compute_metrics`] can select by name.
///
/// DTW is not a registry entry: it returns an alignment rather than a value.
/// See [`crate::aligned_metric`] to evaluate a registry metric after
/// alignment. MSIS is not an entry either because it needs interval bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Mean squared error.
    Mse,
    /// Mean absolute error.
    Mae,
    /// Root mean squared error.
    Rmse,
    /// RMSE normalized by the per-channel variance of the true series.
    Nrmse,
    /// Mean absolute range-relative error, in percent.
    Marre,
    /// Coefficient of determination.
    R2Score,
    /// Root mean squared log error after shifting both series non-negative.
    Rmsle,
    /// Symmetric mean absolute percentage error.
    Smape,
    /// Mean absolute percentage error.
    Mape,
    /// Weighted absolute percentage error.
    Wape,
    /// Overall percentage error.
    Ope,
    /// Mean absolute scaled error against the seasonal naive forecast.
    Mase,
    /// Spearman rank correlation, averaged over channels.
    Spearman,
    /// Pearson correlation, averaged over channels.
    Pearson,
    /// Kendall tau-b, averaged over channels.
    Kendall,
    /// Coefficient of variation of the error, in percent.
    CoefficientOfVariation,
    /// Mutual information through the configured backend.
    MutualInformation,
    /// Monte Carlo KL estimate between mixture surrogates.
    KlDivergence,
    /// Per-channel Hellinger distance between power spectra.
    HellingerDistance,
}

/// Value of one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// A single number.
    Scalar(f64),
    /// One number per channel.
    PerChannel(Vec<f64>),
}

impl MetricValue {
    /// Return the scalar, or `None` for a per-channel value.
    #[must_use]
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::PerChannel(_) => None,
        }
    }

    /// Collapse to one number, averaging per-channel values.
    #[must_use]
    pub fn mean(&self) -> f64 {
        match self {
            Self::Scalar(v) => *v,
            Self::PerChannel(vs) => vs.iter().sum::<f64>() / vs.len() as f64,
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl Metric {
    /// Every registered metric, in registry order.
    pub const ALL: [Metric; 19] = [
        Metric::Mse,
        Metric::Mae,
        Metric::Rmse,
        Metric::Nrmse,
        Metric::Marre,
        Metric::R2Score,
        Metric::Rmsle,
        Metric::Smape,
        Metric::Mape,
        Metric::Wape,
        Metric::Ope,
        Metric::Mase,
        Metric::Spearman,
        Metric::Pearson,
        Metric::Kendall,
        Metric::CoefficientOfVariation,
        Metric::MutualInformation,
        Metric::KlDivergence,
        Metric::HellingerDistance,
    ];

    /// Registry name of this metric.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Metric::Mse => "mse",
            Metric::Mae => "mae",
            Metric::Rmse => "rmse",
            Metric::Nrmse => "nrmse",
            Metric::Marre => "marre",
            Metric::R2Score => "r2_score",
            Metric::Rmsle => "rmsle",
            Metric::Smape => "smape",
            Metric::Mape => "mape",
            Metric::Wape => "wape",
            Metric::Ope => "ope",
            Metric::Mase => "mase",
            Metric::Spearman => "spearman",
            Metric::Pearson => "pearson",
            Metric::Kendall => "kendall",
            Metric::CoefficientOfVariation => "coefficient_of_variation",
            Metric::MutualInformation => "mutual_information",
            Metric::KlDivergence => "kl_divergence",
            Metric::HellingerDistance => "hellinger_distance",
        }
    }

    /// Comma-separated list of every registered name.
    #[must_use]
    pub fn valid_names() -> String {
        Self::ALL.map(Metric::name).join(", ")
    }

    /// Compute this metric on `y_true` and `y_pred` as given.
    ///
    /// No time-axis handling or standardization happens here; see
    /// [`crate::compute_metrics`] for the full pipeline. Only the season
    /// length, KL, spectral and mutual information settings of `config` are
    /// read.
    ///
    /// # Errors
    ///
    /// Whatever the underlying metric returns, wrapped in [`DivergentError`].
    pub fn evaluate(
        self,
        y_true: &Series,
        y_pred: &Series,
        config: &MetricsConfig,
    ) -> Result<MetricValue, DivergentError> {
        let value = match self {
            Metric::Mse => metrics::mse(y_true, y_pred)?,
            Metric::Mae => metrics::mae(y_true, y_pred)?,
            Metric::Rmse => metrics::rmse(y_true, y_pred)?,
            Metric::Nrmse => metrics::nrmse(y_true, y_pred, None)?,
            Metric::Marre => metrics::marre(y_true, y_pred)?,
            Metric::R2Score => metrics::r2_score(y_true, y_pred)?,
            Metric::Rmsle => metrics::rmsle(y_true, y_pred)?,
            Metric::Smape => metrics::smape(y_true, y_pred)?,
            Metric::Mape => metrics::mape(y_true, y_pred)?,
            Metric::Wape => metrics::wape(y_true, y_pred)?,
            Metric::Ope => metrics::ope(y_true, y_pred)?,
            Metric::Mase => metrics::mase(y_true, y_pred, None, config.season_length())?,
            Metric::Spearman => metrics::spearman(y_true, y_pred)?,
            Metric::Pearson => metrics::pearson(y_true, y_pred)?,
            Metric::Kendall => metrics::kendall(y_true, y_pred)?,
            Metric::CoefficientOfVariation => metrics::coefficient_of_variation(y_true, y_pred)?,
            Metric::MutualInformation => {
                metrics::mutual_information(y_true, y_pred, config.mutual_information_backend())?
            }
            Metric::KlDivergence => config.kl().estimate(y_true, y_pred)?,
            Metric::HellingerDistance => {
                return Ok(MetricValue::PerChannel(config.spectral().distance(y_true, y_pred)?));
            }
        };
        Ok(MetricValue::Scalar(value))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = DivergentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| DivergentError::UnknownMetric {
                name: s.to_owned(),
                valid: Self::valid_names(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for metric in Metric::ALL {
            assert_eq!(metric.name().parse::<Metric>().unwrap(), metric);
            assert_eq!(metric.to_string(), metric.name());
        }
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = Metric::ALL.iter().map(|m| m.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Metric::ALL.len());
    }

    #[test]
    fn unknown_name_lists_registry() {
        let err = "dtw".parse::<Metric>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("\"dtw\""));
        assert!(msg.contains("hellinger_distance"));
        assert!(msg.contains("r2_score"));
    }

    #[test]
    fn evaluate_literal_case() {
        let t = Series::univariate(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        let p = Series::univariate(&[1.0, 2.0, 3.0, 5.0]).unwrap();
        let cfg = MetricsConfig::new();
        assert_eq!(Metric::Mse.evaluate(&t, &p, &cfg).unwrap(), MetricValue::Scalar(0.25));
        assert_eq!(Metric::Mae.evaluate(&t, &p, &cfg).unwrap(), MetricValue::Scalar(0.25));
        assert_eq!(Metric::Rmse.evaluate(&t, &p, &cfg).unwrap(), MetricValue::Scalar(0.5));
    }

    #[test]
    fn hellinger_is_per_channel() {
        let t = Series::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let value = Metric::HellingerDistance.evaluate(&t, &t, &MetricsConfig::new()).unwrap();
        assert_eq!(value, MetricValue::PerChannel(vec![0.0, 0.0]));
        assert_eq!(value.as_scalar(), None);
        assert_eq!(value.mean(), 0.0);
    }

    #[test]
    fn serializes_as_snake_case() {
        assert_eq!(serde_json::to_string(&Metric::R2Score).unwrap(), "\"r2_score\"");
        assert_eq!(
            serde_json::to_string(&Metric::CoefficientOfVariation).unwrap(),
            "\"coefficient_of_variation\""
        );
        assert_eq!(serde_json::to_string(&MetricValue::Scalar(1.5)).unwrap(), "1.5");
        assert_eq!(
            serde_json::to_string(&MetricValue::PerChannel(vec![0.5, 1.0])).unwrap(),
            "[0.5,1.0]"
        );
    }
}

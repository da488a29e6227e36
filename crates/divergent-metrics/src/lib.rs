//! Point-wise, seasonal, correlation and information metrics for time series.
//!
//! All metrics take [`divergent_series::Series`] inputs and return a single
//! `f64`, averaging across channels where a metric is defined per channel.
//!
//! # Features
//!
//! | Feature | Default | Effect |
//! |---|---|---|
//! | `knn-mi` | on | Compiles [`KnnMutualInformation`] and makes [`available_backend`] return it |

mod correlation;
mod error;
mod horizon;
mod information;
#[cfg(feature = "knn-mi")]
mod knn;
mod pointwise;
mod seasonal;

pub use correlation::{average_ranks, kendall, kendall_tau_b, pearson, pearson_coefficient, spearman};
pub use error::MetricError;
pub use horizon::horizoned_metric;
#[cfg(feature = "knn-mi")]
pub use information::KnnMutualInformation;
pub use information::{MutualInformationEstimator, available_backend, mutual_information};
pub use pointwise::{
    EPSILON, coefficient_of_variation, mae, mape, marre, mse, nrmse, ope, r2_score, rmse, rmsle, smape, wape,
};
pub use seasonal::{DEFAULT_INTERVAL_LEVEL, calculate_season_error, mase, msis};

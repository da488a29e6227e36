//! Time-series comparison: point-wise errors, DTW alignment, and
//! distributional divergence between a true and a predicted trajectory.
//!
//! This crate ties the workspace together behind a closed metric registry.
//! [`compute_metrics`] evaluates a named selection of [`Metric`]s on one
//! pair of series, [`horizoned`] traces a metric over growing forecast
//! prefixes, and [`aligned_metric`] evaluates one after DTW alignment.
//!
//! The building blocks are re-exported from the member crates:
//!
//! | Crate | Provides |
//! |---|---|
//! | `divergent-series` | [`Series`], broadcast checks, standardization, [`ErrorKind`] |
//! | `divergent-metrics` | Point-wise, seasonal, correlation and mutual-information metrics |
//! | `divergent-dtw` | [`Dtw`] alignment, cost matrix and warping path |
//! | `divergent-divergence` | Gaussian mixtures, [`KlConfig`], [`SpectralConfig`] |
//!
//! Libraries here only emit `tracing` events; install a subscriber in the
//! embedding application to see them.

mod config;
mod dispatch;
mod error;
mod registry;
mod report;

pub use config::{MetricsConfig, TimeAxis};
pub use dispatch::{aligned_metric, compute_metrics, horizoned};
pub use error::DivergentError;
pub use registry::{Metric, MetricValue};
pub use report::MetricReport;

pub use divergent_divergence::{
    Covariance, DivergenceError, GaussianMixture, KlConfig, SigmaScale, SpectralConfig, average_hellinger_distance,
    estimate_kl_divergence,
};
pub use divergent_dtw::{Alignment, CostMatrix, Dtw, DtwError, WarpingPath, dtw};
pub use divergent_metrics::{MetricError, MutualInformationEstimator, available_backend, horizoned_metric};
pub use divergent_series::{ErrorKind, Series, SeriesError, are_broadcastable, standardize};

//! Configuration for [`crate::compute_metrics`] and the registry helpers.

use std::fmt;
use std::sync::Arc;

use divergent_divergence::{KlConfig, SpectralConfig};
use divergent_metrics::{MutualInformationEstimator, available_backend};

use crate::error::DivergentError;
use crate::registry::Metric;

/// Which axis of the input tables is time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeAxis {
    /// Rows are time steps, columns are channels.
    #[default]
    Rows,
    /// Columns are time steps; inputs are transposed before anything else.
    Columns,
}

/// Configuration for a metric computation.
///
/// Construct via [`MetricsConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter | Default |
/// |---|---|
/// | `time_axis` | `Rows` |
/// | `standardize` | `false` |
/// | `metrics` | every entry of [`Metric::ALL`] |
/// | `season_length` | 1 |
/// | `kl` | [`KlConfig::default`] |
/// | `spectral` | [`SpectralConfig::default`] |
/// | `mutual_information_backend` | [`available_backend`] |
#[derive(Clone)]
pub struct MetricsConfig {
    time_axis: TimeAxis,
    standardize: bool,
    metrics: Vec<Metric>,
    season_length: usize,
    kl: KlConfig,
    spectral: SpectralConfig,
    mi_backend: Option<Arc<dyn MutualInformationEstimator>>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            time_axis: TimeAxis::default(),
            standardize: false,
            metrics: Metric::ALL.to_vec(),
            season_length: 1,
            kl: KlConfig::default(),
            spectral: SpectralConfig::default(),
            mi_backend: available_backend(),
        }
    }
}

impl fmt::Debug for MetricsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsConfig")
            .field("time_axis", &self.time_axis)
            .field("standardize", &self.standardize)
            .field("metrics", &self.metrics)
            .field("season_length", &self.season_length)
            .field("kl", &self.kl)
            .field("spectral", &self.spectral)
            .field("mi_backend", &self.mi_backend.as_ref().map(|b| b.name().to_owned()))
            .finish()
    }
}

impl MetricsConfig {
    /// Create a config with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set which axis of the inputs is time.
    #[must_use]
    pub fn with_time_axis(mut self, time_axis: TimeAxis) -> Self {
        self.time_axis = time_axis;
        self
    }

    /// Z-score both series per channel before computing anything.
    #[must_use]
    pub fn with_standardize(mut self, standardize: bool) -> Self {
        self.standardize = standardize;
        self
    }

    /// Restrict the computation to `metrics`. Duplicates are dropped, first
    /// occurrence wins.
    #[must_use]
    pub fn with_metrics(mut self, metrics: impl IntoIterator<Item = Metric>) -> Self {
        let mut selected = Vec::new();
        for metric in metrics {
            if !selected.contains(&metric) {
                selected.push(metric);
            }
        }
        self.metrics = selected;
        self
    }

    /// Restrict the computation to the named metrics.
    ///
    /// # Errors
    ///
    /// Returns [`DivergentError::UnknownMetric`] for the first name that is
    /// not registered.
    pub fn with_metric_names<S: AsRef<str>>(self, names: &[S]) -> Result<Self, DivergentError> {
        let metrics = names
            .iter()
            .map(|name| name.as_ref().parse::<Metric>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.with_metrics(metrics))
    }

    /// Set the season length used by MASE.
    #[must_use]
    pub fn with_season_length(mut self, season_length: usize) -> Self {
        self.season_length = season_length;
        self
    }

    /// Set the KL estimator configuration.
    #[must_use]
    pub fn with_kl(mut self, kl: KlConfig) -> Self {
        self.kl = kl;
        self
    }

    /// Set the spectral distance configuration.
    #[must_use]
    pub fn with_spectral(mut self, spectral: SpectralConfig) -> Self {
        self.spectral = spectral;
        self
    }

    /// Use `backend` for mutual information.
    #[must_use]
    pub fn with_mutual_information_backend(mut self, backend: Arc<dyn MutualInformationEstimator>) -> Self {
        self.mi_backend = Some(backend);
        self
    }

    /// Compute without a mutual information backend; the metric then fails
    /// with a capability error.
    #[must_use]
    pub fn without_mutual_information_backend(mut self) -> Self {
        self.mi_backend = None;
        self
    }

    /// Return the time axis.
    #[must_use]
    pub fn time_axis(&self) -> TimeAxis {
        self.time_axis
    }

    /// Return whether inputs are standardized.
    #[must_use]
    pub fn standardize(&self) -> bool {
        self.standardize
    }

    /// Return the selected metrics.
    #[must_use]
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Return the MASE season length.
    #[must_use]
    pub fn season_length(&self) -> usize {
        self.season_length
    }

    /// Return the KL estimator configuration.
    #[must_use]
    pub fn kl(&self) -> &KlConfig {
        &self.kl
    }

    /// Return the spectral distance configuration.
    #[must_use]
    pub fn spectral(&self) -> &SpectralConfig {
        &self.spectral
    }

    /// Return the mutual information backend, if any.
    #[must_use]
    pub fn mutual_information_backend(&self) -> Option<&dyn MutualInformationEstimator> {
        self.mi_backend.as_deref()
    }
}

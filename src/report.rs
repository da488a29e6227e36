//! Result of a [`crate::compute_metrics`] call.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::error::DivergentError;
use crate::registry::{Metric, MetricValue};

/// Values of every requested metric, plus the metrics that failed in isolation.
///
/// Every requested metric appears in exactly one of the two maps. Failures
/// serialize as their error messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricReport {
    values: BTreeMap<Metric, MetricValue>,
    #[serde(serialize_with = "failure_messages", skip_serializing_if = "BTreeMap::is_empty")]
    failures: BTreeMap<Metric, DivergentError>,
}

impl MetricReport {
    pub(crate) fn record_value(&mut self, metric: Metric, value: MetricValue) {
        self.values.insert(metric, value);
    }

    pub(crate) fn record_failure(&mut self, metric: Metric, error: DivergentError) {
        self.failures.insert(metric, error);
    }

    /// Return the value of `metric`, if it was computed.
    #[must_use]
    pub fn get(&self, metric: Metric) -> Option<&MetricValue> {
        self.values.get(&metric)
    }

    /// Return the isolated failure of `metric`, if it failed.
    #[must_use]
    pub fn failure(&self, metric: Metric) -> Option<&DivergentError> {
        self.failures.get(&metric)
    }

    /// Return every computed value, in registry order.
    #[must_use]
    pub fn values(&self) -> &BTreeMap<Metric, MetricValue> {
        &self.values
    }

    /// Return every isolated failure, in registry order.
    #[must_use]
    pub fn failures(&self) -> &BTreeMap<Metric, DivergentError> {
        &self.failures
    }

    /// Whether every requested metric produced a value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Every requested metric, computed or failed, in registry order.
    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        let mut all: Vec<Metric> = self.values.keys().chain(self.failures.keys()).copied().collect();
        all.sort_unstable();
        all.into_iter()
    }
}

fn failure_messages<S: Serializer>(
    failures: &BTreeMap<Metric, DivergentError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(failures.iter().map(|(metric, err)| (metric, err.to_string())))
}

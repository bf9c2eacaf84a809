// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Behavioral baseline data (C2): rolling per-metric samples bucketed by
//! hour-of-day, queried for "is this sample within normal for this time of
//! day". Purely statistical bookkeeping, consistent with RemediationMemory's
//! non-goal on learning models (§1).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Distinct hour-of-day buckets required before a verdict other than
/// `InsufficientData` can be returned (§4.2).
pub const MIN_DISTINCT_BUCKETS: usize = 24;
/// Samples retained per hour bucket; oldest evicted first.
pub const MAX_SAMPLES_PER_BUCKET: usize = 500;
/// Bands outside mean +/- this many standard deviations count as anomalous.
pub const ANOMALY_STDDEV_BANDS: f64 = 3.0;

/// Result of `BaselineStore::is_anomalous`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineVerdict {
    Anomalous,
    WithinNormal,
    /// Fewer than [`MIN_DISTINCT_BUCKETS`] distinct hours observed; treated
    /// as "emit" by the caller (§4.2).
    InsufficientData,
}

/// Rolling samples for one metric key, bucketed by hour-of-day (0-23).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricBaseline {
    buckets: HashMap<u8, Vec<f64>>,
}

impl MetricBaseline {
    pub fn record(&mut self, hour: u8, value: f64) {
        let bucket = self.buckets.entry(hour % 24).or_default();
        bucket.push(value);
        if bucket.len() > MAX_SAMPLES_PER_BUCKET {
            bucket.remove(0);
        }
    }

    pub fn distinct_buckets(&self) -> usize {
        self.buckets.len()
    }

    fn mean_stddev(&self, hour: u8) -> Option<(f64, f64)> {
        let bucket = self.buckets.get(&(hour % 24))?;
        if bucket.is_empty() {
            return None;
        }
        let n = bucket.len() as f64;
        let mean = bucket.iter().sum::<f64>() / n;
        let variance = bucket.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some((mean, variance.sqrt()))
    }
}

/// Per-metric baselines. Keyed by a caller-chosen metric key (e.g.
/// `"cpu:usage"` or `"process:cpu:chrome.exe"` for per-process series, which
/// are tracked as distinct keys per §4.2).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaselineStore {
    metrics: HashMap<String, MetricBaseline>,
}

impl BaselineStore {
    /// Feed one sample. Samples are recorded regardless of gating (§4.2).
    pub fn record_sample(&mut self, key: &str, hour_of_day: u8, value: f64) {
        self.metrics.entry(key.to_string()).or_default().record(hour_of_day, value);
    }

    /// `isAnomalous(key, value)` (§4.2): requires at least
    /// [`MIN_DISTINCT_BUCKETS`] distinct hour buckets before judging;
    /// otherwise `InsufficientData`. Anomalous if the value falls outside
    /// `mean +/- ANOMALY_STDDEV_BANDS * stddev` for the current hour's bucket.
    pub fn is_anomalous(&self, key: &str, hour_of_day: u8, value: f64) -> BaselineVerdict {
        let Some(metric) = self.metrics.get(key) else {
            return BaselineVerdict::InsufficientData;
        };
        if metric.distinct_buckets() < MIN_DISTINCT_BUCKETS {
            return BaselineVerdict::InsufficientData;
        }
        let Some((mean, stddev)) = metric.mean_stddev(hour_of_day) else {
            return BaselineVerdict::InsufficientData;
        };
        if stddev == 0.0 {
            return if value == mean {
                BaselineVerdict::WithinNormal
            } else {
                BaselineVerdict::Anomalous
            };
        }
        let deviations = (value - mean).abs() / stddev;
        if deviations > ANOMALY_STDDEV_BANDS {
            BaselineVerdict::Anomalous
        } else {
            BaselineVerdict::WithinNormal
        }
    }
}

#[cfg(test)]
#[path = "baseline_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Behavioral Profiler (C2): rolling per-metric distribution, queried as
//! "is this sample within normal for this time of day?" Wraps
//! [`BaselineStore`] with the signal-shaped entry point the gate chain
//! calls, plus the hard-floor ceilings that bypass it entirely.

use warden_core::{BaselineStore, BaselineVerdict, Signal};

/// Absolute ceilings that bypass the profiler regardless of baseline data
/// (§4.2). A hard-floor breach is always treated as anomalous.
fn hard_floor_breach(signal: &Signal) -> bool {
    match (signal.category.as_str(), signal.metric.as_str()) {
        ("cpu", "usage") => signal.value >= 98.0,
        ("memory", "usage") => signal.value >= 95.0,
        ("storage", "disk_free") => signal.value <= 3.0,
        _ => false,
    }
}

/// A per-process metric key (memory/CPU) is tracked as its own baseline
/// series, distinct from the system-wide series for the same metric.
pub fn per_process_key(metric: &str, process_name: &str) -> String {
    format!("process:{metric}:{process_name}")
}

#[derive(Debug, Default, Clone)]
pub struct Profiler {
    store: BaselineStore,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_store(store: BaselineStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &BaselineStore {
        &self.store
    }

    pub fn into_store(self) -> BaselineStore {
        self.store
    }

    /// Feed a sample, regardless of gating (§4.2: "samples are fed
    /// continuously").
    pub fn record_sample(&mut self, key: &str, hour_of_day: u8, value: f64) {
        self.store.record_sample(key, hour_of_day, value);
    }

    /// Raw baseline verdict for `signal`, ignoring hard floors. Exposed for
    /// logging/diagnostics; gate decisions should go through [`should_emit`](Self::should_emit).
    pub fn consult(&self, signal: &Signal, hour_of_day: u8) -> BaselineVerdict {
        self.store.is_anomalous(&signal.signal_key, hour_of_day, signal.value)
    }

    /// Gate decision: should this signal continue through the pipeline?
    /// True for a hard-floor breach, an anomalous reading, or insufficient
    /// baseline data (treated as "emit" per §4.2); false only when the
    /// profiler has enough data and judges the value within normal.
    pub fn should_emit(&self, signal: &Signal, hour_of_day: u8) -> bool {
        if hard_floor_breach(signal) {
            return true;
        }
        !matches!(self.consult(signal, hour_of_day), BaselineVerdict::WithinNormal)
    }
}

#[cfg(test)]
#[path = "profiler_tests.rs"]
mod tests;

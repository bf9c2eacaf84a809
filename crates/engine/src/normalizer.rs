// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signal Normalizer (C1): turns a raw observation handed in by a collector
//! (out of scope here — only its contract is honored) into a well-formed
//! [`Signal`]. Collection failures never propagate as panics; a missing
//! field defaults to empty rather than producing a null-bearing value.

use std::collections::HashMap;
use warden_core::{Severity, Signal};

/// One raw observation from a collector, before normalization.
///
/// Mirrors the shape a SystemSignal (sampled) or EventSignal (log-derived)
/// collector would hand the pipeline: identity fields plus a free-form
/// attribute bag. `threshold` and `message` are optional in the source data.
#[derive(Debug, Clone)]
pub struct RawObservation {
    pub category: String,
    pub metric: String,
    pub target: String,
    pub severity: Severity,
    pub value: f64,
    pub threshold: Option<f64>,
    pub message: Option<String>,
    pub attributes: HashMap<String, String>,
}

impl Default for RawObservation {
    fn default() -> Self {
        Self {
            category: String::new(),
            metric: String::new(),
            target: String::new(),
            severity: Severity::Info,
            value: 0.0,
            threshold: None,
            message: None,
            attributes: HashMap::new(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize one observation into a Signal. Never fails: a raw
    /// observation with an empty `category`/`metric`/`target` still yields
    /// a structurally valid (if uninformative) Signal rather than being
    /// dropped — callers that want to drop malformed observations log and
    /// skip before calling this.
    pub fn normalize(&self, raw: RawObservation, timestamp_ms: u64) -> Signal {
        let mut signal = Signal::new(raw.category, raw.metric, raw.target, raw.severity, raw.value, timestamp_ms);
        if let Some(threshold) = raw.threshold {
            signal = signal.with_threshold(threshold);
        }
        if let Some(message) = raw.message {
            signal = signal.with_message(message);
        }
        for (key, value) in raw.attributes {
            signal = signal.with_attribute(key, value);
        }
        signal
    }
}

#[cfg(test)]
#[path = "normalizer_tests.rs"]
mod tests;

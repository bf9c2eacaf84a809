// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signal: a normalized observation of one metric or event at one point in time.
//!
//! Produced by the Signal Normalizer from raw telemetry (system samples or
//! event-log records). Immutable once created; discarded after the pipeline
//! cycle that produced it terminates or it is forwarded as telemetry.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Severity of a signal, ordered low to high for rank comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
    /// Reached only by severity-escalation-by-persistence (§4.3), one rank
    /// above Critical so it always sorts above the highest plain input.
    High,
}

impl Severity {
    /// Raise this severity by one rank, saturating at the top.
    pub fn raise_one_rank(self) -> Self {
        match self {
            Severity::Info => Severity::Warning,
            Severity::Warning => Severity::Critical,
            Severity::Critical | Severity::High => Severity::High,
        }
    }

    pub fn is_escalation_worthy(self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// A single normalized observation.
///
/// `resource_id` and `signal_key` are both deterministic functions of the
/// observation's identity: `resource_id` names the concrete thing observed
/// (`service:Spooler`), `signal_key` names the category+metric+target used
/// to key remediation-memory stats (`services-service_status`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub category: String,
    pub metric: String,
    pub target: String,
    pub resource_id: String,
    pub signal_key: String,
    pub severity: Severity,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub message: String,
    pub timestamp_ms: u64,
    /// Free-form attributes: process name, drive letter, service name,
    /// component class. Never null-bearing; missing fields default to empty.
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl Signal {
    pub fn new(
        category: impl Into<String>,
        metric: impl Into<String>,
        target: impl Into<String>,
        severity: Severity,
        value: f64,
        timestamp_ms: u64,
    ) -> Self {
        let category = category.into();
        let metric = metric.into();
        let target = target.into();
        let resource_id = format!("{category}:{target}");
        let signal_key = format!("{category}-{metric}");
        Self {
            category,
            metric,
            target,
            resource_id,
            signal_key,
            severity,
            value,
            threshold: None,
            message: String::new(),
            timestamp_ms,
            attributes: HashMap::new(),
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! RemediationMemory (C7): per-playbook, per-signal, and per-resource
//! success/failure accounting. Purely statistical bookkeeping — no learning
//! models (explicit non-goal, §1).

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Minimum total attempts before dampening/problematic judgements apply.
pub const K_MIN: u32 = 5;
/// Consecutive failures required to dampen a (signal, device) pair.
pub const K_DAMPEN: u32 = 5;
/// Attempts older than this are pruned from the log (§3).
pub const ATTEMPT_RETENTION_DAYS: u64 = 90;

/// Outcome of one remediation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    Failure,
}

/// One append-only attempt record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    pub playbook_id: String,
    pub signal_key: String,
    pub device_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
    pub outcome: Outcome,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp_ms: u64,
}

fn success_rate(success: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        success as f64 / total as f64
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaybookStats {
    pub total: u64,
    pub success: u64,
    pub failure: u64,
    pub recent_failure_count: u64,
    pub total_duration_ms: u64,
}

impl PlaybookStats {
    pub fn success_rate(&self) -> f64 {
        success_rate(self.success, self.total)
    }

    pub fn average_duration_ms(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.total_duration_ms as f64 / self.total as f64
        }
    }

    /// §3: "problematic if total >= K_min and success_rate < 0.30".
    pub fn is_problematic(&self) -> bool {
        self.total as u32 >= K_MIN && self.success_rate() < 0.30
    }

    pub fn record(&mut self, outcome: Outcome, duration_ms: u64) {
        self.total += 1;
        self.total_duration_ms += duration_ms;
        match outcome {
            Outcome::Success => {
                self.success += 1;
                self.recent_failure_count = 0;
            }
            Outcome::Failure => {
                self.failure += 1;
                self.recent_failure_count += 1;
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalStats {
    pub total: u64,
    pub success: u64,
    pub failure: u64,
    pub consecutive_failures: u32,
    pub dampened: bool,
}

impl SignalStats {
    pub fn success_rate(&self) -> f64 {
        success_rate(self.success, self.total)
    }

    pub fn record(&mut self, outcome: Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Success => {
                self.success += 1;
                self.consecutive_failures = 0;
                self.dampened = false;
            }
            Outcome::Failure => {
                self.failure += 1;
                self.consecutive_failures += 1;
                if self.total as u32 >= K_MIN && self.consecutive_failures >= K_DAMPEN {
                    self.dampened = true;
                }
            }
        }
    }

    pub fn reset_dampening(&mut self) {
        self.dampened = false;
        self.consecutive_failures = 0;
    }
}

/// Confidence-modifier bands, selected by the resource's rolling success
/// rate (§4.7: "the resource band result").
fn confidence_band(success_rate: f64, total: u64) -> f64 {
    if total < K_MIN as u64 {
        1.0
    } else if success_rate >= 0.90 {
        1.0
    } else if success_rate >= 0.70 {
        0.9
    } else if success_rate >= 0.50 {
        0.7
    } else if success_rate >= 0.30 {
        0.5
    } else if success_rate >= 0.10 {
        0.3
    } else {
        0.1
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceStats {
    pub total: u64,
    pub success: u64,
    pub failure: u64,
    pub consecutive_failures: u32,
}

impl ResourceStats {
    pub fn success_rate(&self) -> f64 {
        success_rate(self.success, self.total)
    }

    pub fn confidence_modifier(&self) -> f64 {
        confidence_band(self.success_rate(), self.total)
    }

    pub fn record(&mut self, outcome: Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Success => {
                self.success += 1;
                self.consecutive_failures = 0;
            }
            Outcome::Failure => {
                self.failure += 1;
                self.consecutive_failures += 1;
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceSensitivity {
    pub total: u64,
    pub success: u64,
    #[serde(default)]
    pub sensitive_signals: HashSet<String>,
    #[serde(default)]
    pub problem_categories: HashSet<String>,
}

impl DeviceSensitivity {
    pub fn overall_rate(&self) -> f64 {
        success_rate(self.success, self.total)
    }
}

/// Reason `shouldAttemptRemediation` declined, in check order (§4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    ResourceDampened,
    SignalDampened,
    PlaybookLowSuccess,
    DeviceSensitive,
}

impl Denial {
    pub fn reason(self) -> &'static str {
        match self {
            Denial::ResourceDampened => "Resource dampened",
            Denial::SignalDampened => "Signal dampened",
            Denial::PlaybookLowSuccess => "Playbook low success rate",
            Denial::DeviceSensitive => "Device is remediation-sensitive",
        }
    }
}

pub struct Admission {
    pub allowed: bool,
    pub reason: Option<&'static str>,
    pub confidence_modifier: f64,
}

/// The full RemediationMemory subsystem (C7).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemediationMemory {
    pub playbooks: HashMap<String, PlaybookStats>,
    /// Keyed by `"{device_id}:{signal_key}"`.
    pub signals: HashMap<String, SignalStats>,
    /// Keyed by `"{signal_key}:{resource_name}"`.
    pub resources: HashMap<String, ResourceStats>,
    pub devices: HashMap<String, DeviceSensitivity>,
    #[serde(default)]
    pub attempts: Vec<Attempt>,
}

fn signal_key(device_id: &str, signal_key: &str) -> String {
    format!("{device_id}:{signal_key}")
}

fn resource_key(signal_key: &str, resource_name: &str) -> String {
    format!("{signal_key}:{resource_name}")
}

impl RemediationMemory {
    /// Record one attempt, updating all four stat tables (§4.7).
    pub fn record_attempt(
        &mut self,
        playbook_id: &str,
        signal_key_val: &str,
        device_id: &str,
        resource_name: Option<&str>,
        outcome: Outcome,
        duration_ms: u64,
        error: Option<String>,
        now_ms: u64,
    ) {
        self.playbooks
            .entry(playbook_id.to_string())
            .or_default()
            .record(outcome, duration_ms);

        self.signals
            .entry(signal_key(device_id, signal_key_val))
            .or_default()
            .record(outcome);

        if let Some(resource_name) = resource_name {
            self.resources
                .entry(resource_key(signal_key_val, resource_name))
                .or_default()
                .record(outcome);
        }

        let device = self.devices.entry(device_id.to_string()).or_default();
        device.total += 1;
        if outcome == Outcome::Success {
            device.success += 1;
        } else {
            device.sensitive_signals.insert(signal_key_val.to_string());
        }

        self.attempts.push(Attempt {
            playbook_id: playbook_id.to_string(),
            signal_key: signal_key_val.to_string(),
            device_id: device_id.to_string(),
            resource_name: resource_name.map(str::to_string),
            outcome,
            duration_ms,
            error,
            timestamp_ms: now_ms,
        });
    }

    /// Order of checks per §4.7: resource dampening -> signal dampening ->
    /// playbook low-success -> device sensitivity.
    pub fn should_attempt_remediation(
        &self,
        signal_key_val: &str,
        device_id: &str,
        playbook_id: &str,
        resource_name: Option<&str>,
    ) -> Admission {
        let resource_modifier = resource_name
            .and_then(|r| self.resources.get(&resource_key(signal_key_val, r)))
            .map(|r| r.confidence_modifier())
            .unwrap_or(1.0);

        // Resource dampening is expressed purely via confidence modifier in
        // this subsystem (there is no separate resource-level dampened
        // flag in §3); a modifier floor is treated as an outright denial.
        if resource_modifier <= 0.1 {
            return Admission {
                allowed: false,
                reason: Some(Denial::ResourceDampened.reason()),
                confidence_modifier: resource_modifier,
            };
        }

        if let Some(signal) = self.signals.get(&signal_key(device_id, signal_key_val)) {
            if signal.dampened {
                return Admission {
                    allowed: false,
                    reason: Some(Denial::SignalDampened.reason()),
                    confidence_modifier: resource_modifier,
                };
            }
        }

        if let Some(pb) = self.playbooks.get(playbook_id) {
            if pb.is_problematic() {
                return Admission {
                    allowed: false,
                    reason: Some(Denial::PlaybookLowSuccess.reason()),
                    confidence_modifier: resource_modifier,
                };
            }
        }

        if let Some(device) = self.devices.get(device_id) {
            if device.total as u32 >= K_MIN && device.overall_rate() < 0.30 {
                return Admission {
                    allowed: false,
                    reason: Some(Denial::DeviceSensitive.reason()),
                    confidence_modifier: resource_modifier,
                };
            }
        }

        Admission {
            allowed: true,
            reason: None,
            confidence_modifier: resource_modifier,
        }
    }

    /// §3: cached solution exists for (device, signal) iff consecutive
    /// successes >= 1 AND signal success_rate >= 0.70 AND the underlying
    /// playbook success_rate >= 0.50. Returns the most recent successful
    /// playbook for the pair, if any.
    pub fn find_cached_solution(&self, signal_key_val: &str, device_id: &str) -> Option<String> {
        let signal = self.signals.get(&signal_key(device_id, signal_key_val))?;
        if signal.consecutive_failures != 0 || signal.success == 0 {
            return None;
        }
        if signal.success_rate() < 0.70 {
            return None;
        }

        self.attempts
            .iter()
            .rev()
            .filter(|a| a.device_id == device_id && a.signal_key == signal_key_val && a.outcome == Outcome::Success)
            .find_map(|a| {
                let pb = self.playbooks.get(&a.playbook_id)?;
                if pb.success_rate() >= 0.50 {
                    Some(a.playbook_id.clone())
                } else {
                    None
                }
            })
    }

    pub fn reset_dampening(&mut self, signal_key_val: &str, device_id: &str) {
        if let Some(signal) = self.signals.get_mut(&signal_key(device_id, signal_key_val)) {
            signal.reset_dampening();
        }
    }

    /// Drop attempts older than [`ATTEMPT_RETENTION_DAYS`].
    pub fn prune_attempts(&mut self, now_ms: u64) {
        let cutoff = now_ms.saturating_sub(ATTEMPT_RETENTION_DAYS * 24 * 60 * 60 * 1000);
        self.attempts.retain(|a| a.timestamp_ms >= cutoff);
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-resource state record held by the State Tracker (C3).

use crate::signal::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default flap-detection window: N transitions within this many minutes.
pub const DEFAULT_FLAP_WINDOW_SECS: u64 = 10 * 60;
/// Default flap-detection threshold transition count.
pub const DEFAULT_FLAP_THRESHOLD: usize = 5;
/// Default quiet period after which a flapping resource's state is cleared.
pub const DEFAULT_FLAP_QUIET_SECS: u64 = 20 * 60;

/// One observed transition, used for the flap sliding window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    pub state: String,
    pub severity: Severity,
    pub timestamp_ms: u64,
}

/// Tracked state for a single `resource_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceState {
    pub resource_id: String,
    pub resource_type: String,
    pub current_state: String,
    pub severity: Severity,
    pub first_seen_ms: u64,
    pub last_change_ms: u64,
    /// Rolling window of recent transitions, used for flap detection.
    #[serde(default)]
    pub transitions: Vec<Transition>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Set once a FLAP synthetic signal has been emitted for the current
    /// run of transitions, cleared after the quiet period.
    #[serde(default)]
    pub flapping: bool,
    /// When the resource entered its current (non-OK) state, used for
    /// severity-escalation-by-persistence.
    #[serde(default)]
    pub non_ok_since_ms: Option<u64>,
    /// Set once a sustained-breach-escalated signal has been emitted for
    /// the current non-OK run, so it fires at most once per run.
    #[serde(default)]
    pub escalated: bool,
}

impl ResourceState {
    pub fn new(
        resource_id: impl Into<String>,
        resource_type: impl Into<String>,
        state: impl Into<String>,
        severity: Severity,
        now_ms: u64,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            resource_type: resource_type.into(),
            current_state: state.into(),
            severity,
            first_seen_ms: now_ms,
            last_change_ms: now_ms,
            transitions: vec![Transition {
                state: String::new(),
                severity,
                timestamp_ms: now_ms,
            }],
            metadata: HashMap::new(),
            flapping: false,
            non_ok_since_ms: if severity == Severity::Info {
                None
            } else {
                Some(now_ms)
            },
            escalated: false,
        }
    }

    /// Number of transitions recorded within `window_secs` of `now_ms`.
    pub fn transitions_within(&self, now_ms: u64, window_secs: u64) -> usize {
        let cutoff = now_ms.saturating_sub(window_secs * 1000);
        self.transitions
            .iter()
            .filter(|t| t.timestamp_ms >= cutoff)
            .count()
    }
}

#[cfg(test)]
#[path = "resource_state_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State Tracker (C3): per-resource state machine, flap detection,
//! dependency-aware suppression, and severity-escalation-by-persistence.
//!
//! Pure query functions over the resources map the pipeline domain owns in
//! `MaterializedState` — this module never mutates that map itself. Every
//! decision comes back as an `Event` (or a signal rewrite) that the domain
//! hands to `Effect::Emit`; `MaterializedState::apply_event` is what
//! actually mutates the stored record, so a decision computed here and one
//! replayed from the WAL after a crash apply identically.

use std::collections::HashMap;
use warden_core::resource_state::{DEFAULT_FLAP_QUIET_SECS, DEFAULT_FLAP_THRESHOLD, DEFAULT_FLAP_WINDOW_SECS};
use warden_core::{Event, ResourceState, Signal};

/// Default duration a resource may remain in a non-OK state before
/// severity-escalation-by-persistence fires (§4.3). Not specified as a
/// numeric default in the data model the way flap window/threshold are;
/// chosen to match the flap quiet window's order of magnitude.
pub const DEFAULT_SUSTAINED_BREACH_SECS: u64 = 30 * 60;

/// The per-resource "current state" label. Signals don't carry an explicit
/// state string (only severity + value); collectors encode it as the
/// `state` attribute (e.g. `"running"`/`"stopped"`/`"down"`) when the
/// underlying observation has one, falling back to the severity's name for
/// purely numeric metrics.
pub fn state_label(signal: &Signal) -> String {
    signal
        .attributes
        .get("state")
        .cloned()
        .unwrap_or_else(|| signal.severity.to_string())
}

#[derive(Debug, Clone, Copy)]
pub struct StateTrackerConfig {
    pub flap_window_secs: u64,
    pub flap_threshold: usize,
    pub flap_quiet_secs: u64,
    pub sustained_breach_secs: u64,
}

impl Default for StateTrackerConfig {
    fn default() -> Self {
        Self {
            flap_window_secs: DEFAULT_FLAP_WINDOW_SECS,
            flap_threshold: DEFAULT_FLAP_THRESHOLD,
            flap_quiet_secs: DEFAULT_FLAP_QUIET_SECS,
            sustained_breach_secs: DEFAULT_SUSTAINED_BREACH_SECS,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct StateTracker {
    config: StateTrackerConfig,
}

impl StateTracker {
    pub fn new(config: StateTrackerConfig) -> Self {
        Self { config }
    }

    /// `checkState`: a state-change event only if (state, severity) differs
    /// from the stored record, else `None` (suppressed).
    pub fn check_state(&self, resources: &HashMap<String, ResourceState>, signal: &Signal) -> Option<Event> {
        let label = state_label(signal);
        if let Some(existing) = resources.get(&signal.resource_id) {
            if existing.current_state == label && existing.severity == signal.severity {
                return None;
            }
        }
        Some(Event::ResourceTransitioned {
            resource_id: signal.resource_id.clone(),
            state: label,
            severity: signal.severity.to_string(),
            timestamp_ms: signal.timestamp_ms,
        })
    }

    /// Dependency-aware suppression: if `signal` reports a DOWN resource and
    /// any ancestor in the dependency DAG is also DOWN, suppress the child —
    /// only the root cause is emitted. `dag` maps a service name to its
    /// direct dependencies (ancestors it relies on).
    pub fn is_dependency_suppressed(
        &self,
        resources: &HashMap<String, ResourceState>,
        dag: &HashMap<String, Vec<String>>,
        signal: &Signal,
    ) -> bool {
        if state_label(signal) != "down" {
            return false;
        }
        let Some(ancestors) = dag.get(&signal.target) else {
            return false;
        };
        ancestors.iter().any(|ancestor| {
            resources
                .get(&format!("{}:{}", signal.category, ancestor))
                .map(|state| state.current_state == "down")
                .unwrap_or(false)
        })
    }

    /// Flap detection: counts transitions for this resource within the
    /// configured window. On crossing the threshold, rewrites the signal
    /// into a synthetic FLAP signal and returns the `ResourceFlapDetected`
    /// event alongside it; the caller emits the synthetic signal in place
    /// of the original and emits the event.
    pub fn flap_rewrite(
        &self,
        resources: &HashMap<String, ResourceState>,
        signal: &Signal,
    ) -> Option<(Signal, Event)> {
        let existing = resources.get(&signal.resource_id)?;
        if existing.flapping {
            // Already rewritten for this run of transitions; subsequent
            // transitions within the window produce no further escalations.
            return None;
        }
        let count = existing.transitions_within(signal.timestamp_ms, self.config.flap_window_secs) + 1;
        if count < self.config.flap_threshold {
            return None;
        }
        let mut flap = Signal::new(
            "flap",
            signal.metric.clone(),
            signal.target.clone(),
            warden_core::Severity::Warning,
            signal.value,
            signal.timestamp_ms,
        );
        flap.resource_id = format!("FLAP_{}", signal.resource_id);
        flap = flap.with_message(format!("{} is flapping ({count} transitions)", signal.resource_id));
        let event = Event::ResourceFlapDetected {
            resource_id: signal.resource_id.clone(),
            transition_count: count,
            timestamp_ms: signal.timestamp_ms,
        };
        Some((flap, event))
    }

    /// Resources whose flap quiet period has elapsed since their last
    /// transition — the caller clears their state.
    pub fn flap_cleared<'a>(
        &self,
        resources: &'a HashMap<String, ResourceState>,
        now_ms: u64,
    ) -> Vec<&'a str> {
        resources
            .values()
            .filter(|r| r.flapping && now_ms.saturating_sub(r.last_change_ms) >= self.config.flap_quiet_secs * 1000)
            .map(|r| r.resource_id.as_str())
            .collect()
    }

    /// Severity-escalation-by-persistence: a resource stuck in a non-OK
    /// state longer than the configured duration is emitted once (per run)
    /// with severity raised a rank.
    pub fn sustained_breach(&self, resources: &HashMap<String, ResourceState>, signal: &Signal) -> Option<Event> {
        let existing = resources.get(&signal.resource_id)?;
        if existing.escalated {
            return None;
        }
        let since = existing.non_ok_since_ms?;
        if signal.timestamp_ms.saturating_sub(since) < self.config.sustained_breach_secs * 1000 {
            return None;
        }
        Some(Event::ResourceEscalatedByPersistence {
            resource_id: signal.resource_id.clone(),
            raised_severity: existing.severity.raise_one_rank().to_string(),
        })
    }
}

#[cfg(test)]
#[path = "state_tracker_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer identifier type for tracking scheduled timers.
//!
//! TimerId uniquely identifies a timer instance used for scheduling delayed
//! actions such as cooldowns, batching windows, and periodic sweeps.

crate::define_id! {
    /// Unique identifier for a timer instance.
    pub struct TimerId;
}

impl TimerId {
    /// Timer ID for the batching window used to collapse related observations
    /// into a single Signature before escalation (§4.5).
    pub fn batch_window(resource_id: &str) -> Self {
        Self::new(format!("batch:{}", resource_id))
    }

    /// Timer ID for the flap-detection quiet window (§4.3).
    pub fn flap_quiet(resource_id: &str) -> Self {
        Self::new(format!("flap-quiet:{}", resource_id))
    }

    /// Timer ID for the cooldown between remediation attempts on a
    /// (signal, device) pair.
    pub fn cooldown(signal_key: &str, device_id: &str) -> Self {
        Self::new(format!("cooldown:{}:{}", device_id, signal_key))
    }

    /// Timer ID for the periodic transport heartbeat.
    pub fn heartbeat() -> Self {
        Self::new("heartbeat")
    }

    /// Timer ID for the daily attempt-log pruning task.
    pub fn attempt_log_prune() -> Self {
        Self::new("attempt-log-prune")
    }

    /// Timer ID for the dependency DAG refresh task.
    pub fn dependency_dag_refresh() -> Self {
        Self::new("dependency-dag-refresh")
    }

    /// Timer ID for a maintenance window's expiry check.
    pub fn maintenance_expiry(window_id: &str) -> Self {
        Self::new(format!("maintenance-expiry:{}", window_id))
    }

    pub fn is_cooldown(&self) -> bool {
        self.0.starts_with("cooldown:")
    }

    pub fn is_batch_window(&self) -> bool {
        self.0.starts_with("batch:")
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;

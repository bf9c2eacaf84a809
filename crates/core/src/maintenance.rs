// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! MaintenanceWindow (C4 data model).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

crate::define_id! {
    pub struct MaintenanceWindowId;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MaintenanceScope {
    All,
    Services { names: HashSet<String> },
    SignalIds { ids: HashSet<String> },
}

impl MaintenanceScope {
    pub fn covers_service(&self, name: &str) -> bool {
        match self {
            MaintenanceScope::All => true,
            MaintenanceScope::Services { names } => names.contains(name),
            MaintenanceScope::SignalIds { .. } => false,
        }
    }

    pub fn covers_signal_id(&self, signal_id: &str) -> bool {
        match self {
            MaintenanceScope::All => true,
            MaintenanceScope::Services { .. } => false,
            MaintenanceScope::SignalIds { ids } => ids.contains(signal_id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceWindow {
    pub id: MaintenanceWindowId,
    pub scope: MaintenanceScope,
    pub start_ms: u64,
    pub end_ms: u64,
    pub suppress_escalation: bool,
    pub suppress_remediation: bool,
}

impl MaintenanceWindow {
    pub fn is_active(&self, now_ms: u64) -> bool {
        now_ms >= self.start_ms && now_ms < self.end_ms
    }

    pub fn has_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.end_ms
    }
}

#[cfg(test)]
#[path = "maintenance_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maintenance Gate (C4): active-window registry, consulted before
//! escalation and remediation. Windows themselves are owned by the
//! pipeline domain's `MaterializedState`; this module is the stateless
//! query/expiry logic over that collection.

use warden_core::{MaintenanceWindow, MaintenanceWindowId};

/// Result of `isUnderMaintenance` (§4.4).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaintenanceCheck {
    pub suppress_escalation: bool,
    pub suppress_remediation: bool,
    pub window_id: Option<MaintenanceWindowId>,
}

impl MaintenanceCheck {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppress_escalation || self.suppress_remediation
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MaintenanceGate;

impl MaintenanceGate {
    pub fn new() -> Self {
        Self
    }

    /// `isUnderMaintenance(category, resource_name, signal_id)`. The first
    /// active window whose scope covers either the resource name or the
    /// signal id wins; windows are not expected to overlap in practice but
    /// this takes the most permissive match if they do.
    pub fn check<'a>(
        &self,
        windows: impl Iterator<Item = &'a MaintenanceWindow>,
        resource_name: &str,
        signal_id: &str,
        now_ms: u64,
    ) -> MaintenanceCheck {
        for window in windows {
            if !window.is_active(now_ms) {
                continue;
            }
            if window.scope.covers_service(resource_name) || window.scope.covers_signal_id(signal_id) {
                return MaintenanceCheck {
                    suppress_escalation: window.suppress_escalation,
                    suppress_remediation: window.suppress_remediation,
                    window_id: Some(window.id.clone()),
                };
            }
        }
        MaintenanceCheck::none()
    }

    /// Windows that have expired as of `now_ms`. The caller clears matching
    /// State Tracker records and removes these windows from storage.
    pub fn expired<'a>(
        &self,
        windows: impl Iterator<Item = &'a MaintenanceWindow>,
        now_ms: u64,
    ) -> Vec<MaintenanceWindowId> {
        windows
            .filter(|window| window.has_expired(now_ms))
            .map(|window| window.id.clone())
            .collect()
    }
}

#[cfg(test)]
#[path = "maintenance_gate_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IPC protocol (A.5): operator commands sent over the daemon's Unix
//! socket. Wire encoding lives in `protocol_wire` — this module only
//! defines the message shapes.

use serde::{Deserialize, Serialize};
use warden_core::decision::IgnoreCategory;
use warden_core::maintenance::MaintenanceScope;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Daemon health/summary (§A.5).
    Status,
    PendingList,
    PendingApprove { signature_id: String },
    PendingCancel { signature_id: String },
    ExcludeAdd { category: IgnoreCategory, name: String },
    ExcludeRemove { category: IgnoreCategory, name: String },
    ExcludeList,
    MaintenanceCreate {
        scope: MaintenanceScope,
        start_ms: u64,
        end_ms: u64,
        suppress_escalation: bool,
        suppress_remediation: bool,
    },
    MaintenanceList,
    MaintenanceCancel { window_id: String },
    DampeningReset { signal_key: String, device_id: String },
    TicketList,
    TicketShow { ticket_id: String },
    /// Synthesizes a signal through the full pipeline for a given signal
    /// key, bypassing real collectors — used to verify the escalation
    /// path end to end without waiting for a real fault (§A.5).
    TestEscalate { signal_key: String, target: String },
    Shutdown { kill: bool },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSummary {
    pub device_id: String,
    pub tenant_id: String,
    pub uptime_secs: u64,
    pub transport_connected: bool,
    pub queue_depth: usize,
    pub open_tickets: usize,
    pub pending_actions: usize,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingActionSummary {
    pub signature_id: String,
    pub ticket_id: String,
    pub severity: String,
    pub confidence: u8,
    pub matched_runbook: Option<String>,
    pub created_at_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketSummary {
    pub ticket_id: String,
    pub signature_id: String,
    pub playbook_id: Option<String>,
    pub status: String,
    pub created_at_ms: u64,
    pub updated_at_ms: Option<u64>,
    pub result_message: String,
    pub escalated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceWindowSummary {
    pub id: String,
    pub scope: MaintenanceScope,
    pub start_ms: u64,
    pub end_ms: u64,
    pub suppress_escalation: bool,
    pub suppress_remediation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionListsSummary {
    pub services: Vec<String>,
    pub processes: Vec<String>,
    pub signatures: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Ok,
    Error { message: String },
    Status(StatusSummary),
    PendingList { items: Vec<PendingActionSummary> },
    ExclusionLists(ExclusionListsSummary),
    MaintenanceList { windows: Vec<MaintenanceWindowSummary> },
    TicketList { items: Vec<TicketSummary> },
    TicketDetail(TicketSummary),
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire frame vocabulary (§6). Tagged JSON enums, one constructor per
//! message type the agent sends or the server sends back. Fields the
//! pipeline domain doesn't act on travel as `serde_json::Value` rather
//! than being typed out fully — the server's payload shapes vary (some
//! nest under `data`, some are root-flattened) and the domain only reads
//! what it needs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Messages the agent sends to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundFrame {
    #[serde(rename = "register")]
    Register {
        device_id: String,
        tenant_id: String,
        hostname: String,
        agent_version: String,
    },
    #[serde(rename = "heartbeat")]
    Heartbeat { device_id: String },
    #[serde(rename = "telemetry")]
    Telemetry { data: Value },
    #[serde(rename = "escalation")]
    Escalation { data: Value },
    #[serde(rename = "batch_escalation")]
    BatchEscalation { data: Value },
    #[serde(rename = "action_result")]
    ActionResult { data: Value },
    #[serde(rename = "playbook_result")]
    PlaybookResult { data: Value },
    #[serde(rename = "diagnostic_result")]
    DiagnosticResult { data: Value },
    #[serde(rename = "reinvestigation_request")]
    ReinvestigationRequest { data: Value },
    #[serde(rename = "proactive-action")]
    ProactiveAction { data: Value },
    #[serde(rename = "hardware-health-report")]
    HardwareHealthReport { data: Value },
    #[serde(rename = "user-prompt-response")]
    UserPromptResponse { data: Value },
}

impl OutboundFrame {
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Null)
    }
}

/// Messages the server sends to the agent.
///
/// `data` carries whatever the server put in a nested `data` object, when
/// it used one; flattened fields are recovered by the caller from the raw
/// value via [`InboundFrame::raw`] since `#[serde(flatten)]` onto a
/// catch-all is how this crate copes with the server mixing both shapes
/// (§9: "must accept both for decision/execute_pending_action/
/// cancel_pending_action").
#[derive(Debug, Clone, Deserialize)]
pub struct InboundFrame {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub raw: Value,
}

impl InboundFrame {
    /// Field read from a nested `data` object if present, else from the
    /// root of the frame.
    pub fn field<'a>(&'a self, name: &str) -> Option<&'a Value> {
        self.raw
            .get("data")
            .and_then(|d| d.get(name))
            .or_else(|| self.raw.get(name))
    }

    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }
}

/// Well-known inbound message type tags (§6). Not exhaustive of every
/// field shape — see [`InboundFrame::field`] for payload access.
pub mod inbound_kind {
    pub const WELCOME: &str = "welcome";
    pub const PONG: &str = "pong";
    pub const ACK: &str = "ack";
    pub const DECISION: &str = "decision";
    pub const ADVISORY: &str = "advisory";
    pub const TICKET_CREATED: &str = "ticket_created";
    pub const PLAYBOOK: &str = "playbook";
    pub const EXECUTE_PLAYBOOK: &str = "execute_playbook";
    pub const DIAGNOSTIC_REQUEST: &str = "diagnostic_request";
    pub const DIAGNOSTIC_COMPLETE: &str = "diagnostic_complete";
    pub const ADD_TO_IGNORE_LIST: &str = "add_to_ignore_list";
    pub const REINVESTIGATION_RESPONSE: &str = "reinvestigation_response";
    pub const FORCE_DIAGNOSTIC: &str = "force-diagnostic";
    pub const CONFIG_UPDATE: &str = "config-update";
    pub const UPDATE_AVAILABLE: &str = "update-available";
    pub const SESSION_EXPIRED: &str = "session_expired";
    pub const AUTH_FAILED: &str = "auth_failed";
    pub const BILLING_EXPIRED: &str = "billing_expired";
    pub const SERVICE_ALERT: &str = "service-alert";
    pub const SERVICE_ALERT_RESOLVED: &str = "service-alert-resolved";
    pub const USER_PROMPT: &str = "user-prompt";
    pub const EXECUTE_PENDING_ACTION: &str = "execute_pending_action";
    pub const CANCEL_PENDING_ACTION: &str = "cancel_pending_action";
    pub const MAINTENANCE_WINDOW: &str = "maintenance_window";
    pub const CANCEL_MAINTENANCE_WINDOW: &str = "cancel_maintenance_window";
    pub const KEY_ROTATION: &str = "key_rotation";
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;

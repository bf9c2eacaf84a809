// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects the pipeline domain hands to the runtime for execution.
//!
//! The domain itself never touches a subprocess, a socket, or a clock timer
//! directly — it returns `Effect` values and the runtime executes them,
//! feeding any resulting `Event` back in.

use crate::event::Event;
use crate::playbook::PlaybookTaskId;
use crate::runbook::StepKind;
use crate::timer::TimerId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Effects that need to be executed by the runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Emit an event into the system event bus / WAL.
    Emit { event: Event },

    /// Execute one playbook step (shell-invoke, service-control, file-op, …).
    ExecuteStep {
        task_id: PlaybookTaskId,
        step_name: String,
        kind: StepKind,
        /// Action string with `{{placeholders}}` already resolved.
        action: String,
        parameters: HashMap<String, String>,
        timeout_secs: u64,
        /// True for rollback steps run after a failed non-verification step.
        is_rollback: bool,
    },

    /// Send a frame to the server over the duplex transport.
    SendTransportMessage { frame: serde_json::Value },

    /// Run a bounded diagnostic collector ahead of an escalation.
    RunDiagnostic { category: String, budget_ms: u64 },

    /// Set a timer (batching window, cooldown, flap quiet, heartbeat, …).
    SetTimer {
        id: TimerId,
        #[serde(with = "duration_serde")]
        duration: Duration,
    },

    /// Cancel a previously-set timer.
    CancelTimer { id: TimerId },

    /// Send a desktop / UI notification.
    Notify { title: String, message: String },

    /// Persist one of the whole-file JSON state documents.
    PersistState { file: String },
}

impl Effect {
    /// Effect name for log spans (e.g. "execute_step", "send_transport_message").
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Emit { .. } => "emit",
            Effect::ExecuteStep { .. } => "execute_step",
            Effect::SendTransportMessage { .. } => "send_transport_message",
            Effect::RunDiagnostic { .. } => "run_diagnostic",
            Effect::SetTimer { .. } => "set_timer",
            Effect::CancelTimer { .. } => "cancel_timer",
            Effect::Notify { .. } => "notify",
            Effect::PersistState { .. } => "persist_state",
        }
    }

    /// Key-value pairs for structured logging.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::Emit { event } => vec![("event", event.log_summary())],
            Effect::ExecuteStep {
                task_id,
                step_name,
                kind,
                is_rollback,
                ..
            } => vec![
                ("task_id", task_id.to_string()),
                ("step", step_name.clone()),
                ("kind", format!("{kind:?}")),
                ("rollback", is_rollback.to_string()),
            ],
            Effect::SendTransportMessage { frame } => {
                let msg_type = frame
                    .get("type")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown");
                vec![("type", msg_type.to_string())]
            }
            Effect::RunDiagnostic {
                category,
                budget_ms,
            } => vec![
                ("category", category.clone()),
                ("budget_ms", budget_ms.to_string()),
            ],
            Effect::SetTimer { id, duration } => vec![
                ("timer_id", id.to_string()),
                ("duration_ms", duration.as_millis().to_string()),
            ],
            Effect::CancelTimer { id } => vec![("timer_id", id.to_string())],
            Effect::Notify { title, .. } => vec![("title", title.clone())],
            Effect::PersistState { file } => vec![("file", file.clone())],
        }
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, s: S) -> Result<S::Ok, S::Error> {
        duration.as_millis().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(d)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;

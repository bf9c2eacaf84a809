// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events recorded on the pipeline domain's write-ahead log.
//!
//! Every mutation the pipeline domain makes to State Tracker, Remediation
//! Memory, the Pending-Action Store, or tickets is represented as an `Event`
//! before it touches any in-memory table, so the domain's state can be
//! rebuilt by replaying the log from a snapshot.

use crate::decision::{IgnoreCategory, PipelineDecision};
use crate::id::ShortId;
use crate::memory::Outcome;
use crate::playbook::PlaybookTaskId;
use crate::runbook::RunbookId;
use crate::signature::{Signature, SignatureId};
use crate::ticket::{TicketId, TicketStatus};
use crate::timer::TimerId;
use serde::{Deserialize, Serialize};

/// Events that trigger state transitions in the pipeline domain.
///
/// Serializes with `{"type": "event:name", ...fields}` format.
/// Unknown type tags deserialize to `Custom` so older readers can skip
/// events introduced by a newer writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    // -- resource state --
    #[serde(rename = "resource:transitioned")]
    ResourceTransitioned {
        resource_id: String,
        state: String,
        severity: String,
        timestamp_ms: u64,
    },

    #[serde(rename = "resource:flap_detected")]
    ResourceFlapDetected {
        resource_id: String,
        transition_count: usize,
        timestamp_ms: u64,
    },

    #[serde(rename = "resource:flap_cleared")]
    ResourceFlapCleared { resource_id: String },

    #[serde(rename = "resource:escalated_by_persistence")]
    ResourceEscalatedByPersistence {
        resource_id: String,
        raised_severity: String,
    },

    // -- signature --
    #[serde(rename = "signature:generated")]
    SignatureGenerated {
        signature_id: SignatureId,
        confidence: u8,
    },

    // -- decision --
    #[serde(rename = "decision:made")]
    DecisionMade {
        signature_id: SignatureId,
        decision: PipelineDecision,
    },

    // -- escalation --
    #[serde(rename = "escalation:enqueued")]
    EscalationEnqueued { signature_id: SignatureId },

    #[serde(rename = "escalation:sent")]
    EscalationSent {
        signature_id: SignatureId,
        batched_with: Vec<SignatureId>,
        timestamp_ms: u64,
    },

    #[serde(rename = "escalation:dropped")]
    EscalationDropped {
        signature_id: SignatureId,
        reason: String,
    },

    // -- server message --
    #[serde(rename = "server_message:received")]
    ServerMessageReceived { message_type: String },

    #[serde(rename = "server_message:rejected")]
    ServerMessageRejected {
        message_type: String,
        reason: String,
    },

    // -- ticket --
    #[serde(rename = "ticket:opened")]
    TicketOpened {
        ticket_id: TicketId,
        signature_id: SignatureId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        playbook_id: Option<RunbookId>,
        status: TicketStatus,
        timestamp_ms: u64,
    },

    #[serde(rename = "ticket:closed")]
    TicketClosed {
        ticket_id: TicketId,
        status: TicketStatus,
        message: String,
        timestamp_ms: u64,
    },

    // -- pending action --
    #[serde(rename = "pending_action:created")]
    PendingActionCreated {
        signature_id: SignatureId,
        ticket_id: TicketId,
        /// Full signature, carried so the pending action can be reconstructed
        /// from the WAL alone without re-deriving it from the signal that
        /// produced it.
        signature: Signature,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        matched_runbook: Option<RunbookId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        server_message: Option<serde_json::Value>,
        timestamp_ms: u64,
    },

    #[serde(rename = "pending_action:executed")]
    PendingActionExecuted { signature_id: SignatureId },

    #[serde(rename = "pending_action:cancelled")]
    PendingActionCancelled { signature_id: SignatureId },

    // -- playbook queue --
    #[serde(rename = "playbook:enqueued")]
    PlaybookEnqueued {
        task_id: PlaybookTaskId,
        runbook_id: RunbookId,
        timestamp_ms: u64,
    },

    #[serde(rename = "playbook:rejected")]
    PlaybookRejected { task_id: PlaybookTaskId, reason: String },

    #[serde(rename = "playbook:step_started")]
    PlaybookStepStarted {
        task_id: PlaybookTaskId,
        step_name: String,
    },

    #[serde(rename = "playbook:step_completed")]
    PlaybookStepCompleted {
        task_id: PlaybookTaskId,
        step_name: String,
        #[serde(default)]
        was_rollback: bool,
    },

    #[serde(rename = "playbook:step_failed")]
    PlaybookStepFailed {
        task_id: PlaybookTaskId,
        step_name: String,
        error: String,
    },

    #[serde(rename = "playbook:completed")]
    PlaybookCompleted {
        task_id: PlaybookTaskId,
        outcome: Outcome,
        duration_ms: u64,
    },

    // -- memory --
    #[serde(rename = "memory:attempt_recorded")]
    MemoryAttemptRecorded {
        playbook_id: RunbookId,
        signal_key: String,
        device_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        resource_name: Option<String>,
        outcome: Outcome,
        duration_ms: u64,
        timestamp_ms: u64,
    },

    #[serde(rename = "memory:dampening_reset")]
    MemoryDampeningReset { signal_key: String, device_id: String },

    #[serde(rename = "memory:attempts_pruned")]
    MemoryAttemptsPruned { now_ms: u64 },

    // -- exclusion --
    #[serde(rename = "exclusion:added")]
    ExclusionAdded {
        category: IgnoreCategory,
        name: String,
    },

    #[serde(rename = "exclusion:removed")]
    ExclusionRemoved {
        category: IgnoreCategory,
        name: String,
    },

    // -- maintenance --
    #[serde(rename = "maintenance:window_created")]
    MaintenanceWindowCreated {
        window: crate::maintenance::MaintenanceWindow,
    },

    #[serde(rename = "maintenance:window_expired")]
    MaintenanceWindowExpired { window_id: String },

    // -- transport --
    #[serde(rename = "transport:connected")]
    TransportConnected { session_id: String },

    #[serde(rename = "transport:disconnected")]
    TransportDisconnected { reason: String },

    #[serde(rename = "transport:session_invalidated")]
    TransportSessionInvalidated { reason: String },

    // -- timer --
    #[serde(rename = "timer:fired")]
    TimerFired { id: TimerId },

    // -- system --
    #[serde(rename = "system:shutdown")]
    Shutdown,

    /// Catch-all for unknown event types (extensibility).
    #[serde(other, skip_serializing)]
    Custom,
}

impl Event {
    pub fn name(&self) -> &str {
        match self {
            Event::ResourceTransitioned { .. } => "resource:transitioned",
            Event::ResourceFlapDetected { .. } => "resource:flap_detected",
            Event::ResourceFlapCleared { .. } => "resource:flap_cleared",
            Event::ResourceEscalatedByPersistence { .. } => "resource:escalated_by_persistence",
            Event::SignatureGenerated { .. } => "signature:generated",
            Event::DecisionMade { .. } => "decision:made",
            Event::EscalationEnqueued { .. } => "escalation:enqueued",
            Event::EscalationSent { .. } => "escalation:sent",
            Event::EscalationDropped { .. } => "escalation:dropped",
            Event::ServerMessageReceived { .. } => "server_message:received",
            Event::ServerMessageRejected { .. } => "server_message:rejected",
            Event::TicketOpened { .. } => "ticket:opened",
            Event::TicketClosed { .. } => "ticket:closed",
            Event::PendingActionCreated { .. } => "pending_action:created",
            Event::PendingActionExecuted { .. } => "pending_action:executed",
            Event::PendingActionCancelled { .. } => "pending_action:cancelled",
            Event::PlaybookEnqueued { .. } => "playbook:enqueued",
            Event::PlaybookRejected { .. } => "playbook:rejected",
            Event::PlaybookStepStarted { .. } => "playbook:step_started",
            Event::PlaybookStepCompleted { .. } => "playbook:step_completed",
            Event::PlaybookStepFailed { .. } => "playbook:step_failed",
            Event::PlaybookCompleted { .. } => "playbook:completed",
            Event::MemoryAttemptRecorded { .. } => "memory:attempt_recorded",
            Event::MemoryDampeningReset { .. } => "memory:dampening_reset",
            Event::ExclusionAdded { .. } => "exclusion:added",
            Event::ExclusionRemoved { .. } => "exclusion:removed",
            Event::MaintenanceWindowCreated { .. } => "maintenance:window_created",
            Event::MaintenanceWindowExpired { .. } => "maintenance:window_expired",
            Event::TransportConnected { .. } => "transport:connected",
            Event::TransportDisconnected { .. } => "transport:disconnected",
            Event::TransportSessionInvalidated { .. } => "transport:session_invalidated",
            Event::TimerFired { .. } => "timer:fired",
            Event::Shutdown => "system:shutdown",
            Event::Custom => "custom",
        }
    }

    pub fn log_summary(&self) -> String {
        let t = self.name();
        match self {
            Event::ResourceTransitioned {
                resource_id, state, ..
            } => format!("{t} resource={resource_id} state={state}"),
            Event::ResourceFlapDetected {
                resource_id,
                transition_count,
                ..
            } => format!("{t} resource={resource_id} transitions={transition_count}"),
            Event::ResourceFlapCleared { resource_id } => format!("{t} resource={resource_id}"),
            Event::ResourceEscalatedByPersistence { resource_id, .. } => {
                format!("{t} resource={resource_id}")
            }
            Event::SignatureGenerated {
                signature_id,
                confidence,
            } => format!("{t} sig={} confidence={confidence}", signature_id.short(12)),
            Event::DecisionMade { signature_id, .. } => {
                format!("{t} sig={}", signature_id.short(12))
            }
            Event::EscalationEnqueued { signature_id } => {
                format!("{t} sig={}", signature_id.short(12))
            }
            Event::EscalationSent {
                signature_id,
                batched_with,
                ..
            } => format!(
                "{t} sig={} batch_size={}",
                signature_id.short(12),
                batched_with.len() + 1
            ),
            Event::EscalationDropped { signature_id, reason } => {
                format!("{t} sig={} reason={reason}", signature_id.short(12))
            }
            Event::ServerMessageReceived { message_type } => format!("{t} msg_type={message_type}"),
            Event::ServerMessageRejected {
                message_type,
                reason,
            } => format!("{t} msg_type={message_type} reason={reason}"),
            Event::TicketOpened { ticket_id, .. } => format!("{t} ticket={ticket_id}"),
            Event::TicketClosed {
                ticket_id, status, ..
            } => format!("{t} ticket={ticket_id} status={status}"),
            Event::PendingActionCreated { signature_id, .. } => {
                format!("{t} sig={}", signature_id.short(12))
            }
            Event::PendingActionExecuted { signature_id } => {
                format!("{t} sig={}", signature_id.short(12))
            }
            Event::PendingActionCancelled { signature_id } => {
                format!("{t} sig={}", signature_id.short(12))
            }
            Event::PlaybookEnqueued { task_id, runbook_id, .. } => {
                format!("{t} task={task_id} runbook={runbook_id}")
            }
            Event::PlaybookRejected { task_id, reason } => {
                format!("{t} task={task_id} reason={reason}")
            }
            Event::PlaybookStepStarted { task_id, step_name } => {
                format!("{t} task={task_id} step={step_name}")
            }
            Event::PlaybookStepCompleted { task_id, step_name, .. } => {
                format!("{t} task={task_id} step={step_name}")
            }
            Event::PlaybookStepFailed {
                task_id, step_name, ..
            } => format!("{t} task={task_id} step={step_name}"),
            Event::PlaybookCompleted {
                task_id, outcome, ..
            } => format!("{t} task={task_id} outcome={outcome:?}"),
            Event::MemoryAttemptRecorded {
                playbook_id,
                signal_key,
                device_id,
                outcome,
                ..
            } => format!(
                "{t} playbook={playbook_id} signal={signal_key} device={device_id} outcome={outcome:?}"
            ),
            Event::MemoryDampeningReset {
                signal_key,
                device_id,
            } => format!("{t} signal={signal_key} device={device_id}"),
            Event::ExclusionAdded { category, name } => {
                format!("{t} category={category:?} name={name}")
            }
            Event::ExclusionRemoved { category, name } => {
                format!("{t} category={category:?} name={name}")
            }
            Event::MaintenanceWindowCreated { window } => {
                format!("{t} window={}", window.id)
            }
            Event::MaintenanceWindowExpired { window_id } => format!("{t} window={window_id}"),
            Event::TransportConnected { session_id } => format!("{t} session={session_id}"),
            Event::TransportDisconnected { reason } => format!("{t} reason={reason}"),
            Event::TransportSessionInvalidated { reason } => format!("{t} reason={reason}"),
            Event::TimerFired { id } => format!("{t} id={id}"),
            Event::Shutdown | Event::Custom => t.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;

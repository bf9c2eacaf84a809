// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state from WAL replay.

use warden_core::{
    ActionTicket, Event, ExclusionLists, MaintenanceWindow, PendingAction, RemediationMemory,
    ResourceState, Severity, Transition,
};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn parse_severity(s: &str) -> Severity {
    match s {
        "warning" => Severity::Warning,
        "critical" => Severity::Critical,
        "high" => Severity::High,
        _ => Severity::Info,
    }
}

/// Materialized state built from WAL replay. Covers everything the pipeline
/// domain (C1–C9) must recover after a restart: per-resource history, the
/// RemediationMemory stat tables, exclusion lists, maintenance windows,
/// tickets, and pending actions awaiting human review.
///
/// The Playbook Queue (C10) itself is not part of this snapshot — it is
/// rebuilt at startup from open tickets, not replayed event-by-event.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MaterializedState {
    pub resources: HashMap<String, ResourceState>,
    #[serde(default)]
    pub memory: RemediationMemory,
    #[serde(default)]
    pub exclusions: ExclusionLists,
    #[serde(default)]
    pub maintenance_windows: HashMap<String, MaintenanceWindow>,
    #[serde(default)]
    pub tickets: HashMap<String, ActionTicket>,
    /// Keyed by `signature_id`.
    #[serde(default)]
    pub pending_actions: HashMap<String, PendingAction>,
}

impl MaterializedState {
    /// Get a ticket by ID or unique prefix (like git commit hashes).
    pub fn get_ticket(&self, id: &str) -> Option<&ActionTicket> {
        if let Some(ticket) = self.tickets.get(id) {
            return Some(ticket);
        }
        let matches: Vec<_> = self
            .tickets
            .iter()
            .filter(|(k, _)| k.starts_with(id))
            .collect();
        if matches.len() == 1 {
            Some(matches[0].1)
        } else {
            None
        }
    }

    /// Apply an event to derive state changes.
    ///
    /// State is derived from events, never mutated directly by callers.
    /// Handlers must be idempotent: replaying the same event twice (once for
    /// immediate visibility, once during WAL replay after a crash) must
    /// leave state identical to applying it once.
    pub fn apply_event(&mut self, event: &Event) {
        match event {
            Event::ResourceTransitioned {
                resource_id,
                state,
                severity,
                timestamp_ms,
            } => {
                let severity = parse_severity(severity);
                if !self.resources.contains_key(resource_id) {
                    let resource_type =
                        resource_id.split(':').next().unwrap_or_default().to_string();
                    self.resources.insert(
                        resource_id.clone(),
                        ResourceState::new(
                            resource_id.clone(),
                            resource_type,
                            state.clone(),
                            severity,
                            *timestamp_ms,
                        ),
                    );
                    return;
                }
                let entry = self.resources.get_mut(resource_id).expect("checked above");
                if entry.current_state == *state && entry.severity == severity {
                    return;
                }
                entry.transitions.push(Transition {
                    state: state.clone(),
                    severity,
                    timestamp_ms: *timestamp_ms,
                });
                entry.current_state = state.clone();
                entry.severity = severity;
                entry.last_change_ms = *timestamp_ms;
                if severity == Severity::Info {
                    entry.non_ok_since_ms = None;
                    entry.escalated = false;
                } else if entry.non_ok_since_ms.is_none() {
                    entry.non_ok_since_ms = Some(*timestamp_ms);
                }
            }

            Event::ResourceFlapDetected { resource_id, .. } => {
                if let Some(entry) = self.resources.get_mut(resource_id) {
                    entry.flapping = true;
                }
            }

            Event::ResourceFlapCleared { resource_id } => {
                if let Some(entry) = self.resources.get_mut(resource_id) {
                    entry.flapping = false;
                    entry.transitions.clear();
                }
            }

            Event::ResourceEscalatedByPersistence {
                resource_id,
                raised_severity,
            } => {
                if let Some(entry) = self.resources.get_mut(resource_id) {
                    entry.severity = parse_severity(raised_severity);
                    entry.escalated = true;
                }
            }

            Event::TicketOpened {
                ticket_id,
                signature_id,
                playbook_id,
                status,
                timestamp_ms,
            } => {
                // Idempotency: skip if already exists.
                if !self.tickets.contains_key(ticket_id.as_str()) {
                    self.tickets.insert(
                        ticket_id.as_str().to_string(),
                        ActionTicket::new(
                            ticket_id.clone(),
                            signature_id.clone(),
                            playbook_id.clone(),
                            *status,
                            *timestamp_ms,
                        ),
                    );
                }
            }

            Event::TicketClosed {
                ticket_id,
                status,
                message,
                timestamp_ms,
            } => {
                if let Some(ticket) = self.tickets.get_mut(ticket_id.as_str()) {
                    ticket.close(*status, message.clone(), *timestamp_ms);
                }
            }

            Event::PendingActionCreated {
                signature_id,
                ticket_id,
                signature,
                matched_runbook,
                server_message,
                timestamp_ms,
            } => {
                // Idempotency: skip if already present for this signature.
                self.pending_actions
                    .entry(signature_id.as_str().to_string())
                    .or_insert_with(|| PendingAction {
                        signature_id: signature_id.clone(),
                        ticket_id: ticket_id.clone(),
                        signature: signature.clone(),
                        matched_runbook: matched_runbook.clone(),
                        server_message: server_message.clone(),
                        created_at_ms: *timestamp_ms,
                    });
            }

            Event::PendingActionExecuted { signature_id }
            | Event::PendingActionCancelled { signature_id } => {
                self.pending_actions.remove(signature_id.as_str());
            }

            Event::MemoryAttemptRecorded {
                playbook_id,
                signal_key,
                device_id,
                resource_name,
                outcome,
                duration_ms,
                timestamp_ms,
            } => {
                self.memory.record_attempt(
                    playbook_id.as_str(),
                    signal_key,
                    device_id,
                    resource_name.as_deref(),
                    *outcome,
                    *duration_ms,
                    None,
                    *timestamp_ms,
                );
            }

            Event::MemoryDampeningReset {
                signal_key,
                device_id,
            } => {
                self.memory.reset_dampening(signal_key, device_id);
            }

            Event::MemoryAttemptsPruned { now_ms } => {
                self.memory.prune_attempts(*now_ms);
            }

            Event::ExclusionAdded { category, name } => {
                self.exclusions.add(to_exclusion_category(*category), name.clone());
            }

            Event::ExclusionRemoved { category, name } => {
                self.exclusions.remove(to_exclusion_category(*category), name);
            }

            Event::MaintenanceWindowCreated { window } => {
                self.maintenance_windows
                    .entry(window.id.as_str().to_string())
                    .or_insert_with(|| window.clone());
            }

            Event::MaintenanceWindowExpired { window_id } => {
                self.maintenance_windows.remove(window_id);
            }

            // Events that don't affect persisted state: transient queue,
            // transport, and timer bookkeeping handled entirely in memory.
            Event::SignatureGenerated { .. }
            | Event::DecisionMade { .. }
            | Event::EscalationEnqueued { .. }
            | Event::EscalationSent { .. }
            | Event::EscalationDropped { .. }
            | Event::ServerMessageReceived { .. }
            | Event::ServerMessageRejected { .. }
            | Event::PlaybookEnqueued { .. }
            | Event::PlaybookRejected { .. }
            | Event::PlaybookStepStarted { .. }
            | Event::PlaybookStepCompleted { .. }
            | Event::PlaybookStepFailed { .. }
            | Event::PlaybookCompleted { .. }
            | Event::TransportConnected { .. }
            | Event::TransportDisconnected { .. }
            | Event::TransportSessionInvalidated { .. }
            | Event::TimerFired { .. }
            | Event::Custom
            | Event::Shutdown => {}
        }
    }
}

fn to_exclusion_category(
    category: warden_core::IgnoreCategory,
) -> warden_core::ExclusionCategory {
    match category {
        warden_core::IgnoreCategory::Services => warden_core::ExclusionCategory::Services,
        warden_core::IgnoreCategory::Processes => warden_core::ExclusionCategory::Processes,
        warden_core::IgnoreCategory::Signatures => warden_core::ExclusionCategory::Signatures,
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;

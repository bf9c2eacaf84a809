// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The pipeline domain (§5): the single serialized owner of everything
//! that isn't already captured in `MaterializedState` or the shared
//! `Scheduler` — the Behavioral Profiler's baselines, the Playbook Queue,
//! the loaded runbook registry, the dependency DAG, the escalation
//! cooldown/batch maps, and the transport's connectivity flag.
//!
//! Every public entry point takes a `&MaterializedState` snapshot and
//! returns the `Effect`s the runtime must carry out; the domain itself
//! never touches a socket, a subprocess, or the WAL. `Effect::Emit` is
//! what eventually mutates `MaterializedState`, via `Executor::execute`
//! (not here) — so every decision in this module reads the *pre-signal*
//! snapshot, which is exactly what the gate functions it calls expect.

use crate::decision_engine::{apply_server_decision, decide, ServerDecisionOutcome};
use crate::error::EngineError;
use crate::escalation::{self, EscalationGate, ESCALATION_COOLDOWN_MS};
use crate::playbook_queue::{self, AdmissionOutcome};
use crate::profiler::Profiler;
use crate::signature_generator;
use crate::state_tracker::{StateTracker, StateTrackerConfig};
use crate::maintenance_gate::MaintenanceGate;
use crate::PlaybookQueue;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use warden_core::decision::{IgnoreCategory, ServerDecision};
use warden_core::memory::ResourceStats;
use warden_core::playbook::{PlaybookTask, PlaybookTaskId, Priority, Source};
use warden_core::runbook::{Runbook, RunbookId};
use warden_core::signature::{Signature, SignatureContext, SignatureId};
use warden_core::ticket::{TicketId, TicketStatus};
use warden_core::{Effect, Event, IdGen, Severity, Signal, TimerId, UuidIdGen};
use warden_storage::MaterializedState;
use warden_transport::{InboundFrame, SigningKey};

/// Last N action summaries carried in every escalation payload (§4.9).
const RECENT_ACTIONS_CAPACITY: usize = 3;

/// How many freshly generated signatures we keep around in memory so a
/// later server `decision` reply (which only carries the `signature_id`)
/// can be turned into a pending action without re-deriving it. Signatures
/// outlive this cache only once they're written into a `PendingAction` by
/// [`Event::PendingActionCreated`], which persists them for real.
const RECENT_SIGNATURES_CAPACITY: usize = 64;

fn resource_confidence_modifier(memory: &warden_core::RemediationMemory, signal_key: &str, target: &str) -> f64 {
    memory
        .resources
        .get(&format!("{signal_key}:{target}"))
        .map(ResourceStats::confidence_modifier)
        .unwrap_or(1.0)
}

/// Everything the domain needs to know about the device it runs on, fixed
/// for the process lifetime.
#[derive(Debug, Clone)]
pub struct DeviceContext {
    pub tenant_id: String,
    pub device_id: String,
    pub signature_context: SignatureContext,
}

pub struct PipelineDomain<G: IdGen = UuidIdGen> {
    id_gen: G,
    device: DeviceContext,
    state_tracker: StateTracker,
    maintenance_gate: MaintenanceGate,
    profiler: Profiler,
    queue: PlaybookQueue,
    /// Runbook registry keyed by the `signal_key` it was authored to
    /// remediate (§4.5's matching step).
    runbooks_by_signal: HashMap<String, Arc<Runbook>>,
    runbooks_by_id: HashMap<String, Arc<Runbook>>,
    dependency_dag: HashMap<String, Vec<String>>,
    /// Keyed by `signature_id`; swept lazily on lookup (§9: "no separate
    /// sweep task").
    escalation_cooldowns: HashMap<String, u64>,
    /// Per-signature cooldown override from a server `decision.cooldown_override`;
    /// falls back to [`ESCALATION_COOLDOWN_MS`] when absent.
    cooldown_overrides: HashMap<String, u64>,
    pending_batch: Vec<Signature>,
    recent_actions: VecDeque<String>,
    recent_signatures: VecDeque<Signature>,
    signing_key: Option<SigningKey>,
    transport_connected: bool,
}

impl PipelineDomain<UuidIdGen> {
    pub fn new(device: DeviceContext) -> Self {
        Self::with_id_gen(device, UuidIdGen)
    }
}

impl<G: IdGen> PipelineDomain<G> {
    pub fn with_id_gen(device: DeviceContext, id_gen: G) -> Self {
        Self {
            id_gen,
            device,
            state_tracker: StateTracker::new(StateTrackerConfig::default()),
            maintenance_gate: MaintenanceGate::new(),
            profiler: Profiler::new(),
            queue: PlaybookQueue::new(),
            runbooks_by_signal: HashMap::new(),
            runbooks_by_id: HashMap::new(),
            dependency_dag: HashMap::new(),
            escalation_cooldowns: HashMap::new(),
            cooldown_overrides: HashMap::new(),
            pending_batch: Vec::new(),
            recent_actions: VecDeque::with_capacity(RECENT_ACTIONS_CAPACITY),
            recent_signatures: VecDeque::with_capacity(RECENT_SIGNATURES_CAPACITY),
            signing_key: None,
            transport_connected: false,
        }
    }

    pub fn with_profiler(mut self, profiler: Profiler) -> Self {
        self.profiler = profiler;
        self
    }

    pub fn profiler(&self) -> &Profiler {
        &self.profiler
    }

    pub fn device(&self) -> &DeviceContext {
        &self.device
    }

    pub fn register_runbook(&mut self, signal_key: impl Into<String>, runbook: Arc<Runbook>) {
        self.runbooks_by_id.insert(runbook.id.as_str().to_string(), Arc::clone(&runbook));
        self.runbooks_by_signal.insert(signal_key.into(), runbook);
    }

    pub fn set_dependency_dag(&mut self, dag: HashMap<String, Vec<String>>) {
        self.dependency_dag = dag;
    }

    pub fn set_signing_key(&mut self, key: Option<SigningKey>) {
        self.signing_key = key;
    }

    pub fn set_transport_connected(&mut self, connected: bool) {
        self.transport_connected = connected;
    }

    pub fn transport_connected(&self) -> bool {
        self.transport_connected
    }

    pub fn queue(&self) -> &PlaybookQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut PlaybookQueue {
        &mut self.queue
    }

    fn note_recent_action(&mut self, summary: impl Into<String>) {
        if self.recent_actions.len() == RECENT_ACTIONS_CAPACITY {
            self.recent_actions.pop_front();
        }
        self.recent_actions.push_back(summary.into());
    }

    fn cache_signature(&mut self, signature: &Signature) {
        if self.recent_signatures.len() == RECENT_SIGNATURES_CAPACITY {
            self.recent_signatures.pop_front();
        }
        self.recent_signatures.push_back(signature.clone());
    }

    fn find_cached_signature(&self, signature_id: &str) -> Option<&Signature> {
        self.recent_signatures.iter().find(|s| s.signature_id.as_str() == signature_id)
    }

    /// The gate chain plus C5-C10, for one freshly normalized Signal
    /// (§5's ordering: maintenance -> state-tracker -> dependency
    /// suppression -> flap rewrite -> profiler consult -> sustained-breach
    /// hysteresis -> signature -> decision -> execute/escalate).
    pub fn handle_signal(&mut self, state: &MaterializedState, signal: Signal, now_ms: u64, hour_of_day: u8) -> Vec<Effect> {
        self.profiler.record_sample(&signal.signal_key, hour_of_day, signal.value);

        let maintenance = self.maintenance_gate.check(
            state.maintenance_windows.values(),
            &signal.target,
            &signal.resource_id,
            now_ms,
        );
        if maintenance.is_suppressed() {
            return Vec::new();
        }

        let mut effects = Vec::new();

        let Some(transition) = self.state_tracker.check_state(&state.resources, &signal) else {
            return effects;
        };
        effects.push(Effect::Emit { event: transition });

        if self.state_tracker.is_dependency_suppressed(&state.resources, &self.dependency_dag, &signal) {
            return effects;
        }

        let mut working_signal = signal;
        if let Some((flap_signal, flap_event)) = self.state_tracker.flap_rewrite(&state.resources, &working_signal) {
            effects.push(Effect::Emit { event: flap_event });
            working_signal = flap_signal;
        }

        if !self.profiler.should_emit(&working_signal, hour_of_day) {
            return effects;
        }

        if let Some(sustained_event) = self.state_tracker.sustained_breach(&state.resources, &working_signal) {
            if let Event::ResourceEscalatedByPersistence { raised_severity, .. } = &sustained_event {
                if let Ok(raised) = raised_severity.parse::<RaisedSeverity>() {
                    working_signal.severity = raised.0;
                }
            }
            effects.push(Effect::Emit { event: sustained_event });
        }

        effects.extend(self.decide_and_route(state, &working_signal, now_ms));
        effects
    }

    fn decide_and_route(&mut self, state: &MaterializedState, signal: &Signal, now_ms: u64) -> Vec<Effect> {
        let mut effects = Vec::new();
        let modifier = resource_confidence_modifier(&state.memory, &signal.signal_key, &signal.target);
        let signature = signature_generator::generate(
            &self.device.tenant_id,
            &self.device.device_id,
            signal,
            self.device.signature_context.clone(),
            modifier,
        );
        effects.push(Effect::Emit {
            event: Event::SignatureGenerated { signature_id: signature.signature_id.clone(), confidence: signature.confidence },
        });
        self.cache_signature(&signature);

        let matched = signature_generator::match_runbook(&signal.signal_key, &self.runbooks_by_signal).cloned();
        let decision = decide(&signal.signal_key, &self.device.device_id, &signature, matched.as_deref(), &state.memory, &state.exclusions);
        effects.push(Effect::Emit {
            event: Event::DecisionMade { signature_id: signature.signature_id.clone(), decision: decision.clone() },
        });

        match decision {
            warden_core::PipelineDecision::Ignore => {}
            warden_core::PipelineDecision::AwaitReview => {
                // Never returned by `decide` locally (§4.8) — only reachable
                // via a server `decision` reply, handled in `apply_decision`.
            }
            warden_core::PipelineDecision::ExecuteLocal { runbook_id } => {
                effects.extend(self.route_local_execution(state, &signal.signal_key, &signature, runbook_id, now_ms));
            }
            warden_core::PipelineDecision::Escalate => {
                effects.extend(self.route_escalation(signature, signal.severity, now_ms));
            }
        }
        effects
    }

    fn route_local_execution(
        &mut self,
        state: &MaterializedState,
        signal_key: &str,
        signature: &Signature,
        runbook_id: RunbookId,
        now_ms: u64,
    ) -> Vec<Effect> {
        let mut effects = Vec::new();
        let Some(runbook) = self.runbooks_by_id.get(runbook_id.as_str()).cloned() else {
            effects.extend(self.route_escalation(signature.clone(), signature.severity, now_ms));
            return effects;
        };

        let ticket_id = TicketId::new(self.id_gen.next());
        effects.push(Effect::Emit {
            event: Event::TicketOpened {
                ticket_id: ticket_id.clone(),
                signature_id: signature.signature_id.clone(),
                playbook_id: Some(runbook_id.clone()),
                status: TicketStatus::Open,
                timestamp_ms: now_ms,
            },
        });

        let task = PlaybookTask {
            id: PlaybookTaskId::new(self.id_gen.next()),
            runbook_id: runbook_id.clone(),
            parameters: signature.targets.first().map(|t| [("target".to_string(), t.name.clone())].into()).unwrap_or_default(),
            priority: priority_for(signature.severity),
            source: Source::Local,
            created_at_ms: now_ms,
            action_ticket_id: ticket_id.clone(),
            signature: None,
        };

        let target_name = signature.targets.first().map(|t| t.name.as_str());
        let admission = playbook_queue::evaluate_admission(
            &task,
            &runbook,
            self.signing_key.as_ref(),
            &state.memory,
            target_name,
            signal_key,
            &self.device.device_id,
        );

        match admission {
            AdmissionOutcome::Admit => match self.queue.enqueue(task.clone(), runbook) {
                Ok(()) => effects.push(Effect::Emit {
                    event: Event::PlaybookEnqueued { task_id: task.id.clone(), runbook_id, timestamp_ms: now_ms },
                }),
                Err(EngineError::QueueFull) => {
                    effects.push(Effect::Emit { event: Event::PlaybookRejected { task_id: task.id, reason: "queue full".into() } });
                }
                Err(e) => {
                    effects.push(Effect::Emit { event: Event::PlaybookRejected { task_id: task.id, reason: e.to_string() } });
                }
            },
            AdmissionOutcome::IgnoreInstruction => {
                effects.push(Effect::Emit {
                    event: Event::ExclusionAdded { category: IgnoreCategory::Signatures, name: signature.signature_id.as_str().to_string() },
                });
                effects.push(Effect::Emit {
                    event: Event::TicketClosed {
                        ticket_id,
                        status: TicketStatus::Resolved,
                        message: "suppressed by ignore-instruction playbook".into(),
                        timestamp_ms: now_ms,
                    },
                });
            }
            AdmissionOutcome::Rejected(reason) => {
                effects.push(Effect::Emit { event: Event::PlaybookRejected { task_id: task.id, reason: reason.clone() } });
                effects.push(Effect::Emit {
                    event: Event::TicketClosed { ticket_id, status: TicketStatus::Failed, message: reason, timestamp_ms: now_ms },
                });
            }
        }
        effects
    }

    fn route_escalation(&mut self, signature: Signature, severity: Severity, now_ms: u64) -> Vec<Effect> {
        let mut effects = Vec::new();
        let signature_id = signature.signature_id.as_str().to_string();
        let cooldown_ms = self.cooldown_overrides.get(&signature_id).copied().unwrap_or(ESCALATION_COOLDOWN_MS);
        let gate = escalation::check_gates(false, false, self.escalation_cooldowns.get(&signature_id).copied(), now_ms, cooldown_ms);
        if !gate.should_proceed() {
            let reason = match gate {
                EscalationGate::Cooldown => "cooldown",
                EscalationGate::AwaitingReview => "awaiting-review",
                EscalationGate::Ignored => "excluded",
                EscalationGate::Proceed => unreachable!("should_proceed checked above"),
            };
            effects.push(Effect::Emit { event: Event::EscalationDropped { signature_id: signature.signature_id, reason: reason.into() } });
            return effects;
        }

        match escalation::dispatch_plan(severity, self.transport_connected) {
            escalation::DispatchPlan::SendImmediately => {
                let payload = escalation::build_payload(
                    &self.device.tenant_id,
                    &self.device.device_id,
                    &signature,
                    false,
                    &self.recent_actions.iter().cloned().collect::<Vec<_>>(),
                    "recommend_playbook",
                    HashMap::new(),
                );
                self.escalation_cooldowns.insert(signature_id, now_ms);
                self.note_recent_action(format!("escalated {}", signature.signature_id.as_str()));
                effects.push(Effect::Emit {
                    event: Event::EscalationSent { signature_id: signature.signature_id, batched_with: Vec::new(), timestamp_ms: now_ms },
                });
                effects.push(Effect::SendTransportMessage {
                    frame: warden_transport::OutboundFrame::Escalation { data: serde_json::to_value(payload).unwrap_or_default() }.to_json(),
                });
            }
            escalation::DispatchPlan::Batch => {
                if self.pending_batch.is_empty() {
                    effects.push(Effect::SetTimer {
                        id: TimerId::batch_window("escalation"),
                        duration: std::time::Duration::from_secs(escalation::BATCH_WINDOW_SECS),
                    });
                }
                effects.push(Effect::Emit { event: Event::EscalationEnqueued { signature_id: signature.signature_id.clone() } });
                self.pending_batch.push(signature);
            }
            escalation::DispatchPlan::FallbackManualTicket => {
                let ticket_id = TicketId::new(self.id_gen.next());
                effects.push(Effect::Emit {
                    event: Event::TicketOpened {
                        ticket_id,
                        signature_id: signature.signature_id,
                        playbook_id: None,
                        status: TicketStatus::Open,
                        timestamp_ms: now_ms,
                    },
                });
            }
        }
        effects
    }

    /// Periodic maintenance sweep: flap-quiet resources, expired maintenance
    /// windows, and the daily attempts-log prune, each turned into the
    /// `Effect::Emit` that carries the mutation back through `MaterializedState`.
    /// Called from the timer tick, not from `handle_signal`.
    pub fn sweep(&mut self, state: &MaterializedState, now_ms: u64) -> Vec<Effect> {
        let mut effects = Vec::new();

        for resource_id in self.state_tracker.flap_cleared(&state.resources, now_ms) {
            effects.push(Effect::Emit { event: Event::ResourceFlapCleared { resource_id: resource_id.to_string() } });
        }

        for window_id in self.maintenance_gate.expired(state.maintenance_windows.values(), now_ms) {
            effects.push(Effect::Emit { event: Event::MaintenanceWindowExpired { window_id: window_id.as_str().to_string() } });
        }

        effects.push(Effect::Emit { event: Event::MemoryAttemptsPruned { now_ms } });

        effects
    }

    /// Fires when `TimerId::batch_window("escalation")` comes due: flush the
    /// accumulated batch as one `batch_escalation` frame (§4.9).
    pub fn flush_batch(&mut self, now_ms: u64) -> Vec<Effect> {
        if self.pending_batch.is_empty() {
            return Vec::new();
        }
        let batch = std::mem::take(&mut self.pending_batch);
        let ids: Vec<SignatureId> = batch.iter().map(|s| s.signature_id.clone()).collect();
        let payloads: Vec<_> = batch
            .iter()
            .map(|s| {
                escalation::build_payload(
                    &self.device.tenant_id,
                    &self.device.device_id,
                    s,
                    false,
                    &self.recent_actions.iter().cloned().collect::<Vec<_>>(),
                    "recommend_playbook",
                    HashMap::new(),
                )
            })
            .collect();
        for id in &ids {
            self.escalation_cooldowns.insert(id.as_str().to_string(), now_ms);
        }
        let primary = ids[0].clone();
        let batched_with = ids[1..].to_vec();
        vec![
            Effect::Emit { event: Event::EscalationSent { signature_id: primary, batched_with, timestamp_ms: now_ms } },
            Effect::SendTransportMessage {
                frame: warden_transport::OutboundFrame::BatchEscalation { data: serde_json::to_value(payloads).unwrap_or_default() }.to_json(),
            },
        ]
    }

    /// Verify and act on one inbound server frame (§6, §9).
    pub fn handle_inbound(&mut self, state: &MaterializedState, frame: &InboundFrame, now_ms: u64) -> Result<Vec<Effect>, EngineError> {
        escalation::verify_inbound(frame, self.signing_key.as_ref())?;
        let mut effects = vec![Effect::Emit { event: Event::ServerMessageReceived { message_type: frame.kind.clone() } }];

        match frame.kind.as_str() {
            "decision" => effects.extend(self.handle_decision_frame(state, frame, now_ms)?),
            "add_to_ignore_list" => effects.extend(self.handle_ignore_frame(frame, now_ms)?),
            "execute_pending_action" => effects.extend(self.handle_pending_action_frame(state, frame, true, now_ms)?),
            "cancel_pending_action" => effects.extend(self.handle_pending_action_frame(state, frame, false, now_ms)?),
            _ => {}
        }
        Ok(effects)
    }

    fn handle_decision_frame(&mut self, _state: &MaterializedState, frame: &InboundFrame, now_ms: u64) -> Result<Vec<Effect>, EngineError> {
        let body = frame.raw.get("data").cloned().unwrap_or_else(|| frame.raw.clone());
        let decision: ServerDecision = serde_json::from_value(body)
            .map_err(|e| EngineError::InvalidInboundMessage { kind: frame.kind.clone(), reason: e.to_string() })?;
        if let (Some(signature_id), Some(cooldown)) = (&decision.signature_id, decision.cooldown_override) {
            self.cooldown_overrides.insert(signature_id.as_str().to_string(), cooldown);
        }

        let signature_id = decision.signature_id.clone().unwrap_or_else(|| SignatureId::new(""));
        let mut effects = Vec::new();
        match apply_server_decision(&decision) {
            ServerDecisionOutcome::InstantiatePlaybook { runbook_id, parameters, .. } => {
                effects.extend(self.instantiate_playbook(signature_id, runbook_id, parameters, now_ms));
            }
            ServerDecisionOutcome::StoreForApproval { runbook_id, .. } => {
                if let Some(signature) = self.find_cached_signature(signature_id.as_str()).cloned() {
                    let ticket_id = TicketId::new(self.id_gen.next());
                    effects.push(Effect::Emit {
                        event: Event::TicketOpened {
                            ticket_id: ticket_id.clone(),
                            signature_id: signature_id.clone(),
                            playbook_id: runbook_id.clone(),
                            status: TicketStatus::PendingReview,
                            timestamp_ms: now_ms,
                        },
                    });
                    effects.push(Effect::Emit {
                        event: Event::PendingActionCreated {
                            signature_id,
                            ticket_id,
                            signature,
                            matched_runbook: runbook_id,
                            server_message: None,
                            timestamp_ms: now_ms,
                        },
                    });
                }
                // Signature fell out of the cache (restart, or a very stale
                // reply) — nothing to store; the server's own state is the
                // source of truth and it can resend the decision.
            }
            ServerDecisionOutcome::RecordOnly => {}
            ServerDecisionOutcome::Ignore { category, target } => {
                effects.push(Effect::Emit { event: Event::ExclusionAdded { category, name: target } });
            }
        }
        Ok(effects)
    }

    /// Instantiate and enqueue a PlaybookTask for a runbook the server (or
    /// an operator's pending-action approval) has already authorized —
    /// admission gating doesn't apply here, the approval itself is the gate.
    fn instantiate_playbook(
        &mut self,
        signature_id: SignatureId,
        runbook_id: Option<RunbookId>,
        parameters: HashMap<String, String>,
        now_ms: u64,
    ) -> Vec<Effect> {
        let mut effects = Vec::new();
        let Some(runbook_id) = runbook_id else { return effects };
        let Some(runbook) = self.runbooks_by_id.get(runbook_id.as_str()).cloned() else {
            return effects;
        };

        let ticket_id = TicketId::new(self.id_gen.next());
        effects.push(Effect::Emit {
            event: Event::TicketOpened {
                ticket_id: ticket_id.clone(),
                signature_id,
                playbook_id: Some(runbook_id.clone()),
                status: TicketStatus::Open,
                timestamp_ms: now_ms,
            },
        });

        let task = PlaybookTask {
            id: PlaybookTaskId::new(self.id_gen.next()),
            runbook_id: runbook_id.clone(),
            parameters,
            priority: Priority::High,
            source: Source::Server,
            created_at_ms: now_ms,
            action_ticket_id: ticket_id,
            signature: None,
        };

        match self.queue.enqueue(task.clone(), runbook) {
            Ok(()) => effects.push(Effect::Emit {
                event: Event::PlaybookEnqueued { task_id: task.id, runbook_id, timestamp_ms: now_ms },
            }),
            Err(EngineError::QueueFull) => {
                effects.push(Effect::Emit { event: Event::PlaybookRejected { task_id: task.id, reason: "queue full".into() } });
            }
            Err(e) => {
                effects.push(Effect::Emit { event: Event::PlaybookRejected { task_id: task.id, reason: e.to_string() } });
            }
        }
        effects
    }

    fn handle_ignore_frame(&mut self, frame: &InboundFrame, _now_ms: u64) -> Result<Vec<Effect>, EngineError> {
        let category = frame
            .str_field("category")
            .and_then(|c| serde_json::from_value::<IgnoreCategory>(serde_json::Value::String(c.to_string())).ok())
            .unwrap_or(IgnoreCategory::Signatures);
        let name = frame
            .str_field("name")
            .or_else(|| frame.str_field("target"))
            .ok_or_else(|| EngineError::InvalidInboundMessage { kind: frame.kind.clone(), reason: "missing name".into() })?
            .to_string();
        Ok(vec![Effect::Emit { event: Event::ExclusionAdded { category, name } }])
    }

    /// Handles both the server's `execute_pending_action`/`cancel_pending_action`
    /// frames and an operator's local `pending approve`/`pending cancel`
    /// command (the latter built into an [`InboundFrame`] the same way, with
    /// no `_signature` field since it never crosses the transport).
    pub fn handle_pending_action_frame(
        &mut self,
        state: &MaterializedState,
        frame: &InboundFrame,
        execute: bool,
        now_ms: u64,
    ) -> Result<Vec<Effect>, EngineError> {
        let signature_id = frame
            .str_field("signature_id")
            .ok_or_else(|| EngineError::InvalidInboundMessage { kind: frame.kind.clone(), reason: "missing signature_id".into() })?;

        let mut effects = Vec::new();
        if execute {
            if let Some(pending) = state.pending_actions.get(signature_id) {
                effects.extend(self.instantiate_playbook(
                    pending.signature.signature_id.clone(),
                    pending.matched_runbook.clone(),
                    HashMap::new(),
                    now_ms,
                ));
            }
            effects.push(Effect::Emit { event: Event::PendingActionExecuted { signature_id: SignatureId::new(signature_id) } });
        } else {
            effects.push(Effect::Emit { event: Event::PendingActionCancelled { signature_id: SignatureId::new(signature_id) } });
        }
        Ok(effects)
    }
}

fn priority_for(severity: Severity) -> Priority {
    match severity {
        Severity::High => Priority::Critical,
        Severity::Critical => Priority::High,
        Severity::Warning => Priority::Medium,
        Severity::Info => Priority::Low,
    }
}

/// Helper for parsing `raised_severity`'s stored string back into a
/// `Severity`, used only to thread the sustained-breach rank raise back
/// into the working signal.
struct RaisedSeverity(Severity);

impl std::str::FromStr for RaisedSeverity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self(Severity::Info)),
            "warning" => Ok(Self(Severity::Warning)),
            "critical" => Ok(Self(Severity::Critical)),
            "high" => Ok(Self(Severity::High)),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
#[path = "domain_tests.rs"]
mod tests;

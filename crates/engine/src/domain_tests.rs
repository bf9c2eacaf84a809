// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use warden_core::id::SequentialIdGen;
use warden_core::runbook::{RiskClass, RunbookStep, StepKind};
use warden_core::PipelineDecision;
use warden_storage::MaterializedState;

fn ctx() -> SignatureContext {
    SignatureContext { os_build: "22631".into(), os_version: "11".into(), device_role: "workstation".into() }
}

fn device() -> DeviceContext {
    DeviceContext { tenant_id: "tenant-1".into(), device_id: "device-1".into(), signature_context: ctx() }
}

fn domain() -> PipelineDomain<SequentialIdGen> {
    PipelineDomain::with_id_gen(device(), SequentialIdGen::new("id"))
}

fn class_a_runbook() -> Arc<Runbook> {
    Arc::new(Runbook {
        id: RunbookId::new("rb-restart-spooler"),
        name: "restart-spooler".into(),
        risk_class: RiskClass::A,
        steps: vec![RunbookStep {
            name: "restart".into(),
            kind: StepKind::ServiceControl,
            action: "restartService".into(),
            parameters: [("service".to_string(), "{{target}}".to_string())].into(),
            timeout_secs: 60,
            allow_failure: false,
            requires_approval: false,
            rollback_on_failure: false,
        }],
        verification: vec![],
        rollback_steps: vec![],
        estimated_duration_secs: 30,
        user_impact_class: "minor".into(),
        version: 1,
    })
}

fn spooler_signal(severity: Severity) -> Signal {
    Signal::new("services", "service_status", "Spooler", severity, 0.0, 1_000).with_attribute("state", "down")
}

#[test]
fn unmatched_signature_with_no_runbook_escalates() {
    let mut d = domain();
    let state = MaterializedState::default();
    let effects = d.handle_signal(&state, spooler_signal(Severity::Critical), 1_000, 12);
    assert!(effects.iter().any(|e| matches!(e, Effect::Emit { event: Event::DecisionMade { decision: PipelineDecision::Escalate, .. } })));
    assert!(effects.iter().any(|e| matches!(e, Effect::SendTransportMessage { .. })));
}

#[test]
fn matched_class_a_runbook_admits_locally() {
    let mut d = domain();
    d.register_runbook("services-service_status", class_a_runbook());
    let state = MaterializedState::default();
    let effects = d.handle_signal(&state, spooler_signal(Severity::Critical), 1_000, 12);
    assert!(effects.iter().any(|e| matches!(e, Effect::Emit { event: Event::DecisionMade { decision: PipelineDecision::ExecuteLocal { .. }, .. } })));
    assert!(effects.iter().any(|e| matches!(e, Effect::Emit { event: Event::PlaybookEnqueued { .. } })));
    assert_eq!(d.queue().len(), 1);
}

#[test]
fn maintenance_window_suppresses_the_whole_pipeline() {
    let mut d = domain();
    d.register_runbook("services-service_status", class_a_runbook());
    let mut state = MaterializedState::default();
    state.maintenance_windows.insert(
        "mw-1".into(),
        warden_core::MaintenanceWindow {
            id: warden_core::MaintenanceWindowId::new("mw-1"),
            scope: warden_core::MaintenanceScope::Services { names: ["Spooler".to_string()].into() },
            start_ms: 0,
            end_ms: 10_000,
            suppress_escalation: true,
            suppress_remediation: true,
        },
    );
    let effects = d.handle_signal(&state, spooler_signal(Severity::Critical), 1_000, 12);
    assert!(effects.is_empty());
}

#[test]
fn unchanged_state_is_suppressed_by_state_tracker() {
    let mut d = domain();
    let mut state = MaterializedState::default();
    state.resources.insert(
        "services:Spooler".into(),
        warden_core::ResourceState::new("services:Spooler", "services", "down", Severity::Critical, 500),
    );
    let effects = d.handle_signal(&state, spooler_signal(Severity::Critical), 1_000, 12);
    assert!(effects.is_empty());
}

#[test]
fn batched_escalation_waits_for_the_window_then_flushes() {
    let mut d = domain();
    let state = MaterializedState::default();
    let signal = Signal::new("cpu", "usage", "host", Severity::Warning, 50.0, 1_000);
    let effects = d.handle_signal(&state, signal, 1_000, 12);
    assert!(effects.iter().any(|e| matches!(e, Effect::SetTimer { .. })));
    assert!(!effects.iter().any(|e| matches!(e, Effect::SendTransportMessage { .. })));

    let flushed = d.flush_batch(11_000);
    assert!(flushed.iter().any(|e| matches!(e, Effect::SendTransportMessage { .. })));
}

#[test]
fn disconnected_transport_falls_back_to_a_manual_ticket() {
    let mut d = domain();
    d.set_transport_connected(false);
    let state = MaterializedState::default();
    let effects = d.handle_signal(&state, spooler_signal(Severity::Critical), 1_000, 12);
    assert!(effects.iter().any(|e| matches!(e, Effect::Emit { event: Event::TicketOpened { playbook_id: None, .. } })));
    assert!(!effects.iter().any(|e| matches!(e, Effect::SendTransportMessage { .. })));
}

#[test]
fn add_to_ignore_list_frame_emits_exclusion_added() {
    let mut d = domain();
    let state = MaterializedState::default();
    let frame = warden_transport::InboundFrame {
        kind: "add_to_ignore_list".into(),
        raw: serde_json::json!({ "category": "services", "name": "Spooler" }),
    };
    let effects = d.handle_inbound(&state, &frame, 1_000).unwrap();
    assert!(effects.iter().any(|e| matches!(e, Effect::Emit { event: Event::ExclusionAdded { .. } })));
}

#[test]
fn execute_a_decision_enqueues_the_recommended_playbook() {
    let mut d = domain();
    d.register_runbook("services-service_status", class_a_runbook());
    let state = MaterializedState::default();
    let frame = warden_transport::InboundFrame {
        kind: "decision".into(),
        raw: serde_json::json!({
            "decision_type": "execute_a",
            "confidence_server": 92,
            "recommended_playbook_id": "rb-restart-spooler",
        }),
    };
    let effects = d.handle_inbound(&state, &frame, 2_000).unwrap();
    assert!(effects.iter().any(|e| matches!(e, Effect::Emit { event: Event::PlaybookEnqueued { .. } })));
    assert_eq!(d.queue().len(), 1);
}

#[test]
fn execute_b_decision_stores_a_pending_action_for_the_cached_signature() {
    let mut d = domain();
    let state = MaterializedState::default();
    let signal_effects = d.handle_signal(&state, spooler_signal(Severity::Critical), 1_000, 12);
    let signature_id = signal_effects
        .iter()
        .find_map(|e| match e {
            Effect::Emit { event: Event::SignatureGenerated { signature_id, .. } } => Some(signature_id.clone()),
            _ => None,
        })
        .expect("signature generated");

    let frame = warden_transport::InboundFrame {
        kind: "decision".into(),
        raw: serde_json::json!({
            "decision_type": "execute_b",
            "confidence_server": 40,
            "signature_id": signature_id.as_str(),
            "recommended_playbook_id": "rb-restart-spooler",
        }),
    };
    let effects = d.handle_inbound(&state, &frame, 2_000).unwrap();
    assert!(effects.iter().any(|e| matches!(
        e,
        Effect::Emit { event: Event::TicketOpened { status: TicketStatus::PendingReview, .. } }
    )));
    assert!(effects.iter().any(|e| matches!(e, Effect::Emit { event: Event::PendingActionCreated { .. } })));
}

#[test]
fn execute_b_decision_for_an_unknown_signature_is_dropped() {
    let mut d = domain();
    let state = MaterializedState::default();
    let frame = warden_transport::InboundFrame {
        kind: "decision".into(),
        raw: serde_json::json!({
            "decision_type": "execute_b",
            "confidence_server": 40,
            "signature_id": "never-generated",
        }),
    };
    let effects = d.handle_inbound(&state, &frame, 2_000).unwrap();
    assert!(effects.iter().all(|e| !matches!(e, Effect::Emit { event: Event::PendingActionCreated { .. } })));
}

#[test]
fn execute_pending_action_enqueues_the_stored_runbook() {
    let mut d = domain();
    d.register_runbook("services-service_status", class_a_runbook());
    let mut state = MaterializedState::default();
    let signature = Signature {
        signature_id: SignatureId::new("sig-1"),
        severity: Severity::Critical,
        confidence: 40,
        symptoms: vec![],
        targets: vec![warden_core::signature::Target { kind: "service".into(), name: "Spooler".into() }],
        context: ctx(),
    };
    state.pending_actions.insert(
        "sig-1".into(),
        warden_core::PendingAction {
            signature_id: SignatureId::new("sig-1"),
            ticket_id: warden_core::TicketId::new("tix-1"),
            signature,
            matched_runbook: Some(RunbookId::new("rb-restart-spooler")),
            server_message: None,
            created_at_ms: 1_000,
        },
    );

    let frame = warden_transport::InboundFrame {
        kind: "execute_pending_action".into(),
        raw: serde_json::json!({ "signature_id": "sig-1" }),
    };
    let effects = d.handle_inbound(&state, &frame, 3_000).unwrap();
    assert!(effects.iter().any(|e| matches!(e, Effect::Emit { event: Event::PlaybookEnqueued { .. } })));
    assert!(effects.iter().any(|e| matches!(e, Effect::Emit { event: Event::PendingActionExecuted { .. } })));
    assert_eq!(d.queue().len(), 1);
}

#[test]
fn cancel_pending_action_emits_cancelled_with_no_enqueue() {
    let mut d = domain();
    let state = MaterializedState::default();
    let frame = warden_transport::InboundFrame {
        kind: "cancel_pending_action".into(),
        raw: serde_json::json!({ "signature_id": "sig-1" }),
    };
    let effects = d.handle_inbound(&state, &frame, 3_000).unwrap();
    assert!(effects.iter().any(|e| matches!(e, Effect::Emit { event: Event::PendingActionCancelled { .. } })));
    assert!(effects.iter().all(|e| !matches!(e, Effect::Emit { event: Event::PlaybookEnqueued { .. } })));
    assert_eq!(d.queue().len(), 0);
}

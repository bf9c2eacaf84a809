// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::diagnostics::FakeDiagnosticCollector;
use serde_json::json;
use warden_core::signature::{SignatureContext, SignatureId, Symptom, Target};
use warden_transport::SigningKey;

fn signature(confidence: u8, severity: Severity) -> Signature {
    Signature {
        signature_id: SignatureId::new("sig-1"),
        severity,
        confidence,
        symptoms: vec![Symptom { kind: "cpu".into(), severity, details: "host 10.0.0.5 pegged".into() }],
        targets: vec![Target { kind: "host".into(), name: "C:\\Users\\alice\\scratch".into() }],
        context: SignatureContext { os_build: "22631".into(), os_version: "11".into(), device_role: "workstation".into() },
    }
}

#[test]
fn excluded_signature_is_gated_before_cooldown() {
    let gate = check_gates(true, false, Some(0), 10, ESCALATION_COOLDOWN_MS);
    assert_eq!(gate, EscalationGate::Ignored);
}

#[test]
fn awaiting_review_suppresses_before_cooldown_check() {
    let gate = check_gates(false, true, None, 10, ESCALATION_COOLDOWN_MS);
    assert_eq!(gate, EscalationGate::AwaitingReview);
}

#[test]
fn within_cooldown_window_is_suppressed() {
    let gate = check_gates(false, false, Some(1_000), 1_100, ESCALATION_COOLDOWN_MS);
    assert_eq!(gate, EscalationGate::Cooldown);
}

#[test]
fn past_cooldown_window_proceeds() {
    let gate = check_gates(false, false, Some(1_000), 1_000 + ESCALATION_COOLDOWN_MS + 1, ESCALATION_COOLDOWN_MS);
    assert!(gate.should_proceed());
}

#[test]
fn high_severity_flushes_immediately() {
    assert_eq!(dispatch_plan(Severity::Critical, true), DispatchPlan::SendImmediately);
    assert_eq!(dispatch_plan(Severity::High, true), DispatchPlan::SendImmediately);
}

#[test]
fn ordinary_severity_batches_when_connected() {
    assert_eq!(dispatch_plan(Severity::Warning, true), DispatchPlan::Batch);
}

#[test]
fn disconnected_transport_falls_back_to_manual_ticket_regardless_of_severity() {
    assert_eq!(dispatch_plan(Severity::Critical, false), DispatchPlan::FallbackManualTicket);
}

#[test]
fn sanitize_redacts_ip_path_and_credential_shaped_text() {
    let out = sanitize_text("connect to 10.0.0.5 as C:\\Users\\alice\\data token=abc123xyz");
    assert!(!out.contains("10.0.0.5"));
    assert!(!out.contains("alice"));
    assert!(!out.contains("abc123xyz"));
}

#[test]
fn build_payload_sanitizes_symptoms_and_targets_and_caps_recent_actions() {
    let sig = signature(42, Severity::Warning);
    let recent = vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()];
    let payload = build_payload("tenant-1", "device-1", &sig, true, &recent, "remediate", HashMap::new());
    assert_eq!(payload.recent_actions.len(), 3);
    assert!(!payload.symptoms[0].contains("10.0.0.5"));
    assert!(!payload.targets[0].contains("alice"));
    assert_eq!(payload.local_confidence, 42);
}

#[test]
fn unsigned_frame_passes_when_no_signing_key_configured() {
    let frame = InboundFrame { kind: "decision".into(), raw: json!({"decision_type": "ignore"}) };
    assert!(verify_inbound(&frame, None).is_ok());
}

#[test]
fn non_sensitive_frame_passes_even_when_signing_configured() {
    let key = SigningKey::new(b"secret".to_vec());
    let frame = InboundFrame { kind: "welcome".into(), raw: json!({}) };
    assert!(verify_inbound(&frame, Some(&key)).is_ok());
}

#[test]
fn sensitive_frame_missing_signature_is_rejected() {
    let key = SigningKey::new(b"secret".to_vec());
    let frame = InboundFrame { kind: "decision".into(), raw: json!({"decision_type": "ignore"}) };
    assert!(verify_inbound(&frame, Some(&key)).is_err());
}

#[test]
fn sensitive_frame_with_valid_signature_is_accepted() {
    let key = SigningKey::new(b"secret".to_vec());
    let mut raw = json!({"decision_type": "ignore"});
    let bytes = serde_json::to_vec(&raw).unwrap();
    let sig = key.sign(&bytes);
    raw.as_object_mut().unwrap().insert("_signature".to_string(), json!(sig));
    let frame = InboundFrame { kind: "decision".into(), raw };
    assert!(verify_inbound(&frame, Some(&key)).is_ok());
}

#[test]
fn sensitive_frame_with_tampered_signature_is_rejected() {
    let key = SigningKey::new(b"secret".to_vec());
    let mut raw = json!({"decision_type": "ignore"});
    raw.as_object_mut().unwrap().insert("_signature".to_string(), json!("not-a-real-signature"));
    let frame = InboundFrame { kind: "decision".into(), raw };
    assert!(verify_inbound(&frame, Some(&key)).is_err());
}

#[tokio::test]
async fn collect_diagnostics_gathers_configured_categories() {
    let collector = FakeDiagnosticCollector::new();
    collector.set_response("services", [("Spooler".to_string(), "stopped".to_string())].into_iter().collect());
    let protocol = EscalationProtocol::new(collector);
    let facts = protocol.collect_diagnostics(&["services"]).await;
    assert_eq!(facts["services"]["Spooler"], "stopped");
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::signal::Severity;
use crate::signature::{SignatureContext, Symptom};

fn sample_signature() -> Signature {
    Signature {
        signature_id: SignatureId::new("RULE_DISK_CRITICAL_C"),
        severity: Severity::Critical,
        confidence: 80,
        symptoms: vec![Symptom {
            kind: "disk_free_low".to_string(),
            severity: Severity::Critical,
            details: "2% free".to_string(),
        }],
        targets: vec![],
        context: SignatureContext {
            os_build: "19045".to_string(),
            os_version: "10".to_string(),
            device_role: "workstation".to_string(),
        },
    }
}

#[test]
fn pending_action_omits_absent_optional_fields() {
    let action = PendingAction {
        signature_id: SignatureId::new("RULE_DISK_CRITICAL_C"),
        ticket_id: TicketId::new("t-1"),
        signature: sample_signature(),
        matched_runbook: None,
        server_message: None,
        created_at_ms: 1_700_000_000_000,
    };
    let json = serde_json::to_string(&action).unwrap();
    assert!(!json.contains("matched_runbook"));
    assert!(!json.contains("server_message"));

    let parsed: PendingAction = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.signature_id, action.signature_id);
}

#[test]
fn pending_action_round_trips_with_matched_runbook() {
    let action = PendingAction {
        signature_id: SignatureId::new("RULE_DISK_CRITICAL_C"),
        ticket_id: TicketId::new("t-1"),
        signature: sample_signature(),
        matched_runbook: Some(RunbookId::new("disk_cleanup_windows_update")),
        server_message: Some(serde_json::json!({"decision_type": "execute_B"})),
        created_at_ms: 1_700_000_000_000,
    };
    let json = serde_json::to_string(&action).unwrap();
    let parsed: PendingAction = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.matched_runbook, action.matched_runbook);
    assert_eq!(parsed.server_message, action.server_message);
}

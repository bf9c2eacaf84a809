// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::memory::Outcome;
use crate::signature::SignatureId;

#[test]
fn event_serializes_with_type_tag() {
    let event = Event::SignatureGenerated {
        signature_id: SignatureId::new("RULE_SERVICE_STOPPED_Spooler"),
        confidence: 92,
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "signature:generated");
    assert_eq!(json["confidence"], 92);
}

#[test]
fn unknown_type_tag_deserializes_to_custom() {
    let json = r#"{"type":"some_future_event","foo":"bar"}"#;
    let event: Event = serde_json::from_str(json).unwrap();
    assert_eq!(event, Event::Custom);
}

#[test]
fn event_round_trips_through_json() {
    let event = Event::MemoryAttemptRecorded {
        playbook_id: RunbookId::new("service_start_generic"),
        signal_key: "services-service_status".to_string(),
        device_id: "host-1".to_string(),
        resource_name: Some("Spooler".to_string()),
        outcome: Outcome::Success,
        duration_ms: 1200,
        timestamp_ms: 1_700_000_000_000,
    };
    let json = serde_json::to_string(&event).unwrap();
    let parsed: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(event, parsed);
}

#[test]
fn log_summary_includes_key_identifiers() {
    let event = Event::TicketClosed {
        ticket_id: TicketId::new("t-1"),
        status: TicketStatus::Resolved,
        message: "done".to_string(),
        timestamp_ms: 0,
    };
    let summary = event.log_summary();
    assert!(summary.contains("ticket:closed"));
    assert!(summary.contains("t-1"));
}

#[test]
fn name_matches_wire_type_for_every_variant_used_in_tests() {
    assert_eq!(Event::Shutdown.name(), "system:shutdown");
    assert_eq!(
        Event::ResourceFlapCleared {
            resource_id: "service:Fax".to_string()
        }
        .name(),
        "resource:flap_cleared"
    );
}

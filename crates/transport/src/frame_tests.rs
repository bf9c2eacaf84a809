// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn register_serializes_with_tag() {
    let frame = OutboundFrame::Register {
        device_id: "d1".into(),
        tenant_id: "t1".into(),
        hostname: "host".into(),
        agent_version: "0.1.0".into(),
    };
    let json = frame.to_json();
    assert_eq!(json["type"], "register");
    assert_eq!(json["device_id"], "d1");
}

#[test]
fn proactive_action_uses_kebab_tag() {
    let frame = OutboundFrame::ProactiveAction {
        data: serde_json::json!({"x": 1}),
    };
    assert_eq!(frame.to_json()["type"], "proactive-action");
}

#[test]
fn field_reads_from_nested_data_object() {
    let raw: Value = serde_json::json!({"type": "decision", "data": {"signature_id": "sig-1"}});
    let frame: InboundFrame = serde_json::from_value(raw).unwrap();
    assert_eq!(frame.str_field("signature_id"), Some("sig-1"));
}

#[test]
fn field_falls_back_to_root_flattened_payload() {
    let raw: Value = serde_json::json!({"type": "execute_pending_action", "action_id": "a-1"});
    let frame: InboundFrame = serde_json::from_value(raw).unwrap();
    assert_eq!(frame.str_field("action_id"), Some("a-1"));
}

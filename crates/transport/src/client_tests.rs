// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn identity() -> DeviceIdentity {
    DeviceIdentity {
        device_id: "dev-1".into(),
        tenant_id: "tenant-1".into(),
        hostname: "host-1".into(),
        agent_version: "0.1.0".into(),
    }
}

#[tokio::test]
async fn starts_disconnected_before_connect_completes() {
    let key = SigningKey::new(b"k".to_vec());
    let (transport, handle) = run("ws://127.0.0.1:1/".to_string(), identity(), key);
    assert!(!transport.is_connected());
    let err = transport.send(serde_json::json!({"type": "heartbeat"})).await;
    assert!(err.is_err());
    handle.abort();
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn records_sent_frames() {
    let t = FakeTransport::new();
    t.send(serde_json::json!({"type": "heartbeat"})).await.unwrap();
    assert_eq!(t.sent().len(), 1);
}

#[tokio::test]
async fn disconnected_fake_rejects_sends() {
    let t = FakeTransport::new();
    t.set_connected(false);
    let result = t.send(serde_json::json!({"type": "heartbeat"})).await;
    assert!(result.is_err());
    assert!(t.sent().is_empty());
}

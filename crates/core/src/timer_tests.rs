// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn timer_id_display() {
    let id = TimerId::new("test-timer");
    assert_eq!(id.to_string(), "test-timer");
}

#[test]
fn timer_id_equality() {
    let id1 = TimerId::new("timer-1");
    let id2 = TimerId::new("timer-1");
    let id3 = TimerId::new("timer-2");

    assert_eq!(id1, id2);
    assert_ne!(id1, id3);
}

#[test]
fn timer_id_serde() {
    let id = TimerId::new("my-timer");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"my-timer\"");

    let parsed: TimerId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn batch_window_timer_id_format() {
    let id = TimerId::batch_window("service:host-1");
    assert_eq!(id.as_str(), "batch:service:host-1");
    assert!(id.is_batch_window());
}

#[test]
fn cooldown_timer_id_format() {
    let id = TimerId::cooldown("RULE_SERVICE_STOPPED", "host-1");
    assert_eq!(id.as_str(), "cooldown:host-1:RULE_SERVICE_STOPPED");
    assert!(id.is_cooldown());
}

#[test]
fn heartbeat_and_sweep_timer_ids_are_stable() {
    assert_eq!(TimerId::heartbeat().as_str(), "heartbeat");
    assert_eq!(
        TimerId::attempt_log_prune().as_str(),
        "attempt-log-prune"
    );
    assert_eq!(
        TimerId::dependency_dag_refresh().as_str(),
        "dependency-dag-refresh"
    );
}

#[test]
fn maintenance_expiry_timer_id_format() {
    let id = TimerId::maintenance_expiry("w-1");
    assert_eq!(id.as_str(), "maintenance-expiry:w-1");
}

#[test]
fn is_cooldown_rejects_other_kinds() {
    assert!(!TimerId::heartbeat().is_cooldown());
    assert!(!TimerId::batch_window("x").is_cooldown());
}

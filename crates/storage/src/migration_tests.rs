// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn same_version_is_a_no_op() {
    let registry = MigrationRegistry::new();
    let snapshot = serde_json::json!({"v": 1, "seq": 5});
    let migrated = registry.migrate_to(snapshot.clone(), 1).unwrap();
    assert_eq!(migrated, snapshot);
}

#[test]
fn missing_version_tag_defaults_to_one() {
    let registry = MigrationRegistry::new();
    let snapshot = serde_json::json!({"seq": 5});
    let migrated = registry.migrate_to(snapshot, 1).unwrap();
    assert_eq!(migrated["seq"], 5);
}

#[test]
fn newer_than_supported_is_rejected() {
    let registry = MigrationRegistry::new();
    let snapshot = serde_json::json!({"v": 2, "seq": 5});
    let err = registry.migrate_to(snapshot, 1).unwrap_err();
    assert!(matches!(err, MigrationError::TooNew(2, 1)));
}

#[test]
fn unreachable_target_is_rejected() {
    let registry = MigrationRegistry::new();
    let snapshot = serde_json::json!({"v": 1, "seq": 5});
    let err = registry.migrate_to(snapshot, 2).unwrap_err();
    assert!(matches!(err, MigrationError::NoPath(1, 2)));
}

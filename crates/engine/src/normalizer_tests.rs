// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn normalize_builds_deterministic_resource_and_signal_keys() {
    let normalizer = Normalizer::new();
    let raw = RawObservation {
        category: "services".into(),
        metric: "service_status".into(),
        target: "Spooler".into(),
        severity: Severity::Warning,
        value: 0.0,
        ..Default::default()
    };
    let signal = normalizer.normalize(raw, 1_000);
    assert_eq!(signal.resource_id, "services:Spooler");
    assert_eq!(signal.signal_key, "services-service_status");
}

#[test]
fn missing_optional_fields_default_to_empty_not_panic() {
    let normalizer = Normalizer::new();
    let raw = RawObservation::default();
    let signal = normalizer.normalize(raw, 1_000);
    assert_eq!(signal.message, "");
    assert!(signal.attributes.is_empty());
    assert_eq!(signal.threshold, None);
}

#[test]
fn threshold_and_message_and_attributes_carry_through() {
    let normalizer = Normalizer::new();
    let mut attrs = HashMap::new();
    attrs.insert("drive".to_string(), "C".to_string());
    let raw = RawObservation {
        category: "storage".into(),
        metric: "disk_free".into(),
        target: "C".into(),
        severity: Severity::Critical,
        value: 2.0,
        threshold: Some(3.0),
        message: Some("disk nearly full".into()),
        attributes: attrs,
    };
    let signal = normalizer.normalize(raw, 5_000);
    assert_eq!(signal.threshold, Some(3.0));
    assert_eq!(signal.message, "disk nearly full");
    assert_eq!(signal.attributes.get("drive"), Some(&"C".to_string()));
}

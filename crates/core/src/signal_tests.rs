// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn resource_id_and_signal_key_are_derived_deterministically() {
    let s = Signal::new("services", "service_status", "Spooler", Severity::Warning, 0.0, 1);
    assert_eq!(s.resource_id, "services:Spooler");
    assert_eq!(s.signal_key, "services-service_status");
}

#[test]
fn severity_raise_one_rank_saturates_at_high() {
    assert_eq!(Severity::Info.raise_one_rank(), Severity::Warning);
    assert_eq!(Severity::Warning.raise_one_rank(), Severity::Critical);
    assert_eq!(Severity::Critical.raise_one_rank(), Severity::High);
    assert_eq!(Severity::High.raise_one_rank(), Severity::High);
}

#[test]
fn severity_ordering_places_high_above_critical() {
    assert!(Severity::High > Severity::Critical);
    assert!(Severity::Critical > Severity::Warning);
    assert!(Severity::Warning > Severity::Info);
}

#[test]
fn builder_methods_populate_optional_fields() {
    let s = Signal::new("storage", "disk_free", "C", Severity::Critical, 2.0, 1)
        .with_threshold(3.0)
        .with_message("disk nearly full")
        .with_attribute("drive_letter", "C");
    assert_eq!(s.threshold, Some(3.0));
    assert_eq!(s.message, "disk nearly full");
    assert_eq!(s.attributes.get("drive_letter").map(String::as_str), Some("C"));
}

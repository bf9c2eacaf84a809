// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn adding_twice_has_same_end_state_as_adding_once() {
    let mut a = ExclusionLists::default();
    a.add(ExclusionCategory::Signatures, "RULE_SERVICE_STOPPED_Fax");

    let mut b = ExclusionLists::default();
    b.add(ExclusionCategory::Signatures, "RULE_SERVICE_STOPPED_Fax");
    b.add(ExclusionCategory::Signatures, "RULE_SERVICE_STOPPED_Fax");

    assert_eq!(a.signatures, b.signatures);
}

#[test]
fn category_adds_are_independent() {
    let mut lists = ExclusionLists::default();
    lists.add(ExclusionCategory::Services, "Fax");
    assert!(lists.contains_service("Fax"));
    assert!(!lists.contains_process("Fax"));
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn default_is_disconnected() {
    assert_eq!(SessionState::default(), SessionState::Disconnected);
}

#[test]
fn invalid_states_report_invalid_and_not_connected() {
    let s = SessionState::Invalid(SessionStatus::AuthFailed);
    assert!(s.is_invalid());
    assert!(!s.is_connected());
}

#[test]
fn connected_reports_connected_and_valid() {
    let s = SessionState::Connected;
    assert!(s.is_connected());
    assert!(!s.is_invalid());
}

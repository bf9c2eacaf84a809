// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn source_orders_server_ahead_of_admin_ahead_of_local() {
    assert!(Source::Server < Source::Admin);
    assert!(Source::Admin < Source::Local);
}

#[test]
fn priority_orders_critical_above_low() {
    assert!(Priority::Critical > Priority::High);
    assert!(Priority::High > Priority::Medium);
    assert!(Priority::Medium > Priority::Low);
}

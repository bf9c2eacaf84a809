// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;
use warden_core::TimerId;

#[test]
fn timer_fires_once_deadline_passes() {
    let mut s = Scheduler::new();
    s.set_timer(TimerId::heartbeat(), Duration::from_secs(30), 1_000);

    assert!(s.fired_timers(1_000).is_empty());
    let fired = s.fired_timers(31_000);
    assert_eq!(fired.len(), 1);
    assert!(s.fired_timers(31_000).is_empty());
}

#[test]
fn cancel_timer_prevents_firing() {
    let mut s = Scheduler::new();
    let id = TimerId::cooldown("disk-full", "dev-1");
    s.set_timer(id.clone(), Duration::from_secs(10), 0);
    s.cancel_timer(&id);
    assert!(s.fired_timers(10_000).is_empty());
}

#[test]
fn cancel_timers_with_prefix_removes_matching_only() {
    let mut s = Scheduler::new();
    s.set_timer(TimerId::cooldown("a", "dev-1"), Duration::from_secs(1), 0);
    s.set_timer(TimerId::cooldown("b", "dev-1"), Duration::from_secs(1), 0);
    s.set_timer(TimerId::heartbeat(), Duration::from_secs(1), 0);

    s.cancel_timers_with_prefix("cooldown:");

    assert!(s.has_timers());
    let fired = s.fired_timers(10_000);
    assert_eq!(fired.len(), 1);
}

#[test]
fn next_deadline_tracks_earliest() {
    let mut s = Scheduler::new();
    s.set_timer(TimerId::heartbeat(), Duration::from_secs(30), 0);
    s.set_timer(TimerId::flap_quiet("svc:a"), Duration::from_secs(5), 0);
    assert_eq!(s.next_deadline_ms(), Some(5_000));
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn record_n(
    mem: &mut RemediationMemory,
    playbook: &str,
    signal: &str,
    device: &str,
    resource: &str,
    outcome: Outcome,
    n: u32,
    start_ms: u64,
) {
    for i in 0..n {
        mem.record_attempt(
            playbook,
            signal,
            device,
            Some(resource),
            outcome,
            100,
            None,
            start_ms + i as u64,
        );
    }
}

#[test]
fn signal_dampens_after_k_dampen_consecutive_failures_with_k_min_total() {
    let mut mem = RemediationMemory::default();
    record_n(&mut mem, "pb", "services-service_status", "dev1", "Spooler", Outcome::Failure, 5, 0);

    let admission = mem.should_attempt_remediation("services-service_status", "dev1", "pb", Some("Spooler"));
    assert!(!admission.allowed);
    assert_eq!(admission.reason, Some(Denial::SignalDampened.reason()));
}

#[test]
fn dampening_clears_on_success() {
    let mut mem = RemediationMemory::default();
    record_n(&mut mem, "pb", "k", "dev1", "r", Outcome::Failure, 5, 0);
    assert!(mem.signals.get("dev1:k").unwrap().dampened);

    mem.record_attempt("pb", "k", "dev1", Some("r"), Outcome::Success, 100, None, 10);
    assert!(!mem.signals.get("dev1:k").unwrap().dampened);

    let admission = mem.should_attempt_remediation("k", "dev1", "pb", Some("r"));
    assert!(admission.allowed);
}

#[test]
fn reset_dampening_clears_flag_and_consecutive_failures() {
    let mut mem = RemediationMemory::default();
    record_n(&mut mem, "pb", "k", "dev1", "r", Outcome::Failure, 5, 0);
    mem.reset_dampening("k", "dev1");
    let s = mem.signals.get("dev1:k").unwrap();
    assert!(!s.dampened);
    assert_eq!(s.consecutive_failures, 0);
}

#[test]
fn playbook_is_problematic_below_thirty_percent_success_with_min_total() {
    let mut mem = RemediationMemory::default();
    // 1 success, 4 failures => total 5, rate 0.2
    mem.record_attempt("pb", "k", "dev1", None, Outcome::Success, 10, None, 0);
    record_n(&mut mem, "pb", "k", "dev1", "r", Outcome::Failure, 4, 1);
    assert!(mem.playbooks.get("pb").unwrap().is_problematic());
}

#[test]
fn cached_solution_requires_consecutive_success_and_both_rate_floors() {
    let mut mem = RemediationMemory::default();
    // Build signal success_rate >= 0.70: 7 successes, 2 failures (then reset by success)
    for _ in 0..2 {
        mem.record_attempt("pb", "k", "dev1", None, Outcome::Failure, 10, None, 0);
    }
    for _ in 0..7 {
        mem.record_attempt("pb", "k", "dev1", None, Outcome::Success, 10, None, 1);
    }
    let solution = mem.find_cached_solution("k", "dev1");
    assert_eq!(solution, Some("pb".to_string()));
}

#[test]
fn cached_solution_absent_when_last_attempt_failed() {
    let mut mem = RemediationMemory::default();
    for _ in 0..7 {
        mem.record_attempt("pb", "k", "dev1", None, Outcome::Success, 10, None, 0);
    }
    mem.record_attempt("pb", "k", "dev1", None, Outcome::Failure, 10, None, 1);
    assert_eq!(mem.find_cached_solution("k", "dev1"), None);
}

#[test]
fn prune_attempts_drops_entries_older_than_ninety_days() {
    let mut mem = RemediationMemory::default();
    let ninety_days_ms = ATTEMPT_RETENTION_DAYS * 24 * 60 * 60 * 1000;
    mem.record_attempt("pb", "k", "dev1", None, Outcome::Success, 10, None, 0);
    mem.record_attempt("pb", "k", "dev1", None, Outcome::Success, 10, None, ninety_days_ms + 1_000);
    mem.prune_attempts(ninety_days_ms + 1_000);
    assert_eq!(mem.attempts.len(), 1);
}

#[test]
fn confidence_band_floors_below_five_total_at_one() {
    let mut stats = ResourceStats::default();
    stats.record(Outcome::Failure);
    assert_eq!(stats.confidence_modifier(), 1.0);
}

#[test]
fn confidence_band_selects_expected_tier() {
    let mut stats = ResourceStats::default();
    for _ in 0..5 {
        stats.record(Outcome::Success);
    }
    for _ in 0..5 {
        stats.record(Outcome::Failure);
    }
    // 5/10 = 0.5 success rate -> band 0.7
    assert_eq!(stats.confidence_modifier(), 0.7);
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use warden_core::Severity;

fn cpu_signal(value: f64) -> Signal {
    Signal::new("cpu", "usage", "host", Severity::Warning, value, 1_000)
}

#[test]
fn hard_floor_bypasses_profiler_even_with_no_data() {
    let profiler = Profiler::new();
    assert!(profiler.should_emit(&cpu_signal(99.0), 12));
}

#[test]
fn insufficient_data_is_treated_as_emit() {
    let profiler = Profiler::new();
    assert!(profiler.should_emit(&cpu_signal(50.0), 12));
}

#[test]
fn within_normal_suppresses_once_enough_buckets_observed() {
    let mut profiler = Profiler::new();
    for hour in 0..24u8 {
        profiler.record_sample("cpu-usage", hour, 50.0);
    }
    assert!(!profiler.should_emit(&cpu_signal(50.0), 12));
}

#[test]
fn anomalous_value_still_emits_after_enough_buckets() {
    let mut profiler = Profiler::new();
    for hour in 0..24u8 {
        profiler.record_sample("cpu-usage", hour, 50.0);
    }
    assert!(profiler.should_emit(&cpu_signal(5_000.0), 12));
}

#[test]
fn per_process_key_is_distinct_from_system_wide() {
    assert_ne!(per_process_key("cpu", "chrome.exe"), "cpu-usage");
    assert_eq!(per_process_key("cpu", "chrome.exe"), "process:cpu:chrome.exe");
}

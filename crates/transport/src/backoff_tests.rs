// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn first_delay_is_near_base() {
    let mut b = ReconnectBackoff::new();
    let d = b.next_delay();
    assert!(d >= Duration::from_millis(700) && d <= Duration::from_millis(1300));
}

#[test]
fn delay_grows_and_caps() {
    let mut b = ReconnectBackoff::new();
    for _ in 0..20 {
        let d = b.next_delay();
        assert!(d <= MAX_DELAY + MAX_DELAY.mul_f64(JITTER_FRACTION));
    }
}

#[test]
fn reset_restarts_from_base() {
    let mut b = ReconnectBackoff::new();
    for _ in 0..5 {
        b.next_delay();
    }
    b.reset();
    let d = b.next_delay();
    assert!(d <= Duration::from_millis(1300));
}

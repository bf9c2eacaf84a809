// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capped exponential reconnect backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Base delay before the first reconnect attempt.
pub const BASE_DELAY: Duration = Duration::from_secs(1);
/// Reconnect delay never exceeds this, regardless of attempt count.
pub const MAX_DELAY: Duration = Duration::from_secs(5 * 60);
/// Jitter band applied to the computed delay: +/- this fraction.
pub const JITTER_FRACTION: f64 = 0.30;

/// Tracks reconnect attempts and computes the next backoff delay.
///
/// `base * 2^attempt`, capped at `MAX_DELAY`, with +/-30% jitter applied so
/// a fleet of agents reconnecting after a shared outage doesn't thunder
/// back in lockstep.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconnectBackoff {
    attempt: u32,
}

impl ReconnectBackoff {
    pub fn new() -> Self {
        Self { attempt: 0 }
    }

    /// Reset after a successful connection.
    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Compute the next delay and advance the attempt counter.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.delay_for_attempt(self.attempt);
        self.attempt = self.attempt.saturating_add(1);
        delay
    }

    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let unjittered = BASE_DELAY.saturating_mul(1u32.saturating_shl(attempt.min(12)));
        let capped = unjittered.min(MAX_DELAY);
        jitter(capped)
    }
}

fn jitter(delay: Duration) -> Duration {
    let mut rng = rand::rng();
    let factor = 1.0 + rng.random_range(-JITTER_FRACTION..=JITTER_FRACTION);
    let millis = (delay.as_millis() as f64 * factor).max(0.0);
    Duration::from_millis(millis as u64)
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;

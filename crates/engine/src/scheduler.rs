// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer management for the pipeline domain (§5: one batch timer, plus
//! cooldown/flap-quiet/heartbeat/maintenance-expiry/prune timers, all keyed
//! by [`TimerId`] and driven off the domain [`Clock`](warden_core::Clock)'s
//! `now_ms`, never wall-clock `Instant`, so tests can fast-forward with
//! `FakeClock`.

use std::collections::HashMap;
use warden_core::{Event, TimerId};

#[derive(Debug, Clone, Copy)]
struct Timer {
    fires_at_ms: u64,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    timers: HashMap<String, Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_timer(&mut self, id: TimerId, duration: std::time::Duration, now_ms: u64) {
        let fires_at_ms = now_ms.saturating_add(duration.as_millis() as u64);
        self.timers.insert(id.to_string(), Timer { fires_at_ms });
    }

    pub fn cancel_timer(&mut self, id: &TimerId) {
        self.timers.remove(id.as_str());
    }

    pub fn cancel_timers_with_prefix(&mut self, prefix: &str) {
        self.timers.retain(|id, _| !id.starts_with(prefix));
    }

    /// Pop every timer whose deadline has passed, emitting a `TimerFired`
    /// event for each. Firing removes the timer — recurring timers (batch
    /// window, heartbeat, prune, dag refresh) are re-armed by whichever
    /// domain module handles the resulting event.
    pub fn fired_timers(&mut self, now_ms: u64) -> Vec<Event> {
        let mut fired = Vec::new();
        self.timers.retain(|id, timer| {
            if timer.fires_at_ms <= now_ms {
                fired.push(Event::TimerFired { id: TimerId::new(id) });
                false
            } else {
                true
            }
        });
        fired
    }

    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.timers.values().map(|t| t.fires_at_ms).min()
    }

    pub fn has_timers(&self) -> bool {
        !self.timers.is_empty()
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;

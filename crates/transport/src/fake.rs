// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake transport for testing, mirroring `warden_adapters::notify::fake`.
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::client::TransportError;
use crate::Transport;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

struct FakeState {
    connected: bool,
    sent: Vec<Value>,
}

/// In-memory transport for tests. Records every sent frame and lets the
/// test toggle connectivity to exercise the Escalation Protocol's manual-
/// ticket fallback (§4.9).
#[derive(Clone)]
pub struct FakeTransport {
    inner: Arc<Mutex<FakeState>>,
}

impl Default for FakeTransport {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeState {
                connected: true,
                sent: Vec::new(),
            })),
        }
    }
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_connected(&self, connected: bool) {
        self.inner.lock().connected = connected;
    }

    pub fn sent(&self) -> Vec<Value> {
        self.inner.lock().sent.clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, frame: Value) -> Result<(), TransportError> {
        let mut state = self.inner.lock();
        if !state.connected {
            return Err(TransportError::NotConnected);
        }
        state.sent.push(frame);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.inner.lock().connected
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session-validity tracking (§4.11).
//!
//! A small number of server messages mean the current credential is no
//! longer usable at all — reconnecting with it would just be rejected
//! again. Those stop the reconnect loop outright rather than retry.

use serde::{Deserialize, Serialize};

/// Reasons a session can become permanently invalid, per §6's inbound
/// `session_expired` / `auth_failed` / `billing_expired` messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    SessionExpired,
    AuthFailed,
    BillingExpired,
}

/// Current connection/session state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connected,
    /// Terminal: the reconnect loop must not retry until restarted with a
    /// fresh credential.
    Invalid(SessionStatus),
}

impl SessionState {
    pub fn is_invalid(&self) -> bool {
        matches!(self, SessionState::Invalid(_))
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, SessionState::Connected)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

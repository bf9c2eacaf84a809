// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! warden-transport: duplex channel to the server (C11).
//!
//! Owns the WebSocket connection, reconnect backoff, session-validity
//! tracking and HMAC signing. The pipeline domain never touches a socket
//! directly — it calls [`Transport::send`] (via `Effect::SendTransportMessage`)
//! and receives inbound frames through the channel handed back by
//! [`run`].

mod backoff;
mod client;
mod frame;
mod session;
mod signing;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use backoff::ReconnectBackoff;
pub use client::{run, DeviceIdentity, TransportError, TransportHandle, WsTransport, DEFAULT_HEARTBEAT};
pub use frame::{inbound_kind, InboundFrame, OutboundFrame};
pub use session::{SessionState, SessionStatus};
pub use signing::{sign, verify, SigningKey};

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeTransport;

use async_trait::async_trait;

/// Outbound half of the connection to the server.
///
/// Cloneable handle (like `warden_adapters::NotifyAdapter`): cheap to pass
/// around, backed by a shared connection underneath.
#[async_trait]
pub trait Transport: Clone + Send + Sync + 'static {
    /// Send one JSON frame to the server. Buffers/fails fast while
    /// disconnected rather than blocking the caller — callers (the
    /// Escalation Protocol, C9) fall back to a local Manual Ticket when
    /// this returns an error.
    async fn send(&self, frame: serde_json::Value) -> Result<(), TransportError>;

    /// Whether the connection currently has a valid, registered session.
    fn is_connected(&self) -> bool;
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Endpoint-remediation agent daemon library.
//!
//! Exposes the IPC protocol types and wire codec for the CLI client, plus
//! the lifecycle/listener internals used by the `warden-daemon` binary.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod env;
pub mod event_bus;
pub mod lifecycle;
pub mod listener;
pub mod protocol;
#[path = "protocol_wire.rs"]
pub mod protocol_wire;

pub use protocol::{
    ExclusionListsSummary, MaintenanceWindowSummary, PendingActionSummary, Request, Response,
    StatusSummary, TicketSummary,
};
pub use protocol_wire::{ProtocolError, DEFAULT_TIMEOUT, MAX_MESSAGE_SIZE, PROTOCOL_VERSION};

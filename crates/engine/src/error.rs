// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the pipeline domain.

use crate::ExecuteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("execute error: {0}")]
    Execute(#[from] ExecuteError),
    #[error("runbook not found: {0}")]
    RunbookNotFound(String),
    #[error("signature not found: {0}")]
    SignatureNotFound(String),
    #[error("playbook task not found: {0}")]
    TaskNotFound(String),
    #[error("ticket not found: {0}")]
    TicketNotFound(String),
    #[error("playbook queue is full")]
    QueueFull,
    #[error("remediation denied: {0}")]
    AdmissionRejected(String),
    #[error("malformed inbound message {kind}: {reason}")]
    InvalidInboundMessage { kind: String, reason: String },
    #[error("signature verification failed for server-sourced message {kind}")]
    SignatureInvalid { kind: String },
}

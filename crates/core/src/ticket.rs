// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ActionTicket: persistent record of one remediation attempt. Survives
//! process restarts (stored in `tickets.json`).

use crate::runbook::RunbookId;
use crate::signature::SignatureId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    pub struct TicketId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Failed,
    PendingReview,
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketStatus::Open => write!(f, "open"),
            TicketStatus::InProgress => write!(f, "in-progress"),
            TicketStatus::Resolved => write!(f, "resolved"),
            TicketStatus::Failed => write!(f, "failed"),
            TicketStatus::PendingReview => write!(f, "pending-review"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionTicket {
    pub ticket_id: TicketId,
    pub signature_id: SignatureId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playbook_id: Option<RunbookId>,
    pub status: TicketStatus,
    pub created_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at_ms: Option<u64>,
    #[serde(default)]
    pub result_message: String,
    #[serde(default)]
    pub escalated: bool,
}

impl ActionTicket {
    pub fn new(
        ticket_id: TicketId,
        signature_id: SignatureId,
        playbook_id: Option<RunbookId>,
        status: TicketStatus,
        now_ms: u64,
    ) -> Self {
        Self {
            ticket_id,
            signature_id,
            playbook_id,
            status,
            created_at_ms: now_ms,
            updated_at_ms: None,
            result_message: String::new(),
            escalated: false,
        }
    }

    pub fn close(&mut self, status: TicketStatus, message: impl Into<String>, now_ms: u64) {
        self.status = status;
        self.result_message = message.into();
        self.updated_at_ms = Some(now_ms);
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, TicketStatus::Resolved | TicketStatus::Failed)
    }
}

#[cfg(test)]
#[path = "ticket_tests.rs"]
mod tests;

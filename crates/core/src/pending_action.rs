// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pending-Action Store (C12) data model.

use crate::runbook::RunbookId;
use crate::signature::{Signature, SignatureId};
use crate::ticket::TicketId;
use serde::{Deserialize, Serialize};

/// One escalation the server asked a human to review. Suppresses further
/// escalation of the same signature until resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingAction {
    pub signature_id: SignatureId,
    pub ticket_id: TicketId,
    pub signature: Signature,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_runbook: Option<RunbookId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_message: Option<serde_json::Value>,
    pub created_at_ms: u64,
}

#[cfg(test)]
#[path = "pending_action_tests.rs"]
mod tests;

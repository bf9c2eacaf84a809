// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PlaybookTask: an instantiated Runbook bound to parameters, queued for
//! execution by the Playbook Queue (C10).

use crate::runbook::RunbookId;
use crate::ticket::TicketId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

crate::define_id! {
    pub struct PlaybookTaskId;
}

/// Execution priority, ordered low to high for the queue's secondary sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

/// Origin of the task, ordered so server sorts ahead of admin, which sorts
/// ahead of local (the queue's primary sort key, per §4.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Server,
    Admin,
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybookTask {
    pub id: PlaybookTaskId,
    pub runbook_id: RunbookId,
    pub parameters: HashMap<String, String>,
    pub priority: Priority,
    pub source: Source,
    pub created_at_ms: u64,
    pub action_ticket_id: TicketId,
    /// HMAC signature accompanying a server-sourced task, verified at
    /// admission when HMAC enforcement is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

#[cfg(test)]
#[path = "playbook_tests.rs"]
mod tests;

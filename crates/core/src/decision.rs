// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decision Engine (C8) output, and the server's `decision` reply shape.

use crate::runbook::RunbookId;
use crate::signature::SignatureId;
use serde::{Deserialize, Serialize};

/// The Decision Engine's single output per Signature (§4.8).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PipelineDecision {
    /// Cached solution exists, or (matched class-A runbook, confidence >= 85,
    /// memory allows).
    ExecuteLocal { runbook_id: RunbookId },
    /// Matched runbook is class B/C or confidence < 85, or no runbook matched.
    Escalate,
    /// Server classified this for human review; suppresses the signature
    /// until `execute_pending_action`/`cancel_pending_action`.
    AwaitReview,
    /// Signature excluded, or server said ignore.
    Ignore,
}

/// `decision_type` values on an inbound server `decision` message (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerDecisionType {
    ExecuteA,
    ExecuteB,
    RequestApproval,
    AdvisoryOnly,
    Block,
    Ignore,
}

/// Category an `ignore` decision adds to the exclusion list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreCategory {
    Services,
    Processes,
    Signatures,
}

/// Full field set of a server `decision` reply (§6). Optional fields are
/// genuinely absent depending on `decision_type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerDecision {
    pub decision_type: ServerDecisionType,
    pub confidence_server: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_playbook_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playbook_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<std::collections::HashMap<String, String>>,
    #[serde(default)]
    pub requires_approval: bool,
    #[serde(default)]
    pub justification_codes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_requirements: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown_override: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_category: Option<IgnoreCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_id: Option<SignatureId>,
}

#[cfg(test)]
#[path = "decision_tests.rs"]
mod tests;

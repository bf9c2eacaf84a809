// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decision Engine (C8): turns one fresh Signature into exactly one
//! [`PipelineDecision`], and turns one inbound server `decision` reply into
//! the state transition the pipeline domain must apply (§4.8).

use std::collections::HashMap;
use warden_core::decision::{IgnoreCategory, ServerDecision, ServerDecisionType};
use warden_core::runbook::{Runbook, RunbookId};
use warden_core::{ExclusionLists, PipelineDecision, RemediationMemory, Signature};
use warden_runbook::can_auto_execute;

/// `decideAction` (§4.8). `signal_key`/`device_id` identify the originating
/// signal in RemediationMemory terms — a Signature alone doesn't carry them.
///
/// Check order: exclusion list, then cached solution, then the matched
/// runbook's class/confidence/admission. `await-review` is never produced
/// here — it is only reachable by processing a server `decision` reply
/// (see [`apply_server_decision`]), since nothing local can classify a
/// signature for human review without the server's say-so.
pub fn decide(
    signal_key: &str,
    device_id: &str,
    signature: &Signature,
    matched_runbook: Option<&Runbook>,
    memory: &RemediationMemory,
    exclusions: &ExclusionLists,
) -> PipelineDecision {
    if exclusions.contains_signature(signature.signature_id.as_str()) {
        return PipelineDecision::Ignore;
    }

    if let Some(cached) = memory.find_cached_solution(signal_key, device_id) {
        return PipelineDecision::ExecuteLocal { runbook_id: RunbookId::new(cached) };
    }

    let Some(runbook) = matched_runbook else {
        return PipelineDecision::Escalate;
    };

    if !can_auto_execute(runbook.risk_class, signature.confidence) {
        return PipelineDecision::Escalate;
    }

    let resource_name = signature.targets.first().map(|t| t.name.as_str());
    let admission = memory.should_attempt_remediation(signal_key, device_id, runbook.id.as_str(), resource_name);
    if !admission.allowed {
        return PipelineDecision::Escalate;
    }

    PipelineDecision::ExecuteLocal { runbook_id: runbook.id.clone() }
}

/// What the pipeline domain must do in response to a server `decision`
/// reply (§4.8's "state transitions on reply" table).
#[derive(Debug, Clone, PartialEq)]
pub enum ServerDecisionOutcome {
    /// `execute_A`: instantiate a PlaybookTask and hand it to C10.
    InstantiatePlaybook {
        runbook_id: Option<RunbookId>,
        playbook_version: Option<u32>,
        parameters: HashMap<String, String>,
    },
    /// `execute_B`: store as a pending action awaiting operator approval.
    StoreForApproval {
        runbook_id: Option<RunbookId>,
        approval_token: Option<String>,
    },
    /// `request_approval` / `advisory_only` / `block`: record only, no
    /// further action taken by the pipeline domain.
    RecordOnly,
    /// `ignore`: add to the exclusion list, close open tickets, notify,
    /// and reply `action_result{success}`.
    Ignore { category: IgnoreCategory, target: String },
}

pub fn apply_server_decision(decision: &ServerDecision) -> ServerDecisionOutcome {
    match decision.decision_type {
        ServerDecisionType::ExecuteA => ServerDecisionOutcome::InstantiatePlaybook {
            runbook_id: decision.recommended_playbook_id.clone().map(RunbookId::new),
            playbook_version: decision.playbook_version,
            parameters: decision.parameters.clone().unwrap_or_default(),
        },
        ServerDecisionType::ExecuteB => ServerDecisionOutcome::StoreForApproval {
            runbook_id: decision.recommended_playbook_id.clone().map(RunbookId::new),
            approval_token: decision.approval_token.clone(),
        },
        ServerDecisionType::RequestApproval | ServerDecisionType::AdvisoryOnly | ServerDecisionType::Block => {
            ServerDecisionOutcome::RecordOnly
        }
        ServerDecisionType::Ignore => ServerDecisionOutcome::Ignore {
            category: decision.ignore_category.unwrap_or(IgnoreCategory::Signatures),
            target: decision.ignore_target.clone().unwrap_or_default(),
        },
    }
}

#[cfg(test)]
#[path = "decision_engine_tests.rs"]
mod tests;

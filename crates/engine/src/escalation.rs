// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Escalation Protocol (C9): gates an escalation-worthy Signature before it
//! leaves the device, builds the sanitized payload, decides immediate-send
//! vs batching vs local-ticket fallback, and verifies inbound server
//! messages that carry an HMAC envelope.

use crate::diagnostics::DiagnosticCollector;
use crate::error::EngineError;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use warden_core::signal::Severity;
use warden_core::signature::Signature;
use warden_transport::{InboundFrame, SigningKey};

/// Default per-signature cooldown between escalations (§4.9); a server
/// `decision.cooldown_override` supersedes this for a given signature.
pub const ESCALATION_COOLDOWN_MS: u64 = 5 * 60 * 1000;
/// Non-urgent escalations wait this long for companions before sending as a
/// batch (§4.9).
pub const BATCH_WINDOW_SECS: u64 = 10;
/// Single umbrella timeout covering all pre-escalation diagnostic
/// collection; a slow collector must not delay the escalation itself.
pub const PRE_ESCALATION_DIAGNOSTIC_BUDGET: Duration = Duration::from_secs(15);

/// Outcome of the three short-circuit admission gates (§4.9), checked in
/// this order: ignore list, await-review suppression, cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationGate {
    Proceed,
    Ignored,
    AwaitingReview,
    Cooldown,
}

impl EscalationGate {
    pub fn should_proceed(self) -> bool {
        matches!(self, EscalationGate::Proceed)
    }
}

/// `escalateToServer`'s admission check. `last_escalation_ms` is this
/// signature's cooldown-map entry, if any.
pub fn check_gates(
    excluded: bool,
    awaiting_review: bool,
    last_escalation_ms: Option<u64>,
    now_ms: u64,
    cooldown_ms: u64,
) -> EscalationGate {
    if excluded {
        return EscalationGate::Ignored;
    }
    if awaiting_review {
        return EscalationGate::AwaitingReview;
    }
    if let Some(last) = last_escalation_ms {
        if now_ms.saturating_sub(last) < cooldown_ms {
            return EscalationGate::Cooldown;
        }
    }
    EscalationGate::Proceed
}

/// How an admitted escalation should leave the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPlan {
    /// High/critical severity: flush immediately, bypassing the batch window.
    SendImmediately,
    /// Ordinary severity: join the 10s batch window.
    Batch,
    /// Transport disconnected: bypass the batch entirely, open a local
    /// Manual Ticket instead of queuing for a socket that may not return.
    FallbackManualTicket,
}

pub fn dispatch_plan(severity: Severity, transport_connected: bool) -> DispatchPlan {
    if !transport_connected {
        return DispatchPlan::FallbackManualTicket;
    }
    match severity {
        Severity::High | Severity::Critical => DispatchPlan::SendImmediately,
        _ => DispatchPlan::Batch,
    }
}

/// One escalation payload (§6's field list). Serializes into the `data`
/// field of an `escalation`/`batch_escalation` outbound frame.
#[derive(Debug, Clone, Serialize)]
pub struct EscalationPayload {
    pub tenant: String,
    pub device: String,
    pub signature_id: String,
    pub severity: String,
    pub symptoms: Vec<String>,
    pub targets: Vec<String>,
    pub baseline_deviation: bool,
    pub context_tags: Vec<String>,
    pub recent_actions: Vec<String>,
    pub local_confidence: u8,
    pub requested_outcome: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub diagnostics: HashMap<String, HashMap<String, String>>,
}

/// Redact IPs, user home paths, and credential-shaped strings before a
/// symptom/target string leaves the device. Best-effort, not a substitute
/// for adapters not collecting secrets in the first place.
pub fn sanitize_text(input: &str) -> String {
    const PATTERNS: &[(&str, &str)] = &[
        (r"\b\d{1,3}(?:\.\d{1,3}){3}\b", "[REDACTED_IP]"),
        (r"(?i)[a-z]:\\Users\\[^\\]+", "[REDACTED_PATH]"),
        (r"/home/[^/\s]+", "[REDACTED_PATH]"),
        (r"(?i)\b(?:token|secret|password|apikey|api_key)\s*[:=]\s*\S+", "[REDACTED]"),
    ];
    let mut out = input.to_string();
    for (pattern, replacement) in PATTERNS {
        if let Ok(re) = regex::Regex::new(pattern) {
            out = re.replace_all(&out, *replacement).into_owned();
        }
    }
    out
}

#[allow(clippy::too_many_arguments)]
pub fn build_payload(
    tenant: &str,
    device: &str,
    signature: &Signature,
    baseline_deviation: bool,
    recent_actions: &[String],
    requested_outcome: &str,
    diagnostics: HashMap<String, HashMap<String, String>>,
) -> EscalationPayload {
    EscalationPayload {
        tenant: tenant.to_string(),
        device: device.to_string(),
        signature_id: signature.signature_id.as_str().to_string(),
        severity: signature.severity.to_string(),
        symptoms: signature.symptoms.iter().map(|s| sanitize_text(&s.details)).collect(),
        targets: signature.targets.iter().map(|t| sanitize_text(&t.name)).collect(),
        baseline_deviation,
        context_tags: [&signature.context.device_role, &signature.context.os_build]
            .into_iter()
            .filter(|tag| !tag.is_empty())
            .cloned()
            .collect(),
        recent_actions: recent_actions.iter().take(3).cloned().collect(),
        local_confidence: signature.confidence,
        requested_outcome: requested_outcome.to_string(),
        diagnostics,
    }
}

/// Inbound message kinds that carry an HMAC `_signature` envelope when
/// signing is configured (§6, §9). Everything else (heartbeats, welcome,
/// acks) is never required to be signed.
pub fn requires_signature(kind: &str) -> bool {
    use warden_transport::inbound_kind::*;
    matches!(
        kind,
        DECISION
            | EXECUTE_PLAYBOOK
            | PLAYBOOK
            | EXECUTE_PENDING_ACTION
            | CANCEL_PENDING_ACTION
            | ADD_TO_IGNORE_LIST
            | MAINTENANCE_WINDOW
            | CANCEL_MAINTENANCE_WINDOW
            | KEY_ROTATION
            | REINVESTIGATION_RESPONSE
    )
}

/// Verify an inbound frame's `_signature` when its kind requires one. A
/// frame type that doesn't require signing always passes.
pub fn verify_inbound(frame: &InboundFrame, signing_key: Option<&SigningKey>) -> Result<(), EngineError> {
    let Some(key) = signing_key else {
        return Ok(());
    };
    if !requires_signature(&frame.kind) {
        return Ok(());
    }
    let Some(sig) = frame.raw.get("_signature").and_then(Value::as_str) else {
        return Err(EngineError::SignatureInvalid { kind: frame.kind.clone() });
    };
    let mut payload = frame.raw.clone();
    if let Some(obj) = payload.as_object_mut() {
        obj.remove("_signature");
    }
    let bytes = serde_json::to_vec(&payload).unwrap_or_default();
    if key.verify(&bytes, sig) {
        Ok(())
    } else {
        Err(EngineError::SignatureInvalid { kind: frame.kind.clone() })
    }
}

/// Collects pre-escalation diagnostics under one umbrella timeout; a
/// collector that doesn't return in time yields whatever was gathered so
/// far rather than blocking the escalation (§5, §9).
pub struct EscalationProtocol<D: DiagnosticCollector> {
    diagnostics: D,
}

impl<D: DiagnosticCollector> EscalationProtocol<D> {
    pub fn new(diagnostics: D) -> Self {
        Self { diagnostics }
    }

    pub async fn collect_diagnostics(&self, categories: &[&str]) -> HashMap<String, HashMap<String, String>> {
        let diagnostics = &self.diagnostics;
        let gather = async move {
            let mut out = HashMap::new();
            for category in categories {
                let facts = diagnostics.collect(category, PRE_ESCALATION_DIAGNOSTIC_BUDGET).await;
                out.insert((*category).to_string(), facts);
            }
            out
        };
        tokio::time::timeout(PRE_ESCALATION_DIAGNOSTIC_BUDGET, gather).await.unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "escalation_tests.rs"]
mod tests;

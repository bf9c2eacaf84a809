// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signature Generator (C5): turns one post-gate [`Signal`] into a stable,
//! hash-identified [`Signature`] (§4.5), and matches it against a loaded
//! runbook registry.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use warden_core::runbook::Runbook;
use warden_core::signal::Severity;
use warden_core::signature::{Signature, SignatureContext, SignatureId, Symptom, Target};
use warden_core::Signal;

/// Base confidence by severity when a signal carries no threshold to
/// measure distance against (§4.5: "rule-match strength / threshold
/// distance").
fn base_confidence(severity: Severity) -> u8 {
    match severity {
        Severity::Info => 40,
        Severity::Warning => 65,
        Severity::Critical => 85,
        Severity::High => 95,
    }
}

/// Confidence from how far the observed value sits past its threshold: a
/// small overshoot scores near the severity floor, a large one approaches
/// 100. Saturates rather than exceeding the 0-100 scale.
fn threshold_distance_confidence(value: f64, threshold: f64, severity: Severity) -> u8 {
    let floor = base_confidence(severity);
    if threshold == 0.0 {
        return floor;
    }
    let overshoot = ((value - threshold).abs() / threshold.abs()).min(1.0);
    let bonus = ((100 - floor) as f64 * overshoot).round() as u8;
    floor.saturating_add(bonus)
}

/// Stable hash over (tenant, device, category, targets, canonical symptom
/// set) (§3). Identical observation from an identical device yields an
/// identical id.
fn hash_signature_id(tenant_id: &str, device_id: &str, signal: &Signal) -> SignatureId {
    let mut attrs: Vec<(&String, &String)> = signal.attributes.iter().collect();
    attrs.sort_by_key(|(k, _)| k.as_str());
    let mut hasher = Sha256::new();
    hasher.update(tenant_id.as_bytes());
    hasher.update(b"|");
    hasher.update(device_id.as_bytes());
    hasher.update(b"|");
    hasher.update(signal.category.as_bytes());
    hasher.update(b"|");
    hasher.update(signal.metric.as_bytes());
    hasher.update(b"|");
    hasher.update(signal.target.as_bytes());
    for (k, v) in attrs {
        hasher.update(b"|");
        hasher.update(k.as_bytes());
        hasher.update(b"=");
        hasher.update(v.as_bytes());
    }
    let digest = hasher.finalize();
    let hex: String = digest.iter().take(10).map(|b| format!("{b:02x}")).collect();
    SignatureId::new(format!("sig-{hex}"))
}

/// `generate(signal) -> Signature` (§4.5). `confidence_modifier` is the
/// per-resource modifier from RemediationMemory (C7), applied after the
/// rule-match/threshold-distance confidence is computed.
pub fn generate(
    tenant_id: &str,
    device_id: &str,
    signal: &Signal,
    context: SignatureContext,
    confidence_modifier: f64,
) -> Signature {
    let confidence = match signal.threshold {
        Some(threshold) => threshold_distance_confidence(signal.value, threshold, signal.severity),
        None => base_confidence(signal.severity),
    };
    let mut signature = Signature {
        signature_id: hash_signature_id(tenant_id, device_id, signal),
        severity: signal.severity,
        confidence,
        symptoms: vec![Symptom {
            kind: format!("{}.{}", signal.category, signal.metric),
            severity: signal.severity,
            details: if signal.message.is_empty() {
                format!("{} observed {} = {}", signal.resource_id, signal.metric, signal.value)
            } else {
                signal.message.clone()
            },
        }],
        targets: vec![Target { kind: signal.category.clone(), name: signal.target.clone() }],
        context,
    };
    signature.apply_confidence_modifier(confidence_modifier);
    signature
}

/// Candidate-runbook lookup: the registry is keyed by the `signal_key`
/// (category-metric) the runbook was authored to remediate. Not a full
/// rule-matching engine — the registry holds at most one runbook per
/// signal_key; registering a second under the same key replaces the first.
pub fn match_runbook<'a>(signal_key: &str, registry: &'a HashMap<String, Arc<Runbook>>) -> Option<&'a Arc<Runbook>> {
    registry.get(signal_key)
}

#[cfg(test)]
#[path = "signature_generator_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signature: stable hash-identified aggregation of a Signal (C5 output).

use crate::signal::Severity;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Stable hash over (tenant, device, category, targets, canonical
    /// symptom set). Identical observation on identical device yields an
    /// identical `SignatureId`.
    pub struct SignatureId;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symptom {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureContext {
    #[serde(default)]
    pub os_build: String,
    #[serde(default)]
    pub os_version: String,
    #[serde(default)]
    pub device_role: String,
}

/// Deterministic identity assigned to a cluster of related symptoms.
///
/// Lifetime spans one decision cycle; persisted indirectly through the
/// Pending-Action Store when escalation enters await-review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signature {
    pub signature_id: SignatureId,
    pub severity: Severity,
    /// 0-100 integer confidence, scaled by the resource confidence_modifier.
    pub confidence: u8,
    pub symptoms: Vec<Symptom>,
    pub targets: Vec<Target>,
    pub context: SignatureContext,
}

impl Signature {
    /// Apply a resource confidence_modifier (from RemediationMemory) to the
    /// signature's confidence, clamped to [0, 100].
    pub fn apply_confidence_modifier(&mut self, modifier: f64) {
        let scaled = (self.confidence as f64 * modifier).round();
        self.confidence = scaled.clamp(0.0, 100.0) as u8;
    }
}

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;

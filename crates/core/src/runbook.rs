// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runbook: a static, versioned remediation recipe (C6 input/output).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

crate::define_id! {
    pub struct RunbookId;
}

/// Risk class assigned by the Runbook Classifier at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskClass {
    /// Auto-executable given sufficient confidence.
    A,
    /// Requires an approval token.
    B,
    /// Never auto-executed; human-only.
    C,
}

impl std::fmt::Display for RiskClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskClass::A => write!(f, "A"),
            RiskClass::B => write!(f, "B"),
            RiskClass::C => write!(f, "C"),
        }
    }
}

/// Kind of operation a single runbook step performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    ShellInvoke,
    ServiceControl,
    FileOp,
    RegistryOp,
    Query,
    Reboot,
    UserPrompt,
    Sleep,
}

/// One ordered step of a runbook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunbookStep {
    pub name: String,
    pub kind: StepKind,
    /// Action string, e.g. `startService` or a shell command template.
    pub action: String,
    /// Parameter mapping; values may contain `{{placeholders}}` resolved
    /// against the PlaybookTask's resolved parameters at execution time.
    #[serde(default)]
    pub parameters: HashMap<String, String>,
    /// Per-step timeout in seconds (default 60, per §5).
    #[serde(default = "default_step_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub allow_failure: bool,
    #[serde(default)]
    pub requires_approval: bool,
    /// Run this step's rollback (from `rollback_steps`) if this step fails.
    #[serde(default)]
    pub rollback_on_failure: bool,
}

pub fn default_step_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationDescriptor {
    pub step_name: String,
    pub expected: String,
}

/// Static, versioned remediation recipe. Loaded at startup; mutated only by
/// the Runbook Classifier, which annotates `risk_class`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Runbook {
    pub id: RunbookId,
    pub name: String,
    pub risk_class: RiskClass,
    pub steps: Vec<RunbookStep>,
    #[serde(default)]
    pub verification: Vec<VerificationDescriptor>,
    #[serde(default)]
    pub rollback_steps: Vec<RunbookStep>,
    pub estimated_duration_secs: u64,
    pub user_impact_class: String,
    /// Source this runbook definition came from: a local file, or pushed by
    /// the server (feeds the Playbook Queue's source-based admission and
    /// ordering rules).
    #[serde(default)]
    pub version: u32,
}

impl Runbook {
    /// True only for a risk_class==A runbook's own policy; the confidence
    /// gate is applied by the Decision Engine, not here.
    pub fn is_class_a(&self) -> bool {
        self.risk_class == RiskClass::A
    }
}

#[cfg(test)]
#[path = "runbook_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runbook Classifier (C6): assigns risk_class from runbook steps at load
//! time and enforces the auto-execute confidence thresholds.

use warden_core::runbook::{RiskClass, Runbook, RunbookStep, StepKind};

/// Confidence threshold a class must clear, per §4.6: A=85, B=90, C=95.
///
/// Only the A threshold currently gates auto-execution (C8); B and C are
/// never auto-executed regardless of confidence, but the thresholds are
/// kept here as the single source of truth for all three classes.
pub fn confidence_threshold(class: RiskClass) -> u8 {
    match class {
        RiskClass::A => 85,
        RiskClass::B => 90,
        RiskClass::C => 95,
    }
}

/// `canAutoExecute(id, confidence)`. Class B always requires an approval
/// token and class C is never auto-executed, so only class A can pass here.
pub fn can_auto_execute(class: RiskClass, confidence: u8) -> bool {
    class == RiskClass::A && confidence >= confidence_threshold(RiskClass::A)
}

/// Classify a runbook's steps and annotate `risk_class` in place.
///
/// This is the only function allowed to mutate `risk_class` after a runbook
/// is loaded.
pub fn classify_runbook(runbook: &mut Runbook) {
    runbook.risk_class = classify_steps(&runbook.steps);
}

fn classify_steps(steps: &[RunbookStep]) -> RiskClass {
    if steps.iter().any(is_class_c_step) {
        RiskClass::C
    } else if steps.iter().any(is_class_b_step) {
        RiskClass::B
    } else {
        RiskClass::A
    }
}

/// Registry writes, policy/firewall/security changes, account/domain ops,
/// `Remove-*`/`Disable-*` actions, execution-policy changes.
fn is_class_c_step(step: &RunbookStep) -> bool {
    if step.kind == StepKind::RegistryOp {
        return true;
    }
    let action = step.action.to_lowercase();
    action.contains("firewall")
        || action.contains("security")
        || action.contains("policy")
        || action.contains("account")
        || action.contains("domain")
        || has_cmdlet_prefix(&action, "remove-")
        || has_cmdlet_prefix(&action, "disable-")
        || action.contains("executionpolicy")
        || action.contains("execution-policy")
}

/// Network config, scheduled tasks, computer restart/shutdown, or a step
/// explicitly flagged `requires_approval`.
fn is_class_b_step(step: &RunbookStep) -> bool {
    if step.requires_approval || step.kind == StepKind::Reboot {
        return true;
    }
    let action = step.action.to_lowercase();
    action.contains("network")
        || action.contains("scheduledtask")
        || action.contains("scheduled task")
        || action.contains("restart-computer")
        || action.contains("shutdown")
}

/// True if `action` contains a PowerShell-style cmdlet verb, either at the
/// start of the string or after a word boundary (so `Invoke-Remove-Item`
/// style composites still match on the embedded verb).
fn has_cmdlet_prefix(action: &str, verb: &str) -> bool {
    action.starts_with(verb) || action.contains(&format!(" {verb}"))
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;

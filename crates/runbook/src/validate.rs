// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structural validation for parsed runbooks.

use std::collections::HashSet;
use warden_core::runbook::{Runbook, RunbookStep, StepKind};

/// Validate a runbook's structure. Returns a human-readable message on the
/// first problem found.
pub(crate) fn validate_runbook(runbook: &Runbook) -> Result<(), String> {
    if runbook.steps.is_empty() {
        return Err("runbook has no steps".to_string());
    }

    let mut seen_names = HashSet::new();
    for (i, step) in runbook.steps.iter().enumerate() {
        validate_step(step, &format!("steps[{i}]"))?;
        if !seen_names.insert(step.name.as_str()) {
            return Err(format!("duplicate step name '{}'", step.name));
        }
    }

    let uses_rollback = runbook.steps.iter().any(|s| s.rollback_on_failure);
    if uses_rollback && runbook.rollback_steps.is_empty() {
        return Err(
            "a step sets rollback_on_failure but rollback_steps is empty".to_string(),
        );
    }

    let step_names: HashSet<&str> = runbook.steps.iter().map(|s| s.name.as_str()).collect();
    for v in &runbook.verification {
        if !step_names.contains(v.step_name.as_str()) {
            return Err(format!(
                "verification references unknown step '{}'",
                v.step_name
            ));
        }
    }

    Ok(())
}

fn validate_step(step: &RunbookStep, location: &str) -> Result<(), String> {
    if step.name.is_empty() {
        return Err(format!("{location}: step name is required"));
    }
    if step.action.is_empty() {
        return Err(format!("{location}({}): action is required", step.name));
    }
    if step.timeout_secs == 0 {
        return Err(format!(
            "{location}({}): timeout_secs must be greater than zero",
            step.name
        ));
    }
    if step.kind == StepKind::ShellInvoke {
        validate_shell_command(&step.action, &format!("{location}({}).action", step.name))?;
    }
    Ok(())
}

/// Parse and validate a shell-invoke step's action as shell syntax.
///
/// `{{placeholder}}` references are normalized to a bare identifier first so
/// they don't trip the shell parser's brace-expansion handling.
fn validate_shell_command(command: &str, location: &str) -> Result<(), String> {
    let normalized = crate::template::VAR_PATTERN.replace_all(command, "_VAR_");
    let ast = warden_shell::Parser::parse(&normalized)
        .map_err(|e| format!("invalid shell command in {location}: {e}"))?;
    if let Err(errors) = warden_shell::validate(&ast) {
        if let Some(first) = errors.into_iter().next() {
            return Err(format!("invalid shell command in {location}: {first}"));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;

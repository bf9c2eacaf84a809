// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Playbook Queue (C10): single sequential executor, bounded depth,
//! 5-step admission control, and the shell-invoking safety rules (§4.10,
//! §9) that turn a structured runbook step into the command text the
//! Executor actually runs.

use crate::error::EngineError;
use std::collections::HashMap;
use std::sync::Arc;
use warden_core::memory::RemediationMemory;
use warden_core::playbook::{PlaybookTask, Priority, Source};
use warden_core::runbook::{Runbook, RunbookStep, StepKind};
use warden_runbook::{interpolate, interpolate_shell};
use warden_transport::SigningKey;

pub const MAX_QUEUE_DEPTH: usize = 50;
/// Execution count at which a cached server-sourced runbook is
/// re-submitted to the server for reinvestigation (§4.10).
pub const REINVESTIGATION_THRESHOLD: u64 = 10;
/// Reboot-delay parameter bound (§4.10: `reboot delay in [0, 3600]`).
pub const REBOOT_DELAY_RANGE_SECS: std::ops::RangeInclusive<i64> = 0..=3600;

/// Services/processes the executor refuses to touch regardless of what a
/// runbook asks for. Not exhaustive — a curated floor under every runbook's
/// own judgment, matching the classifier's own curated C-class patterns.
pub const PROTECTED_SERVICES: &[&str] = &["sshd", "systemd", "dbus", "networkmanager", "init"];
pub const PROTECTED_PROCESSES: &[&str] = &["systemd", "init", "kernel", "launchd"];

fn is_protected_service(name: &str) -> bool {
    PROTECTED_SERVICES.iter().any(|s| s.eq_ignore_ascii_case(name))
}

fn is_protected_process(name: &str) -> bool {
    PROTECTED_PROCESSES.iter().any(|s| s.eq_ignore_ascii_case(name))
}

/// Curated name markers identifying a playbook whose entire purpose is to
/// suppress a signal rather than remediate it (§4.10c).
const IGNORE_INSTRUCTION_MARKERS: &[&str] = &["ignore-signal", "suppress-and-close", "no-op-ignore"];

pub fn is_ignore_instruction_playbook(runbook: &Runbook) -> bool {
    let haystack = runbook.name.to_lowercase();
    IGNORE_INSTRUCTION_MARKERS.iter().any(|marker| haystack.contains(marker))
}

/// The permitted-cmdlet translation table: only these (kind, action verb)
/// pairs may be turned into a shell command. Anything else is rejected at
/// structural validation rather than shelled out blind.
fn action_template(kind: StepKind, action: &str) -> Option<&'static str> {
    match (kind, action) {
        (StepKind::ServiceControl, "startService") => Some("systemctl start {{service}}"),
        (StepKind::ServiceControl, "stopService") => Some("systemctl stop {{service}}"),
        (StepKind::ServiceControl, "restartService") => Some("systemctl restart {{service}}"),
        (StepKind::FileOp, "deleteFile") => Some("rm -f {{path}}"),
        (StepKind::FileOp, "truncateFile") => Some("truncate -s 0 {{path}}"),
        (StepKind::Query, "queryServiceStatus") => Some("systemctl is-active {{service}}"),
        (StepKind::Query, "queryDiskFree") => Some("df -h {{path}}"),
        (StepKind::Reboot, "rebootHost") => Some("sleep {{delay_seconds}} && shutdown -r now"),
        _ => None,
    }
}

/// Resolve one runbook step into the shell command text the Executor will
/// run, applying the denylist, range validation, and `{{placeholder}}`
/// escaping rules (§4.10, §9). `ShellInvoke` steps carry their own command
/// template and skip the translation table but not the other checks.
pub fn resolve_step_command(step: &RunbookStep, params: &HashMap<String, String>) -> Result<String, EngineError> {
    if let Some(service) = params.get("service") {
        if is_protected_service(service) {
            return Err(EngineError::AdmissionRejected(format!("refusing to act on protected service {service}")));
        }
    }
    if let Some(process) = params.get("process") {
        if is_protected_process(process) {
            return Err(EngineError::AdmissionRejected(format!("refusing to act on protected process {process}")));
        }
    }
    if step.kind == StepKind::Reboot {
        if let Some(delay) = params.get("delay_seconds") {
            let secs: i64 = delay
                .parse()
                .map_err(|_| EngineError::AdmissionRejected("delay_seconds must be an integer".into()))?;
            if !REBOOT_DELAY_RANGE_SECS.contains(&secs) {
                return Err(EngineError::AdmissionRejected("reboot delay must be within [0, 3600] seconds".into()));
            }
        }
    }

    match step.kind {
        StepKind::ShellInvoke => Ok(interpolate_shell(&step.action, params)),
        StepKind::UserPrompt | StepKind::Sleep => Ok(interpolate(&step.action, params)),
        _ => {
            let template = action_template(step.kind, &step.action)
                .ok_or_else(|| EngineError::AdmissionRejected(format!("{} is not a permitted {:?} action", step.action, step.kind)))?;
            Ok(interpolate_shell(template, params))
        }
    }
}

/// Heuristic for an implicit verification step (§4.10): a `Query` step
/// immediately following a non-query mutation against the same target.
/// Verification steps get `allow_failure=true` regardless of what the
/// runbook author set, since the mutation already happened.
pub fn is_verification_step(steps: &[RunbookStep], index: usize) -> bool {
    let Some(step) = steps.get(index) else { return false };
    if step.kind != StepKind::Query {
        return false;
    }
    let Some(prev) = index.checked_sub(1).and_then(|i| steps.get(i)) else {
        return false;
    };
    prev.kind != StepKind::Query && same_target(prev, step)
}

fn same_target(a: &RunbookStep, b: &RunbookStep) -> bool {
    fn target(s: &RunbookStep) -> Option<&str> {
        s.parameters
            .get("service")
            .or_else(|| s.parameters.get("path"))
            .or_else(|| s.parameters.get("target"))
            .map(String::as_str)
    }
    matches!((target(a), target(b)), (Some(x), Some(y)) if x == y)
}

/// A non-verification step fails, declares `rollback_on_failure`, and the
/// runbook actually supplies rollback steps — the only case rollback runs.
pub fn should_rollback(runbook: &Runbook, failed_step: &RunbookStep, is_verification: bool) -> bool {
    !is_verification && failed_step.rollback_on_failure && !runbook.rollback_steps.is_empty()
}

/// Verify a server-sourced task's signature. Local/admin-sourced tasks are
/// never required to carry one; a server-sourced task is rejected only if
/// HMAC signing is configured and the signature is missing or invalid.
fn verify_task_signature(task: &PlaybookTask, signing_key: Option<&SigningKey>) -> Result<(), EngineError> {
    if task.source != Source::Server {
        return Ok(());
    }
    let Some(key) = signing_key else {
        return Ok(());
    };
    let Some(sig) = &task.signature else {
        return Err(EngineError::SignatureInvalid { kind: "playbook".into() });
    };
    let payload = format!("{}:{}", task.runbook_id.as_str(), task.id.as_str());
    if key.verify(payload.as_bytes(), sig) {
        Ok(())
    } else {
        Err(EngineError::SignatureInvalid { kind: "playbook".into() })
    }
}

/// Every `{{name}}` in every step resolves against the task's bound
/// parameters — an unresolved placeholder means the task is malformed.
fn validate_structure(runbook: &Runbook, task: &PlaybookTask) -> Result<(), EngineError> {
    if runbook.steps.is_empty() {
        return Err(EngineError::AdmissionRejected("runbook has no steps".into()));
    }
    for step in &runbook.steps {
        if interpolate(&step.action, &task.parameters).contains("{{") {
            return Err(EngineError::AdmissionRejected(format!("step {} references an unresolved parameter", step.name)));
        }
    }
    Ok(())
}

/// Result of the first four admission checks (§4.10 a-d); the fifth
/// (queue-full) is checked by [`PlaybookQueue::enqueue`] itself since it
/// depends on queue state this function doesn't see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionOutcome {
    Admit,
    IgnoreInstruction,
    Rejected(String),
}

#[allow(clippy::too_many_arguments)]
pub fn evaluate_admission(
    task: &PlaybookTask,
    runbook: &Runbook,
    signing_key: Option<&SigningKey>,
    memory: &RemediationMemory,
    resource_name: Option<&str>,
    signal_key: &str,
    device_id: &str,
) -> AdmissionOutcome {
    if let Err(e) = verify_task_signature(task, signing_key) {
        return AdmissionOutcome::Rejected(e.to_string());
    }
    if let Err(e) = validate_structure(runbook, task) {
        return AdmissionOutcome::Rejected(e.to_string());
    }
    if is_ignore_instruction_playbook(runbook) {
        return AdmissionOutcome::IgnoreInstruction;
    }
    let admission = memory.should_attempt_remediation(signal_key, device_id, runbook.id.as_str(), resource_name);
    if !admission.allowed {
        return AdmissionOutcome::Rejected(admission.reason.unwrap_or("remediation denied").to_string());
    }
    AdmissionOutcome::Admit
}

pub fn should_request_reinvestigation(memory: &RemediationMemory, runbook_id: &str) -> bool {
    memory.playbooks.get(runbook_id).map(|stats| stats.total == REINVESTIGATION_THRESHOLD).unwrap_or(false)
}

struct QueueEntry {
    task: PlaybookTask,
    runbook: Arc<Runbook>,
    seq: u64,
}

fn ordering_key(entry: &QueueEntry) -> (u8, u8, u64) {
    let source_rank = match entry.task.source {
        Source::Server => 0,
        Source::Admin => 1,
        Source::Local => 2,
    };
    let priority_rank = match entry.task.priority {
        Priority::Critical => 0,
        Priority::High => 1,
        Priority::Medium => 2,
        Priority::Low => 3,
    };
    (source_rank, priority_rank, entry.seq)
}

/// Single-executor queue: primary sort by source (server < admin < local),
/// secondary by priority (critical < high < medium < low), FIFO within a
/// tied key (§4.10).
#[derive(Default)]
pub struct PlaybookQueue {
    entries: Vec<QueueEntry>,
    next_seq: u64,
}

impl PlaybookQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_QUEUE_DEPTH
    }

    /// Admission step (e): queue a task already judged [`AdmissionOutcome::Admit`].
    pub fn enqueue(&mut self, task: PlaybookTask, runbook: Arc<Runbook>) -> Result<(), EngineError> {
        if self.is_full() {
            return Err(EngineError::QueueFull);
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(QueueEntry { task, runbook, seq });
        self.entries.sort_by(|a, b| ordering_key(a).cmp(&ordering_key(b)));
        Ok(())
    }

    pub fn pop_next(&mut self) -> Option<(PlaybookTask, Arc<Runbook>)> {
        if self.entries.is_empty() {
            return None;
        }
        let entry = self.entries.remove(0);
        Some((entry.task, entry.runbook))
    }
}

#[cfg(test)]
#[path = "playbook_queue_tests.rs"]
mod tests;

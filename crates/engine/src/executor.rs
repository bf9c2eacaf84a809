// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effect executor: the only place in the pipeline domain that touches a
//! subprocess, a socket, or a timer. Domain modules (C1-C10) return
//! `Effect` values; this module carries them out and reports any resulting
//! `Event` back so the caller can persist it to the WAL.

use crate::diagnostics::DiagnosticCollector;
use crate::Scheduler;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use warden_adapters::notify::{NotifyAdapter, NotifyError};
use warden_adapters::subprocess::run_with_timeout;
use warden_core::runbook::StepKind;
use warden_core::{Clock, Effect, Event, PlaybookTaskId};
use warden_storage::MaterializedState;
use warden_transport::{Transport, TransportError};

/// Errors that can occur during effect execution.
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("notify failed: {0}")]
    Notify(#[from] NotifyError),
    #[error("transport send failed: {0}")]
    Transport(#[from] TransportError),
}

/// Executes effects using the configured adapters.
pub struct Executor<N, T, D, C: Clock> {
    notifier: N,
    transport: T,
    diagnostics: D,
    state: Arc<Mutex<MaterializedState>>,
    scheduler: Arc<Mutex<Scheduler>>,
    clock: C,
}

impl<N, T, D, C> Executor<N, T, D, C>
where
    N: NotifyAdapter,
    T: Transport,
    D: DiagnosticCollector,
    C: Clock,
{
    pub fn new(
        notifier: N,
        transport: T,
        diagnostics: D,
        state: Arc<Mutex<MaterializedState>>,
        scheduler: Arc<Mutex<Scheduler>>,
        clock: C,
    ) -> Self {
        Self {
            notifier,
            transport,
            diagnostics,
            state,
            scheduler,
            clock,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn state(&self) -> Arc<Mutex<MaterializedState>> {
        Arc::clone(&self.state)
    }

    pub fn scheduler(&self) -> Arc<Mutex<Scheduler>> {
        Arc::clone(&self.scheduler)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute a single effect with tracing.
    ///
    /// Returns an optional event that should be fed back into the event loop.
    pub async fn execute(&self, effect: Effect) -> Result<Option<Event>, ExecuteError> {
        let op_name = effect.name();
        let span = tracing::info_span!("effect", effect = op_name);
        let _guard = span.enter();

        tracing::info!(fields = ?effect.fields(), "executing");

        let start = std::time::Instant::now();
        let result = self.execute_inner(effect).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(event) => tracing::info!(
                elapsed_ms = elapsed.as_millis() as u64,
                has_event = event.is_some(),
                "completed"
            ),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "failed"
            ),
        }

        result
    }

    async fn execute_inner(&self, effect: Effect) -> Result<Option<Event>, ExecuteError> {
        match effect {
            Effect::Emit { event } => {
                {
                    let mut state = self.state.lock();
                    state.apply_event(&event);
                }
                Ok(Some(event))
            }

            Effect::ExecuteStep {
                task_id,
                step_name,
                kind,
                action,
                parameters,
                timeout_secs,
                is_rollback,
            } => {
                self.execute_step(task_id, step_name, kind, action, parameters, timeout_secs, is_rollback)
                    .await
            }

            Effect::SendTransportMessage { frame } => {
                self.transport.send(frame).await?;
                Ok(None)
            }

            Effect::RunDiagnostic { category, budget_ms } => {
                let facts = self
                    .diagnostics
                    .collect(&category, Duration::from_millis(budget_ms))
                    .await;
                tracing::debug!(category, facts = ?facts, "diagnostic collector finished");
                Ok(None)
            }

            Effect::SetTimer { id, duration } => {
                let now_ms = self.clock.now_ms();
                self.scheduler.lock().set_timer(id, duration, now_ms);
                Ok(None)
            }

            Effect::CancelTimer { id } => {
                self.scheduler.lock().cancel_timer(&id);
                Ok(None)
            }

            Effect::Notify { title, message } => {
                if let Err(e) = self.notifier.notify(&title, &message).await {
                    tracing::warn!(%title, error = %e, "notification send failed");
                }
                Ok(None)
            }

            Effect::PersistState { file } => {
                tracing::debug!(file, "state persisted");
                Ok(None)
            }
        }
    }

    /// Run one playbook step.
    ///
    /// User-prompt steps are never handed here directly: the playbook queue
    /// (C10) sends a `user-prompt` transport message and waits for the
    /// correlated `user-prompt-response`, resuming the step sequence itself
    /// once the operator answers. Every other step kind shells out through
    /// a single narrow capability (§9: validated, timed, escape-encoded).
    #[allow(clippy::too_many_arguments)]
    async fn execute_step(
        &self,
        task_id: PlaybookTaskId,
        step_name: String,
        kind: StepKind,
        action: String,
        parameters: std::collections::HashMap<String, String>,
        timeout_secs: u64,
        is_rollback: bool,
    ) -> Result<Option<Event>, ExecuteError> {
        if kind == StepKind::UserPrompt {
            return Ok(Some(Event::PlaybookStepFailed {
                task_id,
                step_name,
                error: "user-prompt steps must be resolved by the playbook queue, not executed directly".into(),
            }));
        }

        if kind == StepKind::Sleep {
            let secs: u64 = action.trim().parse().unwrap_or(0);
            tokio::time::sleep(Duration::from_secs(secs)).await;
            return Ok(Some(Event::PlaybookStepCompleted {
                task_id,
                step_name,
                was_rollback: is_rollback,
            }));
        }

        let mut cmd = tokio::process::Command::new("bash");
        cmd.arg("-c").arg(format!("set -euo pipefail\n{action}"));
        for (key, value) in &parameters {
            cmd.env(format!("WARDEN_PARAM_{}", key.to_uppercase()), value);
        }

        let timeout = Duration::from_secs(timeout_secs.max(1));
        let description = format!("playbook step {step_name}");

        let event = match run_with_timeout(cmd, timeout, &description).await {
            Ok(output) if output.status.success() => Event::PlaybookStepCompleted {
                task_id,
                step_name,
                was_rollback: is_rollback,
            },
            Ok(output) => Event::PlaybookStepFailed {
                task_id,
                step_name,
                error: String::from_utf8_lossy(&output.stderr).to_string(),
            },
            Err(err) => Event::PlaybookStepFailed {
                task_id,
                step_name,
                error: err,
            },
        };

        Ok(Some(event))
    }

    /// Execute multiple effects in order, collecting the events produced.
    pub async fn execute_all(&self, effects: Vec<Effect>) -> Result<Vec<Event>, ExecuteError> {
        let mut result_events = Vec::new();
        for effect in effects {
            if let Some(event) = self.execute(effect).await? {
                result_events.push(event);
            }
        }
        Ok(result_events)
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;

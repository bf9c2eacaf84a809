// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! warden-daemon (wardend)
//!
//! Background process that owns the pipeline domain (§5) and dispatches
//! remediation work.
//!
//! Architecture:
//! - Listener task: socket I/O, forwards operator commands over a channel
//! - Transport task: owns the websocket connection, forwards inbound frames
//! - Main loop: the domain's single writer; drains WAL, transport, timers,
//!   and operator commands, and executes the effects each one produces

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod env;
mod event_bus;
mod lifecycle;
mod listener;
mod protocol;
#[path = "protocol_wire.rs"]
mod protocol_wire;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use warden_core::{
    ActionTicket, Clock, Event, IdGen, MaintenanceWindow, MaintenanceWindowId, Severity, Signal,
    UuidIdGen,
};
use warden_storage::{Checkpointer, MaterializedState, Wal};
use warden_transport::InboundFrame;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Notify;
use tracing::{error, info};

use crate::config::Config as AppConfig;
use crate::event_bus::EventBus;
use crate::lifecycle::{DaemonState, LifecycleError, Paths, StartupResult};
use crate::listener::{DaemonCommand, ListenCtx, Listener};
use crate::protocol::{PendingActionSummary, Request, Response, StatusSummary, TicketSummary};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("wardend {}", concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH")));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("wardend {}", concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH")));
                println!("endpoint-remediation agent daemon");
                println!();
                println!("USAGE:");
                println!("    wardend");
                println!();
                println!("The daemon is typically started as a service and should not be");
                println!("invoked directly. Operators talk to it through the `warden` CLI,");
                println!("which connects to its Unix socket.");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: wardend [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let paths = Paths::load()?;
    rotate_log_if_needed(&paths.log_path);
    write_startup_marker(&paths)?;
    let log_guard = setup_logging(&paths)?;

    info!("starting warden-daemon");

    let app_config = AppConfig::load(&paths.config_path)?;

    let StartupResult { mut daemon, listener: unix_listener, mut event_reader, mut transport_inbound } =
        match lifecycle::startup(&app_config, &paths).await {
            Ok(r) => r,
            Err(LifecycleError::LockFailed(_)) => {
                let pid = std::fs::read_to_string(&paths.lock_path).unwrap_or_default().trim().to_string();
                let version = std::fs::read_to_string(&paths.version_path).unwrap_or_default().trim().to_string();

                eprintln!("wardend is already running");
                if !pid.is_empty() {
                    eprintln!("  pid: {pid}");
                }
                if !version.is_empty() {
                    let current_version = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"));
                    if version == current_version {
                        eprintln!("  version: {version}");
                    } else {
                        eprintln!("  version: {version} (outdated — current: {current_version})");
                    }
                }
                std::process::exit(1);
            }
            Err(e) => {
                write_startup_error(&paths, &e);
                error!("failed to start daemon: {}", e);
                drop(log_guard);
                return Err(e.into());
            }
        };

    // Shutdown signal: non-durable, so a command-triggered shutdown is
    // never replayed on the next startup.
    let shutdown_notify = Arc::new(Notify::new());

    let (command_tx, mut command_rx) = tokio::sync::mpsc::channel::<DaemonCommand>(32);
    let ctx = Arc::new(ListenCtx {
        state: Arc::clone(&daemon.state),
        start_time: daemon.start_time,
        shutdown: Arc::clone(&shutdown_notify),
        commands: command_tx,
    });
    let listener = Listener::new(unix_listener, ctx);
    tokio::spawn(listener.run());

    spawn_checkpoint(Arc::clone(&daemon.state), event_reader.wal(), daemon.paths.snapshot_path.clone());
    spawn_flush_task(daemon.event_bus.clone());

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!("daemon ready, listening on {}", daemon.paths.socket_path.display());
    println!("READY");

    let mut timer_check = tokio::time::interval(timer_check_interval());
    let mut sweep_interval = tokio::time::interval(SWEEP_INTERVAL);
    let id_gen = UuidIdGen;

    loop {
        tokio::select! {
            result = event_reader.recv() => {
                match result {
                    Ok(Some(entry)) => {
                        let seq = entry.seq;
                        match entry.event {
                            Event::Shutdown => event_reader.mark_processed(seq),
                            event => {
                                daemon.apply_event(&event);
                                event_reader.mark_processed(seq);
                            }
                        }
                    }
                    Ok(None) => {
                        info!("event bus closed, shutting down...");
                        break;
                    }
                    Err(e) => error!("error reading from WAL: {}", e),
                }
            }

            frame = transport_inbound.recv() => {
                match frame {
                    Some(frame) => handle_inbound_frame(&mut daemon, &frame).await,
                    None => {
                        info!("transport task ended, marking transport disconnected");
                        daemon.domain.set_transport_connected(false);
                    }
                }
            }

            Some(cmd) = command_rx.recv() => {
                let response = handle_command(&mut daemon, &id_gen, cmd.request).await;
                let _ = cmd.reply.send(response);
            }

            _ = shutdown_notify.notified() => {
                info!("shutdown requested via command");
                break;
            }

            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down...");
                break;
            }

            _ = sigint.recv() => {
                info!("received SIGINT, shutting down...");
                break;
            }

            _ = timer_check.tick() => {
                let now = daemon.executor.clock().now_ms();
                let fired = daemon.executor.scheduler().lock().fired_timers(now);
                for event in fired {
                    if let Event::TimerFired { id } = &event {
                        if id.is_batch_window() {
                            let effects = daemon.domain.flush_batch(now);
                            apply_and_persist(&mut daemon, effects).await;
                        }
                    }
                }
            }

            _ = sweep_interval.tick() => {
                let now = daemon.executor.clock().now_ms();
                let state_snapshot = daemon.state.lock().clone();
                let effects = daemon.domain.sweep(&state_snapshot, now);
                apply_and_persist(&mut daemon, effects).await;
            }
        }
    }

    daemon.shutdown()?;
    info!("daemon stopped");
    Ok(())
}

/// Periodic maintenance sweep interval (flap-quiet clearance, expired
/// maintenance windows, attempt-log pruning — §9's "no separate timer per
/// concern", one tick covers all three).
const SWEEP_INTERVAL: Duration = Duration::from_secs(30);

async fn handle_inbound_frame(daemon: &mut DaemonState, frame: &InboundFrame) {
    let now = daemon.executor.clock().now_ms();
    daemon.domain.set_transport_connected(true);
    let state_snapshot = daemon.state.lock().clone();
    match daemon.domain.handle_inbound(&state_snapshot, frame, now) {
        Ok(effects) => apply_and_persist(daemon, effects).await,
        Err(e) => error!(error = %e, kind = %frame.kind, "failed to handle inbound transport frame"),
    }
}

/// Run every effect through the executor, persisting each resulting event
/// to the WAL and applying it to state for immediate visibility.
async fn apply_and_persist(daemon: &mut DaemonState, effects: Vec<warden_core::Effect>) {
    match daemon.executor.execute_all(effects).await {
        Ok(events) => {
            for event in events {
                daemon.persist(event);
            }
        }
        Err(e) => error!(error = %e, "failed to execute effects"),
    }
}

async fn handle_command(daemon: &mut DaemonState, id_gen: &UuidIdGen, request: Request) -> Response {
    let now = daemon.executor.clock().now_ms();
    match request {
        Request::Status => {
            let state = daemon.state.lock();
            Response::Status(StatusSummary {
                device_id: daemon.domain.device().device_id.clone(),
                tenant_id: daemon.domain.device().tenant_id.clone(),
                uptime_secs: daemon.start_time.elapsed().as_secs(),
                transport_connected: daemon.domain.transport_connected(),
                queue_depth: daemon.domain.queue().len(),
                open_tickets: state.tickets.values().filter(|t| !t.is_terminal()).count(),
                pending_actions: state.pending_actions.len(),
                version: concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH")).to_string(),
            })
        }

        Request::PendingList => {
            let state = daemon.state.lock();
            let items = state
                .pending_actions
                .values()
                .map(|p| PendingActionSummary {
                    signature_id: p.signature_id.as_str().to_string(),
                    ticket_id: p.ticket_id.as_str().to_string(),
                    severity: p.signature.severity.to_string(),
                    confidence: p.signature.confidence,
                    matched_runbook: p.matched_runbook.as_ref().map(|r| r.as_str().to_string()),
                    created_at_ms: p.created_at_ms,
                })
                .collect();
            Response::PendingList { items }
        }

        Request::PendingApprove { signature_id } => {
            let frame = local_frame("execute_pending_action", serde_json::json!({ "signature_id": signature_id }));
            dispatch_pending_action(daemon, &frame, now).await
        }

        Request::PendingCancel { signature_id } => {
            let frame = local_frame("cancel_pending_action", serde_json::json!({ "signature_id": signature_id }));
            dispatch_pending_action(daemon, &frame, now).await
        }

        Request::ExcludeAdd { category, name } => {
            // Bypasses `handle_inbound`/`verify_inbound`: an operator command
            // has no signature to check, and `add_to_ignore_list` is one of
            // the kinds that normally requires one.
            let event = Event::ExclusionAdded { category, name };
            daemon.apply_event(&event);
            daemon.persist(event);
            Response::Ok
        }

        Request::ExcludeRemove { category, name } => {
            daemon.apply_event(&Event::ExclusionRemoved { category, name: name.clone() });
            daemon.persist(Event::ExclusionRemoved { category, name });
            Response::Ok
        }

        Request::ExcludeList => {
            let state = daemon.state.lock();
            Response::ExclusionLists(crate::protocol::ExclusionListsSummary {
                services: state.exclusions.services.iter().cloned().collect(),
                processes: state.exclusions.processes.iter().cloned().collect(),
                signatures: state.exclusions.signatures.iter().cloned().collect(),
            })
        }

        Request::MaintenanceCreate { scope, start_ms, end_ms, suppress_escalation, suppress_remediation } => {
            let window = MaintenanceWindow {
                id: MaintenanceWindowId::new(id_gen.next()),
                scope,
                start_ms,
                end_ms,
                suppress_escalation,
                suppress_remediation,
            };
            let event = Event::MaintenanceWindowCreated { window };
            daemon.apply_event(&event);
            daemon.persist(event);
            Response::Ok
        }

        Request::MaintenanceList => {
            let state = daemon.state.lock();
            let windows = state
                .maintenance_windows
                .values()
                .map(|w| crate::protocol::MaintenanceWindowSummary {
                    id: w.id.as_str().to_string(),
                    scope: w.scope.clone(),
                    start_ms: w.start_ms,
                    end_ms: w.end_ms,
                    suppress_escalation: w.suppress_escalation,
                    suppress_remediation: w.suppress_remediation,
                })
                .collect();
            Response::MaintenanceList { windows }
        }

        Request::MaintenanceCancel { window_id } => {
            let event = Event::MaintenanceWindowExpired { window_id };
            daemon.apply_event(&event);
            daemon.persist(event);
            Response::Ok
        }

        Request::DampeningReset { signal_key, device_id } => {
            let event = Event::MemoryDampeningReset { signal_key, device_id };
            daemon.apply_event(&event);
            daemon.persist(event);
            Response::Ok
        }

        Request::TicketList => {
            let state = daemon.state.lock();
            let items = state.tickets.values().map(ticket_summary).collect();
            Response::TicketList { items }
        }

        Request::TicketShow { ticket_id } => {
            let state = daemon.state.lock();
            match state.get_ticket(&ticket_id) {
                Some(ticket) => Response::TicketDetail(ticket_summary(ticket)),
                None => Response::Error { message: format!("no ticket matching '{ticket_id}'") },
            }
        }

        Request::TestEscalate { signal_key, target } => {
            let (category, metric) = signal_key.split_once('-').unwrap_or((signal_key.as_str(), "test"));
            let signal = Signal::new(category, metric, target, Severity::Critical, 1.0, now).with_message("operator-triggered test escalation");
            let state_snapshot = daemon.state.lock().clone();
            let hour_of_day = ((now / 3_600_000) % 24) as u8;
            let effects = daemon.domain.handle_signal(&state_snapshot, signal, now, hour_of_day);
            apply_and_persist(daemon, effects).await;
            Response::Ok
        }

        Request::Shutdown { .. } => unreachable!("Shutdown is intercepted by the listener before reaching the command channel"),
    }
}

fn local_frame(kind: &str, data: serde_json::Value) -> InboundFrame {
    InboundFrame { kind: kind.to_string(), raw: data }
}

async fn dispatch_pending_action(daemon: &mut DaemonState, frame: &InboundFrame, now: u64) -> Response {
    let execute = frame.kind == "execute_pending_action";
    let state_snapshot = daemon.state.lock().clone();
    match daemon.domain.handle_pending_action_frame(&state_snapshot, frame, execute, now) {
        Ok(effects) => {
            apply_and_persist(daemon, effects).await;
            Response::Ok
        }
        Err(e) => Response::Error { message: e.to_string() },
    }
}

fn ticket_summary(t: &ActionTicket) -> TicketSummary {
    TicketSummary {
        ticket_id: t.ticket_id.as_str().to_string(),
        signature_id: t.signature_id.as_str().to_string(),
        playbook_id: t.playbook_id.as_ref().map(|p| p.as_str().to_string()),
        status: t.status.to_string(),
        created_at_ms: t.created_at_ms,
        updated_at_ms: t.updated_at_ms,
        result_message: t.result_message.clone(),
        escalated: t.escalated,
    }
}

/// Timer check interval, configurable via `WARDEN_TIMER_CHECK_MS` (default: 1000ms).
fn timer_check_interval() -> Duration {
    crate::env::timer_check_ms().unwrap_or(Duration::from_secs(1))
}

const FLUSH_INTERVAL: Duration = Duration::from_millis(10);

fn spawn_flush_task(event_bus: EventBus) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(FLUSH_INTERVAL);
        loop {
            interval.tick().await;
            if event_bus.needs_flush() {
                if let Err(e) = event_bus.flush() {
                    tracing::error!("failed to flush event bus: {}", e);
                }
            }
        }
    });
}

const CHECKPOINT_INTERVAL: Duration = Duration::from_secs(60);

/// Spawn a task that periodically saves snapshots and truncates the WAL.
///
/// WAL truncation only happens once the snapshot is fully durable: written
/// to a temp file, fsync'd, atomically renamed, directory fsync'd, then
/// truncate. This ordering survives a crash mid-checkpoint without losing
/// events.
fn spawn_checkpoint(state: Arc<Mutex<MaterializedState>>, event_wal: Arc<Mutex<Wal>>, snapshot_path: PathBuf) {
    let checkpointer = Checkpointer::new(snapshot_path);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CHECKPOINT_INTERVAL);
        loop {
            interval.tick().await;

            let (state_ref, processed_seq) = {
                let state_guard = state.lock();
                let wal_guard = event_wal.lock();
                (state_guard.clone(), wal_guard.processed_seq())
            };
            if processed_seq == 0 {
                continue;
            }

            let handle = checkpointer.start(processed_seq, &state_ref);
            let result = tokio::task::spawn_blocking(move || handle.wait()).await;

            match result {
                Ok(Ok(checkpoint_result)) => {
                    tracing::debug!(seq = checkpoint_result.seq, size_bytes = checkpoint_result.size_bytes, "checkpoint complete");
                    let mut wal = event_wal.lock();
                    if let Err(e) = wal.truncate_before(processed_seq) {
                        tracing::warn!(error = %e, "failed to truncate WAL after checkpoint");
                    }
                }
                Ok(Err(e)) => tracing::warn!(error = %e, "checkpoint failed, WAL not truncated"),
                Err(e) => tracing::warn!(error = %e, "checkpoint task panicked"),
            }
        }
    });
}

const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;
const MAX_ROTATED_LOGS: u32 = 3;

/// Rotate the daemon log file if it exceeds [`MAX_LOG_SIZE`]. Best-effort:
/// rotation failures are silently ignored so the daemon still starts.
fn rotate_log_if_needed(log_path: &std::path::Path) {
    let size = match std::fs::metadata(log_path) {
        Ok(m) => m.len(),
        Err(_) => return,
    };
    if size < MAX_LOG_SIZE {
        return;
    }

    let log_str = log_path.display().to_string();
    for i in (1..MAX_ROTATED_LOGS).rev() {
        let from = format!("{log_str}.{i}");
        let to = format!("{log_str}.{}", i + 1);
        let _ = std::fs::rename(&from, &to);
    }
    let _ = std::fs::rename(log_path, format!("{log_str}.1"));
}

/// Full format: "--- wardend: starting (pid: 12345) ---"
const STARTUP_MARKER_PREFIX: &str = "--- wardend: starting (pid: ";

fn write_startup_marker(paths: &Paths) -> Result<(), LifecycleError> {
    use std::io::Write;
    if let Some(parent) = paths.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new().create(true).append(true).open(&paths.log_path)?;
    writeln!(file, "{}{}) ---\n", STARTUP_MARKER_PREFIX, std::process::id())?;
    Ok(())
}

fn write_startup_error(paths: &Paths, error: &LifecycleError) {
    use std::io::Write;
    let Ok(mut file) = std::fs::OpenOptions::new().create(true).append(true).open(&paths.log_path) else {
        return;
    };
    let _ = writeln!(file, "ERROR failed to start daemon: {}", error);
}

fn setup_logging(paths: &Paths) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = paths.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = tracing_appender::rolling::never(
        paths.log_path.parent().ok_or(LifecycleError::NoStateDir)?,
        paths.log_path.file_name().ok_or(LifecycleError::NoStateDir)?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(non_blocking)).init();
    Ok(guard)
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

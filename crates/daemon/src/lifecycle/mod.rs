// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, shutdown, recovery.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use fs2::FileExt;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::net::UnixListener;
use tracing::{info, warn};

use warden_adapters::credential::{CredentialSource, CredentialStore, OsCredentialStore};
use warden_adapters::DesktopNotifyAdapter;
use warden_core::SystemClock;
use warden_engine::{DeviceContext, Executor, NoOpDiagnosticCollector, PipelineDomain, Scheduler};
use warden_storage::{load_snapshot, Checkpointer, MaterializedState, Wal};
use warden_transport::client::{DeviceIdentity, WsTransport};
use warden_transport::SigningKey;

use crate::config::{Config as AppConfig, CredentialRef};
use crate::event_bus::{EventBus, EventReader};

/// Concrete executor type for this daemon: desktop notifications, the real
/// websocket transport, no diagnostic collection yet (C4's collectors are
/// invoked straight from the signal-ingestion path, not through here), and
/// the wall clock.
pub type DaemonExecutor = Executor<DesktopNotifyAdapter, WsTransport, NoOpDiagnosticCollector, SystemClock>;
pub type DaemonDomain = PipelineDomain;

/// On-disk file layout under the state directory. Distinct from
/// [`crate::config::Config`], which is the user-authored TOML.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root state directory (e.g. ~/.local/state/warden)
    pub state_dir: PathBuf,
    pub socket_path: PathBuf,
    pub lock_path: PathBuf,
    pub version_path: PathBuf,
    pub log_path: PathBuf,
    pub wal_path: PathBuf,
    pub snapshot_path: PathBuf,
    pub config_path: PathBuf,
    pub runbooks_path: PathBuf,
    pub dependency_dag_path: PathBuf,
}

impl Paths {
    /// Resolve fixed paths under `~/.local/state/warden/` (or
    /// `$XDG_STATE_HOME/warden/`). One daemon serves one device.
    pub fn load() -> Result<Self, LifecycleError> {
        let state_dir = state_dir()?;

        Ok(Self {
            socket_path: state_dir.join("daemon.sock"),
            lock_path: state_dir.join("daemon.pid"),
            version_path: state_dir.join("daemon.version"),
            log_path: state_dir.join("daemon.log"),
            wal_path: state_dir.join("wal").join("events.wal"),
            snapshot_path: state_dir.join("snapshot.json"),
            config_path: state_dir.join("config.toml"),
            runbooks_path: state_dir.join("runbooks"),
            dependency_dag_path: state_dir.join("dependency_dag.json"),
            state_dir,
        })
    }
}

/// Daemon state during operation.
///
/// The listener is returned separately from startup to be spawned as a
/// task.
pub struct DaemonState {
    pub paths: Paths,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// Materialized state (shared with executor and listener)
    pub state: Arc<Mutex<MaterializedState>>,
    /// The pipeline domain — single writer, owned by the main loop.
    pub domain: DaemonDomain,
    pub executor: Arc<DaemonExecutor>,
    /// Event bus for crash recovery
    pub event_bus: EventBus,
    pub start_time: Instant,
}

/// Result of daemon startup.
pub struct StartupResult {
    pub daemon: DaemonState,
    pub listener: UnixListener,
    pub event_reader: EventReader,
    pub transport_inbound: tokio::sync::mpsc::UnboundedReceiver<warden_transport::InboundFrame>,
}

impl DaemonState {
    /// Apply an event (already run through the executor, or replayed from
    /// the WAL) to materialized state so queries see it. Idempotent:
    /// `Executor::execute` already applies `Effect::Emit` events for
    /// immediate visibility, so re-applying one read back from the WAL is
    /// harmless.
    pub fn apply_event(&mut self, event: &warden_core::Event) {
        self.state.lock().apply_event(event);
    }

    /// Persist an event to the WAL so a crash before the next checkpoint
    /// doesn't lose it.
    pub fn persist(&mut self, event: warden_core::Event) {
        if let Err(e) = self.event_bus.send(event) {
            warn!("failed to persist event to WAL: {}", e);
        }
    }

    /// Shutdown the daemon gracefully: flush the WAL, take a final
    /// synchronous checkpoint, and remove the files that mark the daemon
    /// as running.
    pub fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("shutting down daemon");

        if let Err(e) = self.event_bus.flush() {
            warn!("failed to flush WAL on shutdown: {}", e);
        }

        let processed_seq = self.event_bus.processed_seq();
        if processed_seq > 0 {
            let state_clone = self.state.lock().clone();
            let checkpointer = Checkpointer::new(self.paths.snapshot_path.clone());
            match checkpointer.checkpoint_sync(processed_seq, &state_clone) {
                Ok(result) => info!(seq = result.seq, size_bytes = result.size_bytes, "saved final shutdown snapshot"),
                Err(e) => warn!("failed to save shutdown snapshot: {}", e),
            }
        }

        if self.paths.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.paths.socket_path) {
                warn!("failed to remove socket file: {}", e);
            }
        }
        if self.paths.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.paths.lock_path) {
                warn!("failed to remove PID file: {}", e);
            }
        }
        if self.paths.version_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.paths.version_path) {
                warn!("failed to remove version file: {}", e);
            }
        }

        // Lock file is released automatically when `self.lock_file` drops.
        info!("daemon shutdown complete");
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("could not determine state directory")]
    NoStateDir,

    #[error("failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("WAL error: {0}")]
    Wal(#[from] warden_storage::WalError),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] warden_storage::SnapshotError),

    #[error("failed to resolve bearer credential: {0}")]
    Credential(#[from] warden_adapters::CredentialError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub async fn startup(app_config: &AppConfig, paths: &Paths) -> Result<StartupResult, LifecycleError> {
    match startup_inner(app_config, paths).await {
        Ok(result) => Ok(result),
        Err(e) => {
            // Don't clean up if we failed to acquire the lock — those
            // files belong to the already-running daemon.
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(paths);
            }
            Err(e)
        }
    }
}

async fn startup_inner(app_config: &AppConfig, paths: &Paths) -> Result<StartupResult, LifecycleError> {
    if let Some(parent) = paths.socket_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Acquire the lock before truncating it, so a second `warden-daemon`
    // invocation can't wipe the running daemon's PID out from under it.
    let lock_file = std::fs::OpenOptions::new().write(true).create(true).truncate(false).open(&paths.lock_path)?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    use std::io::Write;
    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file;

    if let Some(parent) = paths.wal_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::create_dir_all(&paths.runbooks_path)?;

    std::fs::write(&paths.version_path, concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH")))?;

    // Load state from snapshot (if any) and replay the WAL on top of it.
    // The Playbook Queue (C10) is deliberately not part of either: it is
    // rebuilt below from the recovered ticket/pending-action state rather
    // than replayed, so an in-flight local execution is not resumed across
    // a restart — only its ticket record survives, open, for an operator
    // or a fresh signal to pick back up.
    let (mut state, processed_seq) = match load_snapshot(&paths.snapshot_path)? {
        Some(snapshot) => {
            info!(seq = snapshot.seq, tickets = snapshot.state.tickets.len(), "loaded snapshot");
            (snapshot.state, snapshot.seq)
        }
        None => {
            info!("no snapshot found, starting with empty state");
            (MaterializedState::default(), 0)
        }
    };

    let event_wal = Wal::open(&paths.wal_path, processed_seq)?;
    let events_to_replay = event_wal.entries_after(processed_seq)?;
    let (event_bus, event_reader) = EventBus::new(event_wal);
    let replay_count = events_to_replay.len();
    for entry in events_to_replay {
        state.apply_event(&entry.event);
    }
    if replay_count > 0 {
        info!(replay_count, processed_seq, "replayed events from WAL");
    }
    info!(
        resources = state.resources.len(),
        tickets = state.tickets.len(),
        pending_actions = state.pending_actions.len(),
        "recovered state"
    );

    // Resolve the bearer credential. Never logged, never written back to
    // config — only held in memory for the lifetime of the transport.
    let credential_source = match &app_config.credential {
        CredentialRef::SecureStorePath { path } => CredentialSource::SecureStorePath(path.clone()),
        CredentialRef::EnvVar { name } => CredentialSource::EnvVar(name.clone()),
    };
    let credential = OsCredentialStore::new().resolve(&credential_source).await?;

    // The HMAC signing key is derived from the bearer credential rather
    // than carrying a second secret reference: the credential already
    // proves device identity to the control plane, and `hmac_enforced`
    // only controls whether the *server* insists on the signature, not
    // whether one is computed.
    let signing_key_bytes = {
        use sha2::{Digest, Sha256};
        Sha256::digest(credential.as_bytes()).to_vec()
    };
    let signing_key = SigningKey::new(signing_key_bytes);

    let device = DeviceContext {
        tenant_id: app_config.tenant_id.clone(),
        device_id: app_config.device_id.clone(),
        signature_context: warden_core::signature::SignatureContext {
            os_build: std::env::var("WARDEN_OS_BUILD").unwrap_or_default(),
            os_version: std::env::var("WARDEN_OS_VERSION").unwrap_or_else(|_| std::env::consts::OS.to_string()),
            device_role: app_config.device_role.clone(),
        },
    };
    let mut domain = PipelineDomain::new(device);
    domain.set_signing_key(Some(signing_key.clone()));
    domain.set_transport_connected(false);

    match warden_runbook::find::load_runbook_dir(&paths.runbooks_path) {
        Ok(runbooks) => {
            let count = runbooks.len();
            for (id, runbook) in runbooks {
                domain.register_runbook(id, Arc::new(runbook));
            }
            info!(count, "loaded runbooks");
        }
        Err(e) => warn!(error = %e, "failed to load runbook directory"),
    }

    if let Ok(content) = std::fs::read_to_string(&paths.dependency_dag_path) {
        match serde_json::from_str(&content) {
            Ok(dag) => domain.set_dependency_dag(dag),
            Err(e) => warn!(error = %e, "failed to parse dependency dag file"),
        }
    }

    // Remove a stale socket and bind last, only after every fallible step
    // above has succeeded.
    if paths.socket_path.exists() {
        std::fs::remove_file(&paths.socket_path)?;
    }
    let listener = UnixListener::bind(&paths.socket_path).map_err(|e| LifecycleError::BindFailed(paths.socket_path.clone(), e))?;

    let state = Arc::new(Mutex::new(state));
    let scheduler = Arc::new(Mutex::new(Scheduler::new()));

    let hostname = std::env::var("HOSTNAME").unwrap_or_else(|_| app_config.device_id.clone());
    let identity = DeviceIdentity {
        device_id: app_config.device_id.clone(),
        tenant_id: app_config.tenant_id.clone(),
        hostname,
        agent_version: env!("CARGO_PKG_VERSION").to_string(),
    };
    let (transport, transport_handle) = warden_transport::client::run(app_config.transport_url.clone(), identity, signing_key);
    let transport_inbound = transport_handle.inbound;
    // Dropping the rest of the handle doesn't abort the connection task —
    // only `TransportHandle::abort()` does — so the background task keeps
    // running detached for the process lifetime, which is what we want.

    let executor = Arc::new(Executor::new(
        DesktopNotifyAdapter::new(),
        transport,
        NoOpDiagnosticCollector,
        Arc::clone(&state),
        scheduler,
        SystemClock,
    ));

    info!("daemon started");

    Ok(StartupResult {
        daemon: DaemonState { paths: paths.clone(), lock_file, state, domain, executor, event_bus, start_time: Instant::now() },
        listener,
        event_reader,
        transport_inbound,
    })
}

fn cleanup_on_failure(paths: &Paths) {
    if paths.socket_path.exists() {
        let _ = std::fs::remove_file(&paths.socket_path);
    }
    if paths.version_path.exists() {
        let _ = std::fs::remove_file(&paths.version_path);
    }
    if paths.lock_path.exists() {
        let _ = std::fs::remove_file(&paths.lock_path);
    }
}

fn state_dir() -> Result<PathBuf, LifecycleError> {
    crate::env::state_dir()
}

#[cfg(test)]
#[path = "../lifecycle_tests/mod.rs"]
mod tests;

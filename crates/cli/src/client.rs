// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon client for CLI commands

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::client_lifecycle::log_connection_error;
use crate::daemon_process::{
    cleanup_stale_socket, daemon_dir, daemon_socket, probe_socket, read_startup_error,
    start_daemon_background, stop_daemon_sync, wrap_with_startup_error,
};

use thiserror::Error;
use tokio::net::UnixStream;
use warden_core::maintenance::MaintenanceScope;
use warden_core::IgnoreCategory;
use warden_daemon::protocol::{self, ProtocolError};
use warden_daemon::{
    ExclusionListsSummary, MaintenanceWindowSummary, PendingActionSummary, Request, Response,
    StatusSummary, TicketSummary,
};

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Timeout for IPC requests (status, pending, shutdown, ...)
pub fn timeout_ipc() -> Duration {
    parse_duration_ms("WARDEN_TIMEOUT_IPC_MS").unwrap_or(Duration::from_secs(5))
}

/// Timeout for waiting for daemon to start
pub fn timeout_connect() -> Duration {
    parse_duration_ms("WARDEN_TIMEOUT_CONNECT_MS").unwrap_or(Duration::from_secs(5))
}

/// Timeout for waiting for process to exit
pub fn timeout_exit() -> Duration {
    parse_duration_ms("WARDEN_TIMEOUT_EXIT_MS").unwrap_or(Duration::from_secs(2))
}

/// Polling interval for connection retries
pub fn poll_interval() -> Duration {
    parse_duration_ms("WARDEN_CONNECT_POLL_MS").unwrap_or(Duration::from_millis(50))
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("daemon not running")]
    DaemonNotRunning,

    #[error("failed to start daemon: {0}")]
    DaemonStartFailed(String),

    #[error("connection timeout waiting for daemon to start")]
    DaemonStartTimeout,

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("unexpected response from daemon")]
    UnexpectedResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not determine state directory")]
    NoStateDir,
}

/// Daemon client
pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    /// For action commands - auto-start with version check, max 1 restart per process
    pub fn for_action() -> Result<Self, ClientError> {
        Self::connect_or_start_once()
    }

    /// For query commands - connect only, no restart
    pub fn for_query() -> Result<Self, ClientError> {
        Self::connect()
    }

    fn connect_or_start_once() -> Result<Self, ClientError> {
        static RESTARTED: AtomicBool = AtomicBool::new(false);

        if RESTARTED.load(Ordering::SeqCst) {
            return Self::connect();
        }

        let daemon_dir = daemon_dir()?;
        let version_path = daemon_dir.join("daemon.version");
        if let Ok(daemon_version) = std::fs::read_to_string(&version_path) {
            let cli_version = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"));
            if daemon_version.trim() != cli_version {
                RESTARTED.store(true, Ordering::SeqCst);
                eprintln!(
                    "warn: daemon version {} does not match cli version {}, restarting daemon",
                    daemon_version.trim(),
                    cli_version
                );
                stop_daemon_sync();
            }
        }

        match Self::connect() {
            Ok(client) => {
                if probe_socket(&client.socket_path) {
                    Ok(client)
                } else {
                    cleanup_stale_socket()?;
                    let child = start_daemon_background()?;
                    Self::connect_with_retry(timeout_connect(), child)
                }
            }
            Err(ClientError::DaemonNotRunning) => {
                let child = start_daemon_background()?;
                Self::connect_with_retry(timeout_connect(), child)
            }
            Err(e) => Err(wrap_with_startup_error(e)),
        }
    }

    /// Connect to existing daemon (no auto-start)
    pub fn connect() -> Result<Self, ClientError> {
        let socket_path = daemon_socket()?;

        if !socket_path.exists() {
            let err = ClientError::DaemonNotRunning;
            log_connection_error(&err);
            return Err(err);
        }

        Ok(Self { socket_path })
    }

    fn connect_with_retry(timeout: Duration, mut child: std::process::Child) -> Result<Self, ClientError> {
        let start = Instant::now();
        while start.elapsed() < timeout {
            match child.try_wait() {
                Ok(Some(status)) => {
                    let poll_start = Instant::now();
                    while poll_start.elapsed() < timeout_exit() {
                        if let Some(err) = read_startup_error() {
                            return Err(ClientError::DaemonStartFailed(err));
                        }
                        std::thread::sleep(poll_interval());
                    }
                    return Err(ClientError::DaemonStartFailed(format!("exited with {status}")));
                }
                Ok(None) => {}
                Err(_) => {}
            }

            match Self::connect() {
                Ok(client) => return Ok(client),
                Err(ClientError::DaemonNotRunning) => std::thread::sleep(poll_interval()),
                Err(e) => return Err(wrap_with_startup_error(e)),
            }
        }

        Err(wrap_with_startup_error(ClientError::DaemonStartTimeout))
    }

    async fn send_with_timeout(
        &self,
        request: &Request,
        read_timeout: Duration,
        write_timeout: Duration,
    ) -> Result<Response, ClientError> {
        let stream = UnixStream::connect(&self.socket_path).await?;
        let (mut reader, mut writer) = stream.into_split();

        let data = protocol::encode(request)?;
        tokio::time::timeout(write_timeout, protocol::write_message(&mut writer, &data))
            .await
            .map_err(|_| ProtocolError::Timeout)??;

        let response_bytes = tokio::time::timeout(read_timeout, protocol::read_message(&mut reader))
            .await
            .map_err(|_| ProtocolError::Timeout)??;

        let response: Response = protocol::decode(&response_bytes)?;
        Ok(response)
    }

    /// Send a request and receive a response
    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        match self.send_with_timeout(request, timeout_ipc(), timeout_ipc()).await {
            Ok(response) => Ok(response),
            Err(e) => {
                log_connection_error(&e);
                Err(e)
            }
        }
    }

    async fn send_simple(&self, request: &Request) -> Result<(), ClientError> {
        match self.send(request).await? {
            Response::Ok => Ok(()),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    fn reject<T>(resp: Response) -> Result<T, ClientError> {
        match resp {
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn status(&self) -> Result<StatusSummary, ClientError> {
        match self.send(&Request::Status).await? {
            Response::Status(summary) => Ok(summary),
            other => Self::reject(other),
        }
    }

    pub async fn shutdown(&self, kill: bool) -> Result<(), ClientError> {
        self.send_simple(&Request::Shutdown { kill }).await
    }

    pub async fn pending_list(&self) -> Result<Vec<PendingActionSummary>, ClientError> {
        match self.send(&Request::PendingList).await? {
            Response::PendingList { items } => Ok(items),
            other => Self::reject(other),
        }
    }

    pub async fn pending_approve(&self, signature_id: &str) -> Result<(), ClientError> {
        self.send_simple(&Request::PendingApprove { signature_id: signature_id.to_string() }).await
    }

    pub async fn pending_cancel(&self, signature_id: &str) -> Result<(), ClientError> {
        self.send_simple(&Request::PendingCancel { signature_id: signature_id.to_string() }).await
    }

    pub async fn exclude_add(&self, category: IgnoreCategory, name: &str) -> Result<(), ClientError> {
        self.send_simple(&Request::ExcludeAdd { category, name: name.to_string() }).await
    }

    pub async fn exclude_remove(&self, category: IgnoreCategory, name: &str) -> Result<(), ClientError> {
        self.send_simple(&Request::ExcludeRemove { category, name: name.to_string() }).await
    }

    pub async fn exclude_list(&self) -> Result<ExclusionListsSummary, ClientError> {
        match self.send(&Request::ExcludeList).await? {
            Response::ExclusionLists(lists) => Ok(lists),
            other => Self::reject(other),
        }
    }

    pub async fn maintenance_create(
        &self,
        scope: MaintenanceScope,
        start_ms: u64,
        end_ms: u64,
        suppress_escalation: bool,
        suppress_remediation: bool,
    ) -> Result<(), ClientError> {
        self.send_simple(&Request::MaintenanceCreate { scope, start_ms, end_ms, suppress_escalation, suppress_remediation })
            .await
    }

    pub async fn maintenance_list(&self) -> Result<Vec<MaintenanceWindowSummary>, ClientError> {
        match self.send(&Request::MaintenanceList).await? {
            Response::MaintenanceList { windows } => Ok(windows),
            other => Self::reject(other),
        }
    }

    pub async fn maintenance_cancel(&self, window_id: &str) -> Result<(), ClientError> {
        self.send_simple(&Request::MaintenanceCancel { window_id: window_id.to_string() }).await
    }

    pub async fn dampening_reset(&self, signal_key: &str, device_id: &str) -> Result<(), ClientError> {
        self.send_simple(&Request::DampeningReset { signal_key: signal_key.to_string(), device_id: device_id.to_string() }).await
    }

    pub async fn ticket_list(&self) -> Result<Vec<TicketSummary>, ClientError> {
        match self.send(&Request::TicketList).await? {
            Response::TicketList { items } => Ok(items),
            other => Self::reject(other),
        }
    }

    pub async fn ticket_show(&self, ticket_id: &str) -> Result<TicketSummary, ClientError> {
        match self.send(&Request::TicketShow { ticket_id: ticket_id.to_string() }).await? {
            Response::TicketDetail(ticket) => Ok(ticket),
            other => Self::reject(other),
        }
    }

    pub async fn test_escalate(&self, signal_key: &str, target: &str) -> Result<(), ClientError> {
        self.send_simple(&Request::TestEscalate { signal_key: signal_key.to_string(), target: target.to_string() }).await
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

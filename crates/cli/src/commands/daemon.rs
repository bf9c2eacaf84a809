// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `warden daemon` - daemon process management commands.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};

use crate::client::{ClientError, DaemonClient};
use crate::client_lifecycle::daemon_stop;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct DaemonArgs {
    #[command(subcommand)]
    pub command: Option<DaemonCommand>,
}

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Start the daemon (foreground or background)
    Start {
        /// Run in the foreground (useful for debugging)
        #[arg(long)]
        foreground: bool,
    },
    /// Stop the daemon
    Stop {
        /// Kill in-flight remediation actions instead of waiting for them
        #[arg(long)]
        kill: bool,
    },
    /// Stop and restart the daemon
    Restart {
        /// Kill in-flight remediation actions instead of waiting for them
        #[arg(long)]
        kill: bool,
    },
    /// Show daemon status and queue depth
    Status,
}

pub async fn daemon(args: DaemonArgs, format: OutputFormat) -> Result<()> {
    match args.command {
        Some(DaemonCommand::Start { foreground }) => start(foreground).await,
        Some(DaemonCommand::Stop { kill }) => stop(kill).await,
        Some(DaemonCommand::Restart { kill }) => restart(kill).await,
        Some(DaemonCommand::Status) | None => status(format).await,
    }
}

async fn start(foreground: bool) -> Result<()> {
    if foreground {
        let wardend_path = find_wardend_binary()?;
        let status = Command::new(&wardend_path).status()?;
        if !status.success() {
            return Err(anyhow!("daemon exited with status: {}", status));
        }
        return Ok(());
    }

    if let Ok(client) = DaemonClient::connect() {
        if let Ok(summary) = client.status().await {
            println!(
                "Daemon already running (uptime: {})",
                format_uptime(summary.uptime_secs)
            );
            return Ok(());
        }
    }

    match DaemonClient::for_action() {
        Ok(_client) => {
            println!("Daemon started");
            Ok(())
        }
        Err(e) => Err(anyhow!("{}", e)),
    }
}

async fn stop(kill: bool) -> Result<()> {
    match daemon_stop(kill).await {
        Ok(true) => {
            println!("Daemon stopped");
            Ok(())
        }
        Ok(false) => {
            println!("Daemon not running");
            Ok(())
        }
        Err(e) => Err(anyhow!("failed to stop daemon: {}", e)),
    }
}

async fn restart(kill: bool) -> Result<()> {
    let was_running = daemon_stop(kill)
        .await
        .map_err(|e| anyhow!("failed to stop daemon: {}", e))?;

    if was_running {
        // grace period for the OS to release the Unix socket
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
    }

    match DaemonClient::for_action() {
        Ok(_client) => {
            println!("Daemon restarted");
            Ok(())
        }
        Err(e) => Err(anyhow!("{}", e)),
    }
}

pub async fn status(format: OutputFormat) -> Result<()> {
    let not_running = || match format {
        OutputFormat::Text => {
            println!("Daemon not running");
            Ok(())
        }
        OutputFormat::Json => {
            println!(r#"{{ "status": "not_running" }}"#);
            Ok(())
        }
    };

    let client = match DaemonClient::connect() {
        Ok(c) => c,
        Err(_) => return not_running(),
    };

    let summary = match client.status().await {
        Ok(summary) => summary,
        Err(ClientError::DaemonNotRunning) => return not_running(),
        Err(ClientError::Io(ref e))
            if matches!(
                e.kind(),
                std::io::ErrorKind::ConnectionRefused | std::io::ErrorKind::NotFound
            ) =>
        {
            return not_running();
        }
        Err(e) => return Err(anyhow!("{}", e)),
    };

    match format {
        OutputFormat::Text => {
            println!("Status:      running");
            println!("Version:     {}", summary.version);
            println!("Device:      {} (tenant {})", summary.device_id, summary.tenant_id);
            println!("Uptime:      {}", format_uptime(summary.uptime_secs));
            println!(
                "Transport:   {}",
                if summary.transport_connected { "connected" } else { "disconnected" }
            );
            println!("Queue depth: {}", summary.queue_depth);
            println!("Open tickets:    {}", summary.open_tickets);
            println!("Pending actions: {}", summary.pending_actions);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

fn format_uptime(secs: u64) -> String {
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Locate the `wardend` binary. Duplicates `daemon_process::find_wardend_binary`
/// (private to that module) since this path is only needed for `--foreground`.
fn find_wardend_binary() -> Result<PathBuf> {
    let current_exe = std::env::current_exe().ok();

    let is_debug_build = current_exe
        .as_ref()
        .and_then(|p| p.to_str())
        .map(|s| s.contains("target/debug"))
        .unwrap_or(false);

    if is_debug_build {
        if let Some(manifest_dir) = crate::env::cargo_manifest_dir() {
            let dev_path = PathBuf::from(manifest_dir)
                .parent()
                .and_then(|p| p.parent())
                .map(|p| p.join("target/debug/wardend"));
            if let Some(path) = dev_path {
                if path.exists() {
                    return Ok(path);
                }
            }
        }
    }

    if let Some(ref exe) = current_exe {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join("wardend");
            if sibling.exists() {
                return Ok(sibling);
            }
        }
    }

    Ok(PathBuf::from("wardend"))
}

#[cfg(test)]
#[path = "daemon_tests.rs"]
mod tests;

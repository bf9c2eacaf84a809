// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `warden maintenance` - maintenance window management.

use std::collections::HashSet;

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use warden_core::maintenance::MaintenanceScope;

use crate::client::DaemonClient;
use crate::output::OutputFormat;
use crate::table::{Column, Table};

#[derive(Args)]
pub struct MaintenanceArgs {
    #[command(subcommand)]
    pub command: MaintenanceCommand,
}

#[derive(Subcommand)]
pub enum MaintenanceCommand {
    /// Create a maintenance window that suppresses escalation and/or remediation
    Create {
        /// Cover the whole device
        #[arg(long, conflicts_with_all = ["service", "signal_id"])]
        all: bool,
        /// Scope to one or more service names (repeatable)
        #[arg(long = "service", value_name = "NAME")]
        service: Vec<String>,
        /// Scope to one or more signal IDs (repeatable)
        #[arg(long = "signal-id", value_name = "ID")]
        signal_id: Vec<String>,
        /// Window start, epoch milliseconds
        #[arg(long)]
        start_ms: u64,
        /// Window end, epoch milliseconds
        #[arg(long)]
        end_ms: u64,
        /// Suppress escalation to the control plane during the window
        #[arg(long)]
        suppress_escalation: bool,
        /// Suppress local remediation during the window
        #[arg(long)]
        suppress_remediation: bool,
    },
    /// List all maintenance windows
    List,
    /// Cancel a maintenance window before it expires
    Cancel {
        /// Maintenance window ID
        window_id: String,
    },
}

pub async fn handle(
    cmd: MaintenanceCommand,
    client: &DaemonClient,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        MaintenanceCommand::Create {
            all,
            service,
            signal_id,
            start_ms,
            end_ms,
            suppress_escalation,
            suppress_remediation,
        } => {
            let scope = build_scope(all, service, signal_id)?;
            client
                .maintenance_create(scope, start_ms, end_ms, suppress_escalation, suppress_remediation)
                .await
                .map_err(|e| anyhow!("{}", e))?;
            println!("Maintenance window created");
            Ok(())
        }
        MaintenanceCommand::List => list(client, format).await,
        MaintenanceCommand::Cancel { window_id } => {
            client
                .maintenance_cancel(&window_id)
                .await
                .map_err(|e| anyhow!("{}", e))?;
            println!("Cancelled: {}", window_id);
            Ok(())
        }
    }
}

fn build_scope(all: bool, service: Vec<String>, signal_id: Vec<String>) -> Result<MaintenanceScope> {
    if all {
        return Ok(MaintenanceScope::All);
    }
    if !service.is_empty() {
        return Ok(MaintenanceScope::Services {
            names: service.into_iter().collect::<HashSet<_>>(),
        });
    }
    if !signal_id.is_empty() {
        return Ok(MaintenanceScope::SignalIds {
            ids: signal_id.into_iter().collect::<HashSet<_>>(),
        });
    }
    Err(anyhow!(
        "must specify one of --all, --service <NAME>, or --signal-id <ID>"
    ))
}

fn scope_label(scope: &MaintenanceScope) -> String {
    match scope {
        MaintenanceScope::All => "all".to_string(),
        MaintenanceScope::Services { names } => {
            let mut names: Vec<&String> = names.iter().collect();
            names.sort();
            format!("services: {}", names.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", "))
        }
        MaintenanceScope::SignalIds { ids } => {
            let mut ids: Vec<&String> = ids.iter().collect();
            ids.sort();
            format!("signals: {}", ids.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", "))
        }
    }
}

async fn list(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let windows = client.maintenance_list().await.map_err(|e| anyhow!("{}", e))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&windows)?);
        }
        OutputFormat::Text => {
            if windows.is_empty() {
                println!("No maintenance windows.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::left("ID"),
                Column::left("SCOPE"),
                Column::right("START_MS"),
                Column::right("END_MS"),
                Column::left("ESCALATION"),
                Column::left("REMEDIATION"),
            ]);
            for window in &windows {
                table.row(vec![
                    window.id.clone(),
                    scope_label(&window.scope),
                    window.start_ms.to_string(),
                    window.end_ms.to_string(),
                    if window.suppress_escalation { "suppressed".to_string() } else { "active".to_string() },
                    if window.suppress_remediation { "suppressed".to_string() } else { "active".to_string() },
                ]);
            }
            table.render(&mut std::io::stdout());
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "maintenance_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `warden pending` - list, approve, and cancel actions awaiting operator approval.

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};

use crate::client::DaemonClient;
use crate::output::{format_time_ago, OutputFormat};
use crate::table::{Column, Table};

#[derive(Args)]
pub struct PendingArgs {
    #[command(subcommand)]
    pub command: PendingCommand,
}

#[derive(Subcommand)]
pub enum PendingCommand {
    /// List actions awaiting operator approval
    List,
    /// Approve a pending action, releasing it for execution
    Approve {
        /// Signature ID of the pending action
        signature_id: String,
    },
    /// Cancel a pending action without executing it
    Cancel {
        /// Signature ID of the pending action
        signature_id: String,
    },
}

pub async fn handle(cmd: PendingCommand, client: &DaemonClient, format: OutputFormat) -> Result<()> {
    match cmd {
        PendingCommand::List => list(client, format).await,
        PendingCommand::Approve { signature_id } => {
            client
                .pending_approve(&signature_id)
                .await
                .map_err(|e| anyhow!("{}", e))?;
            println!("Approved: {}", signature_id);
            Ok(())
        }
        PendingCommand::Cancel { signature_id } => {
            client
                .pending_cancel(&signature_id)
                .await
                .map_err(|e| anyhow!("{}", e))?;
            println!("Cancelled: {}", signature_id);
            Ok(())
        }
    }
}

async fn list(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let items = client.pending_list().await.map_err(|e| anyhow!("{}", e))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        OutputFormat::Text => {
            if items.is_empty() {
                println!("No pending actions.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::left("SIGNATURE"),
                Column::left("TICKET"),
                Column::status("SEVERITY"),
                Column::right("CONFIDENCE"),
                Column::left("RUNBOOK"),
                Column::muted("CREATED"),
            ]);
            for item in &items {
                table.row(vec![
                    item.signature_id.clone(),
                    item.ticket_id.clone(),
                    item.severity.clone(),
                    item.confidence.to_string(),
                    item.matched_runbook.clone().unwrap_or_else(|| "-".to_string()),
                    format_time_ago(item.created_at_ms),
                ]);
            }
            table.render(&mut std::io::stdout());
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `warden ticket` - inspect remediation tickets opened by the pipeline.

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use warden_daemon::TicketSummary;

use crate::client::DaemonClient;
use crate::output::{format_time_ago, OutputFormat};
use crate::table::{Column, Table};

#[derive(Args)]
pub struct TicketArgs {
    #[command(subcommand)]
    pub command: TicketCommand,
}

#[derive(Subcommand)]
pub enum TicketCommand {
    /// List remediation tickets
    List,
    /// Show the full detail of a single ticket
    Show {
        /// Ticket ID
        ticket_id: String,
    },
}

pub async fn handle(cmd: TicketCommand, client: &DaemonClient, format: OutputFormat) -> Result<()> {
    match cmd {
        TicketCommand::List => list(client, format).await,
        TicketCommand::Show { ticket_id } => show(client, &ticket_id, format).await,
    }
}

async fn list(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let items = client.ticket_list().await.map_err(|e| anyhow!("{}", e))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        OutputFormat::Text => {
            if items.is_empty() {
                println!("No tickets.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::left("TICKET"),
                Column::left("SIGNATURE"),
                Column::status("STATUS"),
                Column::left("ESCALATED"),
                Column::muted("CREATED"),
            ]);
            for item in &items {
                table.row(vec![
                    item.ticket_id.clone(),
                    item.signature_id.clone(),
                    item.status.clone(),
                    if item.escalated { "yes".to_string() } else { "no".to_string() },
                    format_time_ago(item.created_at_ms),
                ]);
            }
            table.render(&mut std::io::stdout());
        }
    }

    Ok(())
}

async fn show(client: &DaemonClient, ticket_id: &str, format: OutputFormat) -> Result<()> {
    let ticket = client
        .ticket_show(ticket_id)
        .await
        .map_err(|e| anyhow!("{}", e))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&ticket)?);
        }
        OutputFormat::Text => print_detail(&ticket),
    }

    Ok(())
}

fn print_detail(ticket: &TicketSummary) {
    println!("Ticket:      {}", ticket.ticket_id);
    println!("Signature:   {}", ticket.signature_id);
    println!("Playbook:    {}", ticket.playbook_id.as_deref().unwrap_or("-"));
    println!("Status:      {}", ticket.status);
    println!("Escalated:   {}", ticket.escalated);
    println!("Created:     {}", format_time_ago(ticket.created_at_ms));
    if let Some(updated) = ticket.updated_at_ms {
        println!("Updated:     {}", format_time_ago(updated));
    }
    if !ticket.result_message.is_empty() {
        println!("Result:      {}", ticket.result_message);
    }
}

#[cfg(test)]
#[path = "ticket_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `warden exclude` - permanent ignore-list management for services, processes, and signatures.

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use warden_core::decision::IgnoreCategory;

use crate::client::DaemonClient;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct ExcludeArgs {
    #[command(subcommand)]
    pub command: ExcludeCommand,
}

#[derive(Subcommand)]
pub enum ExcludeCommand {
    /// Add an entry to the ignore list
    Add {
        #[arg(value_parser = parse_category)]
        category: IgnoreCategory,
        /// Service name, process name, or signature key to ignore
        name: String,
    },
    /// Remove an entry from the ignore list
    Remove {
        #[arg(value_parser = parse_category)]
        category: IgnoreCategory,
        name: String,
    },
    /// List all ignore-list entries
    List,
}

fn parse_category(s: &str) -> Result<IgnoreCategory, String> {
    match s {
        "services" | "service" => Ok(IgnoreCategory::Services),
        "processes" | "process" => Ok(IgnoreCategory::Processes),
        "signatures" | "signature" => Ok(IgnoreCategory::Signatures),
        other => Err(format!(
            "invalid category '{other}' (expected services, processes, or signatures)"
        )),
    }
}

fn category_label(category: IgnoreCategory) -> &'static str {
    match category {
        IgnoreCategory::Services => "services",
        IgnoreCategory::Processes => "processes",
        IgnoreCategory::Signatures => "signatures",
    }
}

pub async fn handle(cmd: ExcludeCommand, client: &DaemonClient, format: OutputFormat) -> Result<()> {
    match cmd {
        ExcludeCommand::Add { category, name } => {
            client
                .exclude_add(category, &name)
                .await
                .map_err(|e| anyhow!("{}", e))?;
            println!("Added '{}' to {}", name, category_label(category));
            Ok(())
        }
        ExcludeCommand::Remove { category, name } => {
            client
                .exclude_remove(category, &name)
                .await
                .map_err(|e| anyhow!("{}", e))?;
            println!("Removed '{}' from {}", name, category_label(category));
            Ok(())
        }
        ExcludeCommand::List => list(client, format).await,
    }
}

async fn list(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let lists = client.exclude_list().await.map_err(|e| anyhow!("{}", e))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&lists)?);
        }
        OutputFormat::Text => {
            print_section("Services", &lists.services);
            print_section("Processes", &lists.processes);
            print_section("Signatures", &lists.signatures);
        }
    }

    Ok(())
}

fn print_section(label: &str, entries: &[String]) {
    println!("{}:", label);
    if entries.is_empty() {
        println!("  (none)");
    } else {
        for entry in entries {
            println!("  {}", entry);
        }
    }
}

#[cfg(test)]
#[path = "exclude_tests.rs"]
mod tests;

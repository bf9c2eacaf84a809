// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! wardenctl - operator CLI for the endpoint-remediation agent daemon

mod client;
mod client_lifecycle;
mod color;
mod commands;
mod daemon_process;
mod env;
mod exit_error;
mod help;
mod output;
mod table;

use output::OutputFormat;

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use commands::{dampening, daemon, exclude, maintenance, pending, ticket};

use crate::client::DaemonClient;

#[derive(Parser)]
#[command(
    name = "warden",
    version,
    disable_version_flag = true,
    about = "Operator control surface for the endpoint-remediation agent"
)]
struct Cli {
    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show daemon status and queue depth
    Status,
    /// Trigger a test escalation for a signal, bypassing real collectors
    Escalate {
        /// Signal key to synthesize (e.g. "disk.full")
        signal_key: String,
        /// Escalation target label recorded on the resulting ticket
        target: String,
    },
    /// Pending actions awaiting approval
    Pending(pending::PendingArgs),
    /// Ignore-list management (services, processes, signatures)
    Exclude(exclude::ExcludeArgs),
    /// Maintenance window management
    Maintenance(maintenance::MaintenanceArgs),
    /// Memory dampening management
    Dampening(dampening::DampeningArgs),
    /// Remediation ticket management
    Ticket(ticket::TicketArgs),
    /// Daemon process management
    Daemon(daemon::DaemonArgs),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let code = e
            .downcast_ref::<exit_error::ExitError>()
            .map_or(1, |c| c.code);
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(code);
    }
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains the source error text, we skip
/// the "Caused by" chain to avoid noisy duplicate output (common when
/// thiserror variants use `#[error("... {0}")]` with `#[from]`).
/// Otherwise we render the full chain so context isn't lost.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

fn cli_command() -> clap::Command {
    Cli::command()
        .help_template(help::template())
        .before_help(help::commands())
        .after_help(help::after_help())
        .styles(help::styles())
        .arg(
            clap::Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .action(clap::ArgAction::Version)
                .help("Print version"),
        )
}

async fn run() -> Result<()> {
    let matches = match cli_command().try_get_matches() {
        Ok(m) => m,
        Err(e) => {
            if e.kind() == clap::error::ErrorKind::DisplayHelp {
                let args: Vec<String> = std::env::args().collect();
                print_formatted_help(&args);
                return Ok(());
            }
            e.exit();
        }
    };
    let cli = Cli::from_arg_matches(&matches)?;
    let format = cli.output;

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            help::print_help(cli_command());
            return Ok(());
        }
    };

    match command {
        // Manages the daemon process itself; must not require an existing connection.
        Commands::Daemon(args) => return daemon::daemon(args, format).await,

        Commands::Status => daemon::status(format).await?,

        Commands::Escalate { signal_key, target } => {
            let client = DaemonClient::for_action()?;
            client
                .test_escalate(&signal_key, &target)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            println!("Escalation triggered for '{}'", signal_key);
        }

        Commands::Pending(args) => {
            use pending::PendingCommand;
            match &args.command {
                PendingCommand::List => {
                    let client = DaemonClient::for_query()?;
                    pending::handle(args.command, &client, format).await?
                }
                PendingCommand::Approve { .. } | PendingCommand::Cancel { .. } => {
                    let client = DaemonClient::for_action()?;
                    pending::handle(args.command, &client, format).await?
                }
            }
        }

        Commands::Exclude(args) => {
            use exclude::ExcludeCommand;
            match &args.command {
                ExcludeCommand::List => {
                    let client = DaemonClient::for_query()?;
                    exclude::handle(args.command, &client, format).await?
                }
                ExcludeCommand::Add { .. } | ExcludeCommand::Remove { .. } => {
                    let client = DaemonClient::for_action()?;
                    exclude::handle(args.command, &client, format).await?
                }
            }
        }

        Commands::Maintenance(args) => {
            use maintenance::MaintenanceCommand;
            match &args.command {
                MaintenanceCommand::List => {
                    let client = DaemonClient::for_query()?;
                    maintenance::handle(args.command, &client, format).await?
                }
                MaintenanceCommand::Create { .. } | MaintenanceCommand::Cancel { .. } => {
                    let client = DaemonClient::for_action()?;
                    maintenance::handle(args.command, &client, format).await?
                }
            }
        }

        Commands::Dampening(args) => {
            let client = DaemonClient::for_action()?;
            dampening::handle(args.command, &client).await?
        }

        Commands::Ticket(args) => {
            let client = DaemonClient::for_query()?;
            ticket::handle(args.command, &client, format).await?
        }

    }

    Ok(())
}

/// Print help with post-hoc colorization, resolving the correct subcommand from args.
fn print_formatted_help(args: &[String]) {
    let cmd = cli_command();

    let non_flags: Vec<&String> = args
        .iter()
        .skip(1)
        .filter(|arg| !arg.starts_with('-'))
        .collect();

    let subcommand_names: Vec<&str> = if non_flags.first().map(|s| s.as_str()) == Some("help") {
        non_flags.iter().skip(1).map(|s| s.as_str()).collect()
    } else {
        non_flags.iter().map(|s| s.as_str()).collect()
    };

    let target_cmd = find_subcommand(cmd, &subcommand_names);
    help::print_help(target_cmd);
}

/// Recursively find a nested subcommand by name path.
pub(crate) fn find_subcommand(mut cmd: clap::Command, names: &[&str]) -> clap::Command {
    for name in names {
        let mut found_sub = None;
        for sub in cmd.get_subcommands() {
            if sub.get_name() == *name || sub.get_all_aliases().any(|a| a == *name) {
                found_sub = Some(sub.get_name().to_string());
                break;
            }
        }
        if let Some(sub_name) = found_sub {
            if let Some(sub) = cmd.find_subcommand_mut(&sub_name) {
                cmd = sub.clone();
            } else {
                break;
            }
        } else {
            break;
        }
    }
    cmd
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `warden dampening` - reset the repeat-offender memory for a signal/device pair.

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};

use crate::client::DaemonClient;

#[derive(Args)]
pub struct DampeningArgs {
    #[command(subcommand)]
    pub command: DampeningCommand,
}

#[derive(Subcommand)]
pub enum DampeningCommand {
    /// Clear the dampening memory for a signal on a device
    Reset {
        /// Signal key (e.g. "disk.full")
        signal_key: String,
        /// Device ID the memory is scoped to
        device_id: String,
    },
}

pub async fn handle(cmd: DampeningCommand, client: &DaemonClient) -> Result<()> {
    match cmd {
        DampeningCommand::Reset { signal_key, device_id } => {
            client
                .dampening_reset(&signal_key, &device_id)
                .await
                .map_err(|e| anyhow!("{}", e))?;
            println!("Dampening memory reset for '{}' on {}", signal_key, device_id);
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "dampening_tests.rs"]
mod tests;

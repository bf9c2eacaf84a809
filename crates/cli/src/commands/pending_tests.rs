// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use clap::Parser;

#[derive(Parser)]
struct Harness {
    #[command(subcommand)]
    command: PendingCommand,
}

#[test]
fn parses_list() {
    let h = Harness::parse_from(["pending", "list"]);
    assert!(matches!(h.command, PendingCommand::List));
}

#[test]
fn parses_approve_with_signature_id() {
    let h = Harness::parse_from(["pending", "approve", "sig-123"]);
    match h.command {
        PendingCommand::Approve { signature_id } => assert_eq!(signature_id, "sig-123"),
        _ => panic!("expected Approve"),
    }
}

#[test]
fn parses_cancel_with_signature_id() {
    let h = Harness::parse_from(["pending", "cancel", "sig-456"]);
    match h.command {
        PendingCommand::Cancel { signature_id } => assert_eq!(signature_id, "sig-456"),
        _ => panic!("expected Cancel"),
    }
}

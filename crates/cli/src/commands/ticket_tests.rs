// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use clap::Parser;

#[derive(Parser)]
struct Harness {
    #[command(subcommand)]
    command: TicketCommand,
}

#[test]
fn parses_list() {
    let h = Harness::parse_from(["ticket", "list"]);
    assert!(matches!(h.command, TicketCommand::List));
}

#[test]
fn parses_show_with_ticket_id() {
    let h = Harness::parse_from(["ticket", "show", "tkt-1"]);
    match h.command {
        TicketCommand::Show { ticket_id } => assert_eq!(ticket_id, "tkt-1"),
        _ => panic!("expected Show"),
    }
}

#[test]
fn print_detail_does_not_panic_on_minimal_ticket() {
    let ticket = TicketSummary {
        ticket_id: "tkt-1".to_string(),
        signature_id: "sig-1".to_string(),
        playbook_id: None,
        status: "open".to_string(),
        created_at_ms: 0,
        updated_at_ms: None,
        result_message: String::new(),
        escalated: false,
    };
    print_detail(&ticket);
}

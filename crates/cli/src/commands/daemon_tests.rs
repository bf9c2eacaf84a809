// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn format_uptime_seconds_only() {
    assert_eq!(format_uptime(45), "45s");
}

#[test]
fn format_uptime_minutes_and_seconds() {
    assert_eq!(format_uptime(125), "2m 5s");
}

#[test]
fn format_uptime_hours_minutes_seconds() {
    assert_eq!(format_uptime(3725), "1h 2m 5s");
}

#[test]
fn parses_start_foreground() {
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(subcommand)]
        command: Option<DaemonCommand>,
    }

    let h = Harness::parse_from(["daemon", "start", "--foreground"]);
    match h.command {
        Some(DaemonCommand::Start { foreground }) => assert!(foreground),
        _ => panic!("expected Start"),
    }
}

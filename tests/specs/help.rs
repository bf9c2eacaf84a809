//! CLI help output specs.

use crate::prelude::*;

#[test]
fn warden_no_args_shows_usage_and_exits_zero() {
    cli().passes().stdout_has("Usage:");
}

#[test]
fn warden_help_shows_usage() {
    cli().args(&["--help"]).passes().stdout_has("Usage:");
}

#[test]
fn warden_daemon_help_shows_subcommands() {
    cli()
        .args(&["daemon", "--help"])
        .passes()
        .stdout_has("start")
        .stdout_has("stop")
        .stdout_has("status");
}

#[test]
fn warden_pending_help_shows_subcommands() {
    cli()
        .args(&["pending", "--help"])
        .passes()
        .stdout_has("list")
        .stdout_has("approve")
        .stdout_has("cancel");
}

#[test]
fn warden_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}

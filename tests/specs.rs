//! Behavioral specifications for the `warden` operator CLI.
//!
//! These tests are black-box: they invoke the CLI binary and verify
//! stdout, stderr, and exit codes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/help.rs"]
mod help;
#[path = "specs/daemon_lifecycle.rs"]
mod daemon_lifecycle;
#[path = "specs/pending.rs"]
mod pending;
#[path = "specs/exclude.rs"]
mod exclude;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: process execution, operator notifications,
//! and bearer-credential resolution. Everything that shells out, touches
//! the desktop notification center, or reads a secret from disk/env lives
//! here behind a narrow trait, per the Executor's "only place that touches
//! a subprocess or a socket" rule.

pub mod credential;
pub mod notify;
pub mod subprocess;

pub use credential::{CredentialError, CredentialSource, CredentialStore, OsCredentialStore};
pub use notify::{DesktopNotifyAdapter, NoOpNotifyAdapter, NotifyAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use credential::FakeCredentialStore;
#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifyAdapter, NotifyCall};

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential store: resolves the bearer credential the transport uses to
//! authenticate to the control plane. The daemon's on-disk config only ever
//! holds a [`warden_core::CredentialRef`]-style pointer to where the secret
//! lives; this is the one place that actually reads it.

mod os_store;

pub use os_store::OsCredentialStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeCredentialStore;

use async_trait::async_trait;
use thiserror::Error;

/// Errors resolving a bearer credential.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential environment variable {0} is not set")]
    EnvVarMissing(String),

    #[error("failed to read credential file {path}: {source}")]
    FileRead { path: String, source: std::io::Error },

    #[error("credential at {0} is empty")]
    Empty(String),
}

/// Resolves a bearer credential by reference, never logging or persisting
/// the resolved value. Implementors fetch fresh on every call rather than
/// caching, so a rotated credential takes effect without a daemon restart.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    async fn resolve(&self, reference: &CredentialSource) -> Result<String, CredentialError>;
}

/// Where to fetch the credential from, mirrors `warden-daemon`'s on-disk
/// `CredentialRef` but lives here so this crate doesn't depend on the
/// daemon crate.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// An OS-appropriate secure-store entry, addressed by path.
    SecureStorePath(std::path::PathBuf),
    /// An environment variable, for local/test overrides.
    EnvVar(String),
}

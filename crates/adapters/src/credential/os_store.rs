// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Production credential store: reads an env var, or a file at an
//! OS-appropriate secure-store path.

use super::{CredentialError, CredentialSource, CredentialStore};
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, Default)]
pub struct OsCredentialStore;

impl OsCredentialStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CredentialStore for OsCredentialStore {
    async fn resolve(&self, reference: &CredentialSource) -> Result<String, CredentialError> {
        let value = match reference {
            CredentialSource::EnvVar(name) => std::env::var(name)
                .map_err(|_| CredentialError::EnvVarMissing(name.clone()))?,
            CredentialSource::SecureStorePath(path) => {
                std::fs::read_to_string(path)
                    .map_err(|source| CredentialError::FileRead { path: path.display().to_string(), source })?
                    .trim()
                    .to_string()
            }
        };

        if value.is_empty() {
            return Err(CredentialError::Empty(match reference {
                CredentialSource::EnvVar(name) => name.clone(),
                CredentialSource::SecureStorePath(path) => path.display().to_string(),
            }));
        }

        Ok(value)
    }
}

#[cfg(test)]
#[path = "os_store_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory credential store for tests.
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{CredentialError, CredentialSource, CredentialStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Fake credential store keyed by the same string a [`CredentialSource`]
/// would resolve to (env var name, or path rendered via `Path::display`).
#[derive(Default)]
pub struct FakeCredentialStore {
    values: Mutex<HashMap<String, String>>,
}

impl FakeCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.lock().insert(key.into(), value.into());
    }
}

#[async_trait]
impl CredentialStore for FakeCredentialStore {
    async fn resolve(&self, reference: &CredentialSource) -> Result<String, CredentialError> {
        let key = match reference {
            CredentialSource::EnvVar(name) => name.clone(),
            CredentialSource::SecureStorePath(path) => path.display().to_string(),
        };
        self.values
            .lock()
            .get(&key)
            .cloned()
            .ok_or_else(|| CredentialError::EnvVarMissing(key))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;

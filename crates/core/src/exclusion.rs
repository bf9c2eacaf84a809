// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ExclusionLists: three categorical sets on disk, additive, consulted
//! before emission and escalation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExclusionCategory {
    Services,
    Processes,
    Signatures,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExclusionLists {
    pub services: HashSet<String>,
    pub processes: HashSet<String>,
    pub signatures: HashSet<String>,
}

impl ExclusionLists {
    /// Adds to a category. Set semantics: adding twice has the same end
    /// state as adding once (§8 idempotence property).
    pub fn add(&mut self, category: ExclusionCategory, name: impl Into<String>) {
        let name = name.into();
        match category {
            ExclusionCategory::Services => self.services.insert(name),
            ExclusionCategory::Processes => self.processes.insert(name),
            ExclusionCategory::Signatures => self.signatures.insert(name),
        };
    }

    pub fn remove(&mut self, category: ExclusionCategory, name: &str) {
        match category {
            ExclusionCategory::Services => self.services.remove(name),
            ExclusionCategory::Processes => self.processes.remove(name),
            ExclusionCategory::Signatures => self.signatures.remove(name),
        };
    }

    pub fn contains_service(&self, name: &str) -> bool {
        self.services.contains(name)
    }

    pub fn contains_process(&self, name: &str) -> bool {
        self.processes.contains(name)
    }

    pub fn contains_signature(&self, signature_id: &str) -> bool {
        self.signatures.contains(signature_id)
    }
}

#[cfg(test)]
#[path = "exclusion_tests.rs"]
mod tests;

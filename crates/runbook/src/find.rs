// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runbook discovery: scan a directory for runbook definition files.

use crate::classifier::classify_runbook;
use crate::parser::{parse_runbook, Format};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use warden_core::runbook::Runbook;

#[derive(Debug, Error)]
pub enum FindError {
    #[error("failed to read runbook directory {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Load every runbook file in `dir`, classify it, and return it keyed by id.
///
/// Files with an unrecognized extension are skipped. Files that fail to
/// parse or fail structural validation are skipped with a warning rather
/// than aborting the whole load — one bad runbook shouldn't take every
/// other one down.
pub fn load_runbook_dir(dir: &Path) -> Result<HashMap<String, Runbook>, FindError> {
    let mut runbooks = HashMap::new();

    let entries = std::fs::read_dir(dir).map_err(|source| FindError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| FindError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(format) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Format::from_extension)
        else {
            continue;
        };

        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "failed to read runbook file");
                continue;
            }
        };

        match parse_runbook(&content, format) {
            Ok(mut runbook) => {
                classify_runbook(&mut runbook);
                runbooks.insert(runbook.id.as_str().to_string(), runbook);
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "skipping invalid runbook file");
            }
        }
    }

    Ok(runbooks)
}

#[cfg(test)]
#[path = "find_tests.rs"]
mod tests;

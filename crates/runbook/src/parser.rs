// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runbook file parsing (HCL, TOML, and JSON).

use crate::validate::validate_runbook;
use serde::Deserialize;
use thiserror::Error;
use warden_core::runbook::{RiskClass, Runbook, RunbookId, RunbookStep, VerificationDescriptor};

/// Runbook file format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Hcl,
    Json,
}

impl Format {
    /// Map a file extension (without the leading dot) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "toml" => Some(Format::Toml),
            "hcl" => Some(Format::Hcl),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

/// Errors that can occur during runbook parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HCL parse error: {0}")]
    Hcl(#[from] hcl::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid runbook {id}: {message}")]
    Invalid { id: String, message: String },
}

/// On-disk shape of a runbook file.
///
/// `risk_class` is deliberately absent: it is never trusted from the file,
/// only ever assigned by [`crate::classify_runbook`] after parsing.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RunbookFile {
    id: String,
    name: String,
    steps: Vec<RunbookStep>,
    #[serde(default)]
    verification: Vec<VerificationDescriptor>,
    #[serde(default)]
    rollback_steps: Vec<RunbookStep>,
    estimated_duration_secs: u64,
    user_impact_class: String,
    #[serde(default)]
    version: u32,
}

/// Parse a single runbook file's contents.
///
/// The returned runbook's `risk_class` is a provisional `RiskClass::C`
/// (fail closed) until [`crate::classify_runbook`] runs over it; callers
/// that skip classification must not treat the runbook as auto-executable.
pub fn parse_runbook(content: &str, format: Format) -> Result<Runbook, ParseError> {
    let file: RunbookFile = match format {
        Format::Toml => toml::from_str(content)?,
        Format::Hcl => hcl::from_str(content)?,
        Format::Json => serde_json::from_str(content)?,
    };

    let runbook = Runbook {
        id: RunbookId::new(file.id),
        name: file.name,
        risk_class: RiskClass::C,
        steps: file.steps,
        verification: file.verification,
        rollback_steps: file.rollback_steps,
        estimated_duration_secs: file.estimated_duration_secs,
        user_impact_class: file.user_impact_class,
        version: file.version,
    };

    validate_runbook(&runbook).map_err(|message| ParseError::Invalid {
        id: runbook.id.as_str().to_string(),
        message,
    })?;

    Ok(runbook)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;

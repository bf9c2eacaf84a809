// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration (A.3): TOML on disk, plain structs once loaded.
//!
//! The config file never holds the bearer credential itself — only a
//! reference to where `warden_adapters::credential::CredentialStore` should
//! fetch it from at startup (§5, §6). Numeric thresholds all have the
//! default spec.md states explicitly; every one is overridable here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("failed to parse config file {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}

/// Thresholds spec.md leaves as "default" values (§4.3, §4.7, §4.9, §4.10).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub flap_window_secs: u64,
    pub flap_threshold: usize,
    pub flap_quiet_secs: u64,
    pub sustained_breach_secs: u64,
    pub dampening_k_min: u32,
    pub dampening_k_dampen: u32,
    pub cooldown_secs: u64,
    pub batch_window_secs: u64,
    pub queue_depth: usize,
    pub step_timeout_secs: u64,
    pub prompt_timeout_secs: u64,
    pub attempt_retention_days: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            flap_window_secs: warden_core::resource_state::DEFAULT_FLAP_WINDOW_SECS,
            flap_threshold: warden_core::resource_state::DEFAULT_FLAP_THRESHOLD,
            flap_quiet_secs: warden_core::resource_state::DEFAULT_FLAP_QUIET_SECS,
            sustained_breach_secs: warden_engine::state_tracker::DEFAULT_SUSTAINED_BREACH_SECS,
            dampening_k_min: warden_core::memory::K_MIN,
            dampening_k_dampen: warden_core::memory::K_DAMPEN,
            cooldown_secs: warden_engine::escalation::ESCALATION_COOLDOWN_MS / 1000,
            batch_window_secs: warden_engine::escalation::BATCH_WINDOW_SECS,
            queue_depth: warden_engine::playbook_queue::MAX_QUEUE_DEPTH,
            step_timeout_secs: 120,
            prompt_timeout_secs: 300,
            attempt_retention_days: warden_core::memory::ATTEMPT_RETENTION_DAYS,
        }
    }
}

impl Thresholds {
    pub fn state_tracker_config(&self) -> warden_engine::state_tracker::StateTrackerConfig {
        warden_engine::state_tracker::StateTrackerConfig {
            flap_window_secs: self.flap_window_secs,
            flap_threshold: self.flap_threshold,
            flap_quiet_secs: self.flap_quiet_secs,
            sustained_breach_secs: self.sustained_breach_secs,
        }
    }
}

/// Where the bearer credential lives. Never the secret itself (§5, §6): a
/// path to an OS-appropriate secure-store entry, or an environment variable
/// name for test/dev overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CredentialRef {
    SecureStorePath { path: PathBuf },
    EnvVar { name: String },
}

impl Default for CredentialRef {
    fn default() -> Self {
        CredentialRef::EnvVar { name: "WARDEN_BEARER_TOKEN".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tenant_id: String,
    pub device_id: String,
    pub transport_url: String,
    pub credential: CredentialRef,
    /// Free-form role label carried in every generated signature's
    /// `SignatureContext` (§4.5) — "workstation", "server", etc.
    pub device_role: String,
    pub heartbeat_secs: Option<u64>,
    pub hmac_enforced: bool,
    pub collectors_enabled: bool,
    pub log_level: String,
    #[serde(flatten)]
    pub thresholds: Thresholds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tenant_id: String::new(),
            device_id: String::new(),
            transport_url: "wss://control-plane.invalid/v1/agent".to_string(),
            credential: CredentialRef::default(),
            device_role: "workstation".to_string(),
            heartbeat_secs: None,
            hmac_enforced: true,
            collectors_enabled: true,
            log_level: "info".to_string(),
            thresholds: Thresholds::default(),
        }
    }
}

impl Config {
    /// Load and parse a TOML config file. A missing file is not an error —
    /// defaults apply (matches spec.md's "all overridable" stance); a file
    /// that exists but fails to parse is a fatal startup error (§7).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration
//!
//! Loaded from TOML; every field has a default so an empty document is a
//! valid configuration.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration for the roster engine
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub retry: RetrySection,
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}

/// Durability tuning for the roster store
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSection {
    /// Committed transactions between automatic snapshots
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval: u64,
    /// Old snapshots kept after cleanup
    #[serde(default = "default_keep_old_snapshots")]
    pub keep_old_snapshots: usize,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            snapshot_interval: default_snapshot_interval(),
            keep_old_snapshots: default_keep_old_snapshots(),
        }
    }
}

/// Bounded retry for transient storage failures
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySection {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    #[serde(with = "humantime_serde", default = "default_base_delay")]
    pub base_delay: Duration,
    #[serde(with = "humantime_serde", default = "default_max_delay")]
    pub max_delay: Duration,
    /// Jitter as a fraction of the computed delay, clamped to [0, 1]
    #[serde(default = "default_jitter")]
    pub jitter: f64,
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay: default_base_delay(),
            max_delay: default_max_delay(),
            jitter: default_jitter(),
        }
    }
}

fn default_snapshot_interval() -> u64 {
    1000
}

fn default_keep_old_snapshots() -> usize {
    2
}

fn default_max_attempts() -> usize {
    3
}

fn default_base_delay() -> Duration {
    Duration::from_millis(50)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_jitter() -> f64 {
    0.2
}

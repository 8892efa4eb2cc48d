//! Configuration for the range client and the default rule.
//!
//! Configuration is stored in TOML and supports environment variable
//! overrides.
//!
//! ## Resolution order
//!
//! 1. Built-in defaults
//! 2. Config file: `$HIBP_GUARD_CONFIG`, or the platform config directory
//!    (`~/.config/hibp-guard/config.toml` on Linux)
//! 3. Environment: `HIBP_GUARD_ENDPOINT`, `HIBP_GUARD_TIMEOUT_SECS`
//!
//! ## Example configuration file
//!
//! ```toml
//! [range]
//! endpoint = "https://api.pwnedpasswords.com/range/"
//! timeout_secs = 5
//!
//! [rule]
//! name = "hibp"
//! params = ["min=3"]
//! ```

use crate::fetcher::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, RangeClient};
use crate::registry::HIBP_RULE;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Env var naming an explicit config file.
pub const CONFIG_ENV: &str = "HIBP_GUARD_CONFIG";
/// Env var overriding `range.endpoint`.
pub const ENDPOINT_ENV: &str = "HIBP_GUARD_ENDPOINT";
/// Env var overriding `range.timeout_secs`.
pub const TIMEOUT_ENV: &str = "HIBP_GUARD_TIMEOUT_SECS";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Range service settings
    pub range: RangeConfig,
    /// Rule used when the caller does not name one
    pub rule: RuleConfig,
}

/// Range service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    /// Base URL; the 5-character prefix is appended to it.
    pub endpoint: String,
    /// Request timeout in seconds. A timeout fails open like any other
    /// network error.
    pub timeout_secs: u64,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl RangeConfig {
    /// Request timeout as a [`Duration`].
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the HTTP range client described by these settings.
    pub fn client(&self) -> Result<RangeClient> {
        RangeClient::with_endpoint(&self.endpoint, self.timeout())
    }
}

/// Default rule description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Registered rule name.
    pub name: String,
    /// Rule parameter tokens, e.g. `["min=3"]`.
    pub params: Vec<String>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            name: HIBP_RULE.to_string(),
            params: Vec::new(),
        }
    }
}

impl RuleConfig {
    /// Rule string in registry form: `name` or `name:p1,p2`.
    pub fn spec(&self) -> String {
        if self.params.is_empty() {
            self.name.clone()
        } else {
            format!("{}:{}", self.name, self.params.join(","))
        }
    }
}

impl GuardConfig {
    /// Load from `$HIBP_GUARD_CONFIG` or the platform config path, then
    /// apply environment overrides.
    ///
    /// A missing file yields defaults; an unreadable or malformed one is an
    /// [`Error::Config`].
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Some(PathBuf::from(path)),
            None => Self::default_path(),
        };

        let mut config = match path {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load a specific TOML file, without environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config {}: {e}", path.display())))
    }

    /// Platform config file location, if a home directory can be found.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "hibp-guard", "hibp-guard")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply `HIBP_GUARD_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|v| !v.trim().is_empty()) {
            self.range.endpoint = endpoint.trim().to_string();
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            self.range.timeout_secs = raw
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("{TIMEOUT_ENV}={raw}: {e}")))?;
        }
        Ok(())
    }
}

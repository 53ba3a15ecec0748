//! Console configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, Result};

/// Console configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Admin API connection
    pub admin: AdminApiConfig,

    /// Batch apply settings
    pub apply: ApplyConfig,

    /// Default log level, overridden by `RUST_LOG`
    pub log_level: String,
}

/// Admin API connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminApiConfig {
    /// Base URL, e.g. `http://localhost:10001`
    pub url: String,

    /// Sent as `X-API-Key` when set
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Batch apply settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyConfig {
    /// Maximum create/delete requests in flight at once
    pub max_in_flight: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            admin: AdminApiConfig::default(),
            apply: ApplyConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for AdminApiConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:10001".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self { max_in_flight: 16 }
    }
}

impl ConsoleConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ConsoleError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConsoleError::Config(format!("Cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&contents)
    }

    /// `path` (or the defaults) with process environment overrides on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override fields from environment variables.
    ///
    /// `lookup` is `std::env::var` in production and a map in tests.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CHRONIK_ADMIN_URL") {
            self.admin.url = url;
        }
        if let Some(key) = lookup("CHRONIK_API_KEY") {
            self.admin.api_key = (!key.is_empty()).then_some(key);
        }
        if let Some(timeout) = lookup("CHRONIK_ADMIN_TIMEOUT_SECS") {
            self.admin.timeout_secs = timeout.trim().parse().map_err(|_| {
                let msg = format!("CHRONIK_ADMIN_TIMEOUT_SECS is not a number: {timeout}");
                ConsoleError::Config(msg)
            })?;
        }
        if let Some(max) = lookup("CHRONIK_ACL_MAX_IN_FLIGHT") {
            self.apply.max_in_flight = max.trim().parse().map_err(|_| {
                ConsoleError::Config(format!("CHRONIK_ACL_MAX_IN_FLIGHT is not a number: {max}"))
            })?;
        }
        if let Some(level) = lookup("CHRONIK_LOG_LEVEL") {
            self.log_level = level;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.admin.url.starts_with("http://") || self.admin.url.starts_with("https://")) {
            return Err(ConsoleError::Config(format!(
                "admin.url must be an http(s) URL, got '{}'",
                self.admin.url
            )));
        }
        if self.admin.timeout_secs == 0 {
            return Err(ConsoleError::Config("admin.timeout_secs must be positive".into()));
        }
        if self.apply.max_in_flight == 0 {
            return Err(ConsoleError::Config("apply.max_in_flight must be positive".into()));
        }
        Ok(())
    }
}

#![forbid(unsafe_code)]

//! Host configuration.
//!
//! Precedence, lowest first: [`HostConfig::default`], a TOML file (with the
//! `config` feature), then the `FALSEWORK_SCHEDULING` environment variable.
//!
//! ```toml
//! scheduling = "immediate"
//! upgrade_on_define = false
//! ```

use std::env;
use std::fmt;
use std::str::FromStr;

/// Environment variable that overrides [`HostConfig::scheduling`].
pub const SCHEDULING_ENV: &str = "FALSEWORK_SCHEDULING";

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown scheduling mode {0:?} (expected \"frame\" or \"immediate\")")]
    UnknownScheduling(String),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "config")]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// When deferred renders run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum Scheduling {
    /// Coalesce until the host's next frame tick.
    #[default]
    Frame,
    /// Run each render request at once.
    Immediate,
}

impl FromStr for Scheduling {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "frame" | "raf" => Ok(Self::Frame),
            "immediate" | "sync" => Ok(Self::Immediate),
            _ => Err(ConfigError::UnknownScheduling(s.to_owned())),
        }
    }
}

impl fmt::Display for Scheduling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Frame => "frame",
            Self::Immediate => "immediate",
        })
    }
}

/// Settings for a component host.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct HostConfig {
    pub scheduling: Scheduling,
    /// Instantiate matching elements already in the tree when a component
    /// is defined.
    pub upgrade_on_define: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            scheduling: Scheduling::Frame,
            upgrade_on_define: true,
        }
    }
}

impl HostConfig {
    /// Defaults with the environment override applied.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownScheduling`] for an unrecognized value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let value = env::var(SCHEDULING_ENV).ok();
        Self::default().with_env_value(value.as_deref())
    }

    /// Apply an override value as if read from [`SCHEDULING_ENV`].
    /// Empty and missing values leave the config unchanged.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownScheduling`] for an unrecognized value.
    pub fn with_env_value(mut self, value: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.scheduling = value.parse()?;
            tracing::debug!(scheduling = %self.scheduling, "scheduling overridden from environment");
        }
        Ok(self)
    }

    /// Builder-style scheduling override.
    #[must_use]
    pub fn scheduling(mut self, scheduling: Scheduling) -> Self {
        self.scheduling = scheduling;
        self
    }

    /// Parse TOML text. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed input.
    #[cfg(feature = "config")]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a TOML file, then apply the environment override.
    ///
    /// # Errors
    ///
    /// I/O, parse, and override errors.
    #[cfg(feature = "config")]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), ?config, "loaded host config");
        let value = env::var(SCHEDULING_ENV).ok();
        config.with_env_value(value.as_deref())
    }
}

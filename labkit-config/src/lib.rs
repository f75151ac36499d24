//! Host configuration.
//!
//! A [`ShellConfig`] is read from a JSON file. Every key is optional; missing
//! keys take the defaults below, and unknown keys are rejected so typos do not
//! go unnoticed.
//!
//! ```json
//! {
//!   "app_title": "Protein Science Toolkit",
//!   "default_tool": "beer_lambert",
//!   "show_placeholders": true,
//!   "temperature_range": { "min_k": 200.0, "max_k": 400.0 },
//!   "telemetry": { "filter": "info" }
//! }
//! ```

#![warn(missing_docs, clippy::pedantic)]

use std::fs;
use std::path::{Path, PathBuf};

use labkit_calc::thermodynamics::{DEFAULT_TEMPERATURE_RANGE, validate_temperature_range};
use labkit_primitives::ToolId;
use labkit_telemetry::TelemetryConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Title shown when no tool is open.
pub const DEFAULT_APP_TITLE: &str = "Protein Science Toolkit";

/// Plot range for temperature-dependent series, in Kelvin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemperatureRange {
    /// Lower bound.
    pub min_k: f64,
    /// Upper bound.
    pub max_k: f64,
}

impl Default for TemperatureRange {
    fn default() -> Self {
        let (min_k, max_k) = DEFAULT_TEMPERATURE_RANGE;
        Self { min_k, max_k }
    }
}

impl From<TemperatureRange> for (f64, f64) {
    fn from(range: TemperatureRange) -> Self {
        (range.min_k, range.max_k)
    }
}

/// Settings for the host shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    /// Window title without a tool open.
    pub app_title: String,
    /// Tool opened at startup instead of the start menu.
    pub default_tool: Option<String>,
    /// List tools that are not implemented yet.
    pub show_placeholders: bool,
    /// Range for the thermodynamics plots.
    pub temperature_range: TemperatureRange,
    /// Logging settings.
    pub telemetry: TelemetryConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            app_title: DEFAULT_APP_TITLE.to_owned(),
            default_tool: None,
            show_placeholders: true,
            temperature_range: TemperatureRange::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl ShellConfig {
    /// Reads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read,
    /// [`ConfigError::Parse`] for malformed JSON and [`ConfigError::Invalid`]
    /// when a value fails [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Reads `path` if given, otherwise returns the defaults.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Checks values serde cannot check.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty title, a malformed
    /// `default_tool` id, or a temperature range that is not positive and
    /// increasing.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.app_title.trim().is_empty() {
            return Err(ConfigError::invalid("app_title cannot be empty"));
        }
        if let Some(tool) = &self.default_tool {
            ToolId::new(tool.as_str())
                .map_err(|err| ConfigError::invalid(format!("default_tool: {err}")))?;
        }
        validate_temperature_range(self.temperature_range.into())
            .map_err(|err| ConfigError::invalid(format!("temperature_range: {err}")))?;
        Ok(())
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config `{}`: {source}", path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid configuration JSON.
    #[error("failed to parse config `{}`: {source}", path.display())]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// A value is out of range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl ConfigError {
    fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

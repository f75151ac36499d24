//! Logging setup for labkit hosts.
//!
//! Library crates only emit `tracing` events; a host calls [`init_tracing`]
//! once at startup to install a formatted subscriber.

#![warn(missing_docs, clippy::pedantic)]

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*};

/// Default filter directive.
pub const DEFAULT_FILTER: &str = "info";

/// Output layout of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Single-line records.
    #[default]
    Compact,
    /// Default `tracing-subscriber` layout.
    Full,
    /// Multi-line, human-oriented records.
    Pretty,
}

/// Subscriber settings, usually read from the `telemetry` section of the
/// shell configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelemetryConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset or ignored.
    pub filter: String,
    /// Let `RUST_LOG` take precedence over [`filter`](Self::filter).
    pub respect_env: bool,
    /// Line layout.
    pub format: LogFormat,
    /// Include the event target (module path).
    pub with_target: bool,
    /// Colourise output.
    pub ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_owned(),
            respect_env: true,
            format: LogFormat::default(),
            with_target: false,
            ansi: true,
        }
    }
}

impl TelemetryConfig {
    /// Uses `filter` and ignores `RUST_LOG`, for explicit command-line overrides.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self.respect_env = false;
        self
    }

    /// Builds the filter this configuration selects.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::InvalidFilter`] when the configured directives
    /// do not parse.
    pub fn env_filter(&self) -> TelemetryResult<EnvFilter> {
        if self.respect_env {
            if let Ok(filter) = EnvFilter::try_from_default_env() {
                return Ok(filter);
            }
        }
        EnvFilter::try_new(&self.filter).map_err(|source| TelemetryError::InvalidFilter {
            filter: self.filter.clone(),
            source,
        })
    }
}

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directives are malformed.
    #[error("invalid log filter `{filter}`: {source}")]
    InvalidFilter {
        /// Rejected directives.
        filter: String,
        /// Parser error.
        #[source]
        source: ParseError,
    },
    /// A global subscriber is already installed.
    #[error("tracing subscriber already initialised: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// Result alias for telemetry setup.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Installs the global subscriber described by `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] for malformed directives and
/// [`TelemetryError::AlreadyInitialized`] when called twice in one process.
pub fn init_tracing(config: &TelemetryConfig) -> TelemetryResult<()> {
    let filter = config.env_filter()?;
    let layer = fmt::layer()
        .with_target(config.with_target)
        .with_ansi(config.ansi)
        .with_writer(std::io::stderr);

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Compact => registry.with(layer.compact()).try_init()?,
        LogFormat::Full => registry.with(layer).try_init()?,
        LogFormat::Pretty => registry.with(layer.pretty()).try_init()?,
    }
    tracing::debug!(filter = %config.filter, format = ?config.format, "tracing initialised");
    Ok(())
}

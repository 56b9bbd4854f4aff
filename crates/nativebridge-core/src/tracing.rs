//! Tracing setup for hosts embedding the bridge runtime.
//!
//! The runtime itself only emits `tracing` events; installing a subscriber is
//! left to the host. This module offers a ready-made one.
//!
//! ```ignore
//! use nativebridge_core::tracing::{init_tracing, TracingConfig};
//!
//! init_tracing(TracingConfig::embedded())?;
//! ```

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::fmt::{self, format::FmtSpan};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Errors that can occur while installing the subscriber.
#[derive(Debug, Error)]
pub enum TracingError {
    /// A global subscriber is already installed.
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// The filter directive does not parse.
    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human oriented.
    #[default]
    Pretty,
    /// One line per event.
    Compact,
    /// One JSON object per event, for log shippers.
    Json,
}

/// Subscriber configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level applied to `nativebridge*` targets when `RUST_LOG` is unset.
    pub default_level: Level,
    /// Output format.
    pub format: LogFormat,
    /// Include file and line of the call site.
    pub include_location: bool,
    /// Include timestamps (compact format only; the others always do).
    pub include_timestamp: bool,
    /// Emit span open/close events, which carry dispatch timings.
    pub include_span_events: bool,
    /// Explicit filter directive; takes precedence over `RUST_LOG`.
    pub env_filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            format: LogFormat::Pretty,
            include_location: false,
            include_timestamp: true,
            include_span_events: false,
            env_filter: None,
        }
    }
}

impl TracingConfig {
    /// Verbose single-line output for local debugging of a host app.
    #[must_use]
    pub fn verbose() -> Self {
        Self {
            default_level: Level::DEBUG,
            format: LogFormat::Compact,
            include_location: true,
            include_timestamp: false,
            ..Self::default()
        }
    }

    /// JSON output with span events, for a host process shipping logs.
    #[must_use]
    pub fn embedded() -> Self {
        Self {
            format: LogFormat::Json,
            include_location: true,
            include_span_events: true,
            ..Self::default()
        }
    }

    /// Builder: set the default level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// Builder: set the output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Builder: set an explicit filter directive.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    fn filter(&self) -> Result<EnvFilter, TracingError> {
        match &self.env_filter {
            Some(directive) => Ok(EnvFilter::try_new(directive)?),
            None => Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new(format!("nativebridge={}", self.default_level))
            })),
        }
    }

    fn span_events(&self) -> FmtSpan {
        if self.include_span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn output_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let location = self.include_location;
        match self.format {
            LogFormat::Pretty => fmt::layer()
                .pretty()
                .with_file(location)
                .with_line_number(location)
                .with_span_events(self.span_events())
                .boxed(),
            LogFormat::Compact if self.include_timestamp => fmt::layer()
                .compact()
                .with_file(location)
                .with_line_number(location)
                .with_span_events(self.span_events())
                .boxed(),
            LogFormat::Compact => fmt::layer()
                .compact()
                .without_time()
                .with_file(location)
                .with_line_number(location)
                .with_span_events(self.span_events())
                .boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_file(location)
                .with_line_number(location)
                .with_span_events(self.span_events())
                .boxed(),
        }
    }
}

/// Installs the global subscriber described by `config`.
///
/// # Errors
///
/// Fails if a global subscriber is already set or the filter directive is
/// invalid.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let filter = config.filter()?;
    let subscriber = tracing_subscriber::registry()
        .with(config.output_layer())
        .with(filter);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = TracingConfig::default();
        assert_eq!(config.default_level, Level::INFO);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(!config.include_span_events);
        assert!(config.env_filter.is_none());
    }

    #[test]
    fn presets() {
        let verbose = TracingConfig::verbose();
        assert_eq!(verbose.default_level, Level::DEBUG);
        assert_eq!(verbose.format, LogFormat::Compact);
        assert!(!verbose.include_timestamp);

        let embedded = TracingConfig::embedded();
        assert_eq!(embedded.format, LogFormat::Json);
        assert!(embedded.include_span_events);
    }

    #[test]
    fn explicit_filter_wins() {
        let config = TracingConfig::default().with_env_filter("nativebridge_runtime=trace");
        assert!(config.filter().is_ok());

        let config = TracingConfig::default().with_env_filter("nativebridge=loud");
        assert!(matches!(config.filter(), Err(TracingError::EnvFilter(_))));
    }
}

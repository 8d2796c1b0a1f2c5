//! Tracing setup shared by the server and the CLI.
//!
//! ```ignore
//! use calproxy_core::tracing::{init_tracing, TracingConfig};
//!
//! init_tracing(TracingConfig::server()).expect("failed to initialize tracing");
//! ```

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::fmt::{self, format::FmtSpan};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Target prefix matching every workspace crate (`calproxy_server`, ...).
const TARGET_PREFIX: &str = "calproxy";

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    /// Failed to set global subscriber
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// Failed to parse env filter directive
    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// Output format for tracing logs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    /// Human-readable multi-line format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
    /// One JSON object per line
    Json,
}

/// Configuration for tracing initialization
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level for workspace crates when `RUST_LOG` is not set
    pub default_level: Level,
    pub output_format: TracingOutputFormat,
    /// Include file/line information
    pub include_location: bool,
    /// Include the module path
    pub include_target: bool,
    pub include_timestamp: bool,
    /// Emit span open/close events
    pub include_span_events: bool,
    /// Custom env filter directive (overrides `default_level` and `RUST_LOG`)
    pub env_filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            output_format: TracingOutputFormat::Pretty,
            include_location: false,
            include_target: true,
            include_timestamp: true,
            include_span_events: false,
            env_filter: None,
        }
    }
}

impl TracingConfig {
    /// Terminal-friendly settings for the `calproxy` CLI.
    #[must_use]
    pub fn cli(debug: bool) -> Self {
        Self {
            default_level: if debug { Level::DEBUG } else { Level::WARN },
            output_format: TracingOutputFormat::Compact,
            include_location: debug,
            include_target: false,
            include_timestamp: false,
            include_span_events: false,
            env_filter: None,
        }
    }

    /// Settings for the HTTP backend.
    #[must_use]
    pub fn server() -> Self {
        Self {
            default_level: Level::INFO,
            output_format: TracingOutputFormat::Compact,
            include_location: false,
            include_target: true,
            include_timestamp: true,
            include_span_events: false,
            env_filter: None,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Directive used when neither `env_filter` nor `RUST_LOG` is set.
    pub fn default_directive(&self) -> String {
        format!("{}={}", TARGET_PREFIX, self.default_level)
    }
}

/// Initialize tracing with the given configuration.
///
/// Call once at startup. `RUST_LOG` overrides the default level.
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set or if
/// the env filter directive is invalid.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let env_filter = match config.env_filter.as_deref() {
        Some(directive) => EnvFilter::try_new(directive)?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.default_directive())),
    };

    let subscriber =
        tracing_subscriber::registry().with(output_layer(&config).with_filter(env_filter));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Builds the formatting layer for the configured output.
fn output_layer(config: &TracingConfig) -> BoxedLayer {
    let span_events = if config.include_span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let base = fmt::layer()
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_target(config.include_target)
        .with_span_events(span_events);

    match (config.output_format, config.include_timestamp) {
        (TracingOutputFormat::Json, _) => base.json().boxed(),
        (TracingOutputFormat::Pretty, true) => base.pretty().boxed(),
        (TracingOutputFormat::Pretty, false) => base.pretty().without_time().boxed(),
        (TracingOutputFormat::Compact, true) => base.compact().boxed(),
        (TracingOutputFormat::Compact, false) => base.compact().without_time().boxed(),
    }
}

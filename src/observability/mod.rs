//! Log subscriber setup for the binary
//!
//! The library only emits `tracing` events; this module installs the
//! subscriber that prints them. Output goes to stderr so stdout carries
//! nothing but JSON responses.
//!
//! `FORMCHECK_LOG` takes precedence over the configured level, e.g.
//! `FORMCHECK_LOG=formcheck=trace formcheck check < request.json`.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogFormat;

/// Environment variable overriding the configured filter
pub const LOG_ENV: &str = "FORMCHECK_LOG";

/// Builds the filter from `FORMCHECK_LOG`, falling back to `level`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level))
}

/// Installs the global subscriber. A second call is a no-op.
pub fn init(format: LogFormat, level: &str) {
    let builder = fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(true);

    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

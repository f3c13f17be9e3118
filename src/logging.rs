//! # Structured Logging
//!
//! Environment-aware tracing initialization for binaries and tests that
//! embed the core. Library code only emits `tracing` events; nothing in
//! the crate installs a subscriber implicitly.

use std::env;
use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging once per process.
///
/// Filter resolution order: `DAYFLOW_LOG_LEVEL`, then `RUST_LOG`, then an
/// environment default (`info` in production, `debug` elsewhere).
/// `DAYFLOW_LOG_FORMAT=json` switches to JSON output for log shippers.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = log_filter();
        let json = env::var("DAYFLOW_LOG_FORMAT")
            .map(|format| format == "json")
            .unwrap_or(false);

        let initialized = if json {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true)
                        .with_filter(EnvFilter::new(filter)),
                )
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_filter(EnvFilter::new(filter)),
                )
                .try_init()
        };

        // A subscriber may already be installed by the embedding process
        if initialized.is_err() {
            tracing::debug!("global tracing subscriber already initialized");
        }
    });
}

fn environment() -> String {
    env::var("DAYFLOW_ENV").unwrap_or_else(|_| "development".to_string())
}

fn log_filter() -> String {
    env::var("DAYFLOW_LOG_LEVEL")
        .or_else(|_| env::var("RUST_LOG"))
        .unwrap_or_else(|_| {
            match environment().as_str() {
                "production" => "info",
                _ => "debug",
            }
            .to_string()
        })
}

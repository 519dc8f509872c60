//! Tracing initialization.
//!
//! Output goes to stderr; stdout carries the MCP protocol.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Filter override read before `RUST_LOG`.
pub const LOG_ENV: &str = "FASTENER_SEARCH_LOG";

static INIT: Once = Once::new();

fn filter(default_level: tracing::Level) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str()))
}

/// Initialize tracing. Safe to call multiple times.
pub fn init() {
    INIT.call_once(|| {
        let is_test =
            std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok();
        let level = if is_test {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter(level))
            .with_ansi(false)
            .with_target(true)
            .compact();

        let result = if is_test {
            builder.with_test_writer().try_init()
        } else {
            builder.with_writer(std::io::stderr).try_init()
        };
        if let Err(e) = result {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });
}

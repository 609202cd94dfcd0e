//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Map the configured level and the verbose flag to a filter
//!
//! # Design Decisions
//! - `RUST_LOG` always wins over configuration
//! - Verbose forces `debug` for this crate and the HTTP middleware

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for the given level.
pub fn default_directive(log_level: &str, verbose: bool) -> String {
    let level = if verbose { "debug" } else { log_level };
    format!("ghproxy={level},tower_http={level}")
}

/// Install the global subscriber.
pub fn init(log_level: &str, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(log_level, verbose).into());

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

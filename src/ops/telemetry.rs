// * Telemetry - structured logging
// * Every initializer reads RUST_LOG first and writes to stderr, leaving stdout to the menus.

use std::io;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_filter_or(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initializes JSON logging (for unattended runs)
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(env_filter_or("info"))
        .with(fmt::layer().json().with_writer(io::stderr))
        .init();
}

/// Initializes compact logging with a custom fallback level
pub fn init_tracing_with_level(level: &str) {
    tracing_subscriber::registry()
        .with(env_filter_or(level))
        .with(fmt::layer().compact().with_target(false).with_writer(io::stderr))
        .init();
}

/// Initializes tracing with pretty formatting (for development)
pub fn init_tracing_pretty() {
    tracing_subscriber::registry()
        .with(env_filter_or("debug"))
        .with(fmt::layer().pretty().with_writer(io::stderr))
        .init();
}

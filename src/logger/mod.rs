//! Logger module
//!
//! Provides logging utilities for the router including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Dispatch, error and warning logging
//!
//! Events go through `tracing`; `init` installs the subscriber.

mod format;

pub use format::{AccessLogEntry, AccessLogFormat};

use crate::config::{Config, LoggingConfig};
use hyper::Method;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber
///
/// `RUST_LOG` takes precedence over `logging.level`. Should be called once at
/// application startup.
pub fn init(config: &LoggingConfig) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| format!("Invalid log level '{}': {e}", config.level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| format!("Failed to install logger: {e}"))
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("======================================");
    tracing::info!("Router started");
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Routes: {}", config.routes.len());
    for route in &config.routes {
        tracing::info!("  - {}", route.pattern());
    }
    tracing::info!(
        "Debug: {}, append slashes: {}",
        config.router.debug,
        config.router.append_slashes
    );
    tracing::info!("======================================");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_redirect(from: &str, to: &str) {
    tracing::debug!("Redirecting {from} -> {to}");
}

pub fn log_handler_failure(method: &Method, path: &str, message: &str) {
    tracing::error!("Handler failed for {method} {path}: {message}");
}

pub fn log_shutdown() {
    tracing::info!("Shutdown signal received, no longer accepting connections");
}

pub fn log_debug(message: &str) {
    tracing::debug!("{message}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: AccessLogFormat) {
    tracing::info!(target: "access", "{}", entry.format(format));
}

//! Logger module
//!
//! Installs the `tracing` subscriber and provides logging helpers for the
//! reference host:
//! - Server lifecycle logging
//! - Access logging with the freshness outcome of each request
//! - Error and warning logging

mod access;

pub use access::AccessLogEntry;

use crate::config::{Config, LogFormat, LoggingConfig};
use std::net::SocketAddr;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber
///
/// `RUST_LOG` takes precedence over `logging.level`. Should be called once
/// at application startup.
pub fn init(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match config.format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    info!(
        %addr,
        workers = ?config.server.workers,
        routes = config.routes.len(),
        cache_rules = config.cache.rules.len(),
        "server started"
    );
    for route in &config.routes {
        info!(
            route = %route.name,
            prefix = %route.prefix,
            dir = %route.dir,
            expires = ?route.expires,
            etag = %route.etag,
            "route registered"
        );
    }
}

pub fn log_shutdown() {
    info!("shutdown requested, no longer accepting connections");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    error!(error = ?err, "failed to serve connection");
}

pub fn log_error(message: &str) {
    error!("{message}");
}

pub fn log_warning(message: &str) {
    warn!("{message}");
}

/// Log one finished request
pub fn log_access(entry: &AccessLogEntry) {
    info!(
        target: "access",
        remote_addr = %entry.remote_addr,
        method = %entry.method,
        path = %entry.path,
        route = entry.route.as_deref().unwrap_or("-"),
        status = entry.status,
        body_bytes = entry.body_bytes,
        outcome = entry.outcome_str(),
        request_time_us = entry.request_time_us,
        "{}",
        entry.common_line()
    );
}

//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Subscriber setup (stdout or file)
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

use hyper::Version;

use crate::config::{Config, LoggingConfig};
use crate::relay::GfRelay;
use crate::script::DEFAULT_SERVICE;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    writer::init(&config.level, config.log_file.as_deref())
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, relay: &GfRelay) {
    tracing::info!("[VPNet] Server: listening at {}", relay.host());
    tracing::info!("Bound to: {addr}");
    tracing::info!("Relay: {} -> {}", relay.prefix(), relay.upstream());
    tracing::info!("ss: {}", relay.url(DEFAULT_SERVICE));
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    if let Some(max) = config.performance.max_connections {
        tracing::info!("Max connections: {max}");
    }
    if let Some(ref path) = config.logging.log_file {
        tracing::info!("Log file: {path}");
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}

pub fn log_shutdown(active: usize) {
    tracing::info!("Shutdown requested, waiting for {active} active connection(s)");
}

/// Version as written in access logs (`1.1`, `2`)
pub const fn http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

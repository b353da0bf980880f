// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::collections::HashMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub relay: RelayConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Address or hostname clients use to reach this service
    pub ip: String,
    pub port: u16,
    /// Listen address override (defaults to `ip` when it is a literal address)
    #[serde(default)]
    pub bind: Option<String>,
    pub workers: Option<usize>,
}

/// gf-relay configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RelayConfig {
    /// Mount prefix, must begin and end with `/`
    pub prefix: String,
    /// Upstream base URL (e.g. `http://127.0.0.1:10080`)
    pub upstream: String,
    /// Seconds to wait for upstream response headers (0 disables)
    pub timeout: u64,
    /// Logical service name -> sub-path below the prefix
    #[serde(default)]
    pub services: HashMap<String, String>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Log file path (optional, stdout if not set)
    #[serde(default)]
    pub log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Seconds allowed for reading request headers (0 disables)
    pub header_read_timeout: u64,
    pub max_connections: Option<u64>,
}

// Configuration module entry point
// Loads, validates and exposes the immutable process configuration

mod error;
mod state;
mod types;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use hyper::Uri;

// Re-export public types
pub use error::ConfigError;
pub use state::AppState;
pub use types::{Config, LoggingConfig, RelayConfig};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "vpnet";

impl Config {
    /// Load configuration from specified file path (extension optional)
    /// A missing file is not an error; defaults and `VPNET_<SECTION>__<KEY>`
    /// variables still apply, variables taking precedence over the file
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("VPNET")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.ip", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("relay.prefix", "/gf-relay/")?
            .set_default("relay.upstream", "http://127.0.0.1:10080")?
            .set_default("relay.timeout", 30)?
            .set_default("relay.services.shadowsocks", "shadowsocks")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.header_read_timeout", 30)?
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.ip.trim().is_empty() {
            return Err(ConfigError::EmptyIp);
        }
        if self.server.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        let prefix = &self.relay.prefix;
        if prefix.len() < 2 || !prefix.starts_with('/') || !prefix.ends_with('/') {
            return Err(ConfigError::InvalidPrefix(prefix.clone()));
        }

        let upstream = self
            .relay
            .upstream
            .parse::<Uri>()
            .map_err(|_| ConfigError::InvalidUpstream(self.relay.upstream.clone()))?;
        if upstream.scheme_str() != Some("http") || upstream.authority().is_none() {
            return Err(ConfigError::InvalidUpstream(self.relay.upstream.clone()));
        }

        self.get_socket_addr().map(|_| ())
    }

    /// Advertised address of this service
    pub fn ip(&self) -> &str {
        &self.server.ip
    }

    /// Advertised port of this service
    pub const fn port(&self) -> u16 {
        self.server.port
    }

    /// `ip:port` as it appears in URLs handed to clients
    pub fn host(&self) -> String {
        match self.ip().parse::<IpAddr>() {
            Ok(IpAddr::V6(v6)) => format!("[{v6}]:{}", self.port()),
            _ => format!("{}:{}", self.ip(), self.port()),
        }
    }

    /// Address the listener binds to
    ///
    /// Uses `server.bind` when set, otherwise `server.ip` if it is a literal
    /// address, otherwise all interfaces.
    pub fn get_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = match &self.server.bind {
            Some(bind) => bind
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidBind(bind.clone()))?,
            None => self
                .server
                .ip
                .parse::<IpAddr>()
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
        };
        Ok(SocketAddr::new(ip, self.server.port))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use super::types::{PerformanceConfig, ServerConfig};
    use std::collections::HashMap;
    use std::io::Write;

    /// Configuration used across unit tests
    pub fn test_config(ip: &str, port: u16, upstream: &str) -> Config {
        Config {
            server: ServerConfig {
                ip: ip.to_string(),
                port,
                bind: None,
                workers: None,
            },
            relay: RelayConfig {
                prefix: "/gf-relay/".to_string(),
                upstream: upstream.to_string(),
                timeout: 5,
                services: HashMap::from([(
                    "shadowsocks".to_string(),
                    "shadowsocks".to_string(),
                )]),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: false,
                access_log_format: "combined".to_string(),
                log_file: None,
            },
            performance: PerformanceConfig {
                keep_alive: true,
                header_read_timeout: 30,
                max_connections: None,
            },
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[server]
ip = "10.1.2.3"
port = 9000

[relay]
prefix = "/relay/"
upstream = "http://10.1.2.4:8388/ws"

[relay.services]
v2ray = "v2"
"#
        )
        .unwrap();

        let config = Config::load_from(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.ip(), "10.1.2.3");
        assert_eq!(config.port(), 9000);
        assert_eq!(config.relay.prefix, "/relay/");
        assert_eq!(config.relay.upstream, "http://10.1.2.4:8388/ws");
        assert_eq!(config.relay.services.get("v2ray").unwrap(), "v2");
        // Defaults fill whatever the file leaves out
        assert_eq!(config.relay.timeout, 30);
        assert_eq!(config.logging.access_log_format, "combined");
    }

    #[test]
    fn test_env_overrides_file_and_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "[server]\nworkers = 2").unwrap();

        // Keys no other test asserts on, since the environment is process-wide
        std::env::set_var("VPNET_SERVER__WORKERS", "6");
        std::env::set_var("VPNET_PERFORMANCE__MAX_CONNECTIONS", "77");
        let result = Config::load_from(file.path().to_str().unwrap());
        std::env::remove_var("VPNET_SERVER__WORKERS");
        std::env::remove_var("VPNET_PERFORMANCE__MAX_CONNECTIONS");

        let config = result.unwrap();
        assert_eq!(config.server.workers, Some(6));
        assert_eq!(config.performance.max_connections, Some(77));
        assert_eq!(config.port(), 8080);
    }

    #[test]
    fn test_load_rejects_bad_prefix() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "[relay]\nprefix = \"/gf-relay\"").unwrap();

        let err = Config::load_from(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPrefix(_)));
    }

    #[test]
    fn test_validate_port_and_ip() {
        let mut config = test_config("127.0.0.1", 8080, "http://127.0.0.1:10080");
        assert!(config.validate().is_ok());

        config.server.port = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPort)));

        config.server.port = 8080;
        config.server.ip = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyIp)));
    }

    #[test]
    fn test_validate_upstream() {
        for bad in ["ftp://relay:21", "/just/a/path", "not a url", "https://relay"] {
            let config = test_config("127.0.0.1", 8080, bad);
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidUpstream(_))),
                "expected {bad} to be rejected"
            );
        }
    }

    #[test]
    fn test_socket_addr_fallbacks() {
        let config = test_config("127.0.0.1", 8080, "http://127.0.0.1:10080");
        assert_eq!(config.get_socket_addr().unwrap().to_string(), "127.0.0.1:8080");

        let config = test_config("vpnet.example.com", 8080, "http://127.0.0.1:10080");
        assert_eq!(config.get_socket_addr().unwrap().to_string(), "0.0.0.0:8080");

        let mut config = test_config("vpnet.example.com", 8080, "http://127.0.0.1:10080");
        config.server.bind = Some("not-an-ip".to_string());
        assert!(matches!(
            config.get_socket_addr(),
            Err(ConfigError::InvalidBind(_))
        ));
    }

    #[test]
    fn test_host_formatting() {
        let config = test_config("127.0.0.1", 8080, "http://127.0.0.1:10080");
        assert_eq!(config.host(), "127.0.0.1:8080");

        let config = test_config("::1", 8080, "http://127.0.0.1:10080");
        assert_eq!(config.host(), "[::1]:8080");
    }
}

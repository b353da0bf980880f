//! Configuration error types.

use thiserror::Error;

/// Errors raised while loading or validating configuration.
///
/// All of these are fatal: the server refuses to start listening.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Source could not be read or deserialized.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// `server.ip` is empty.
    #[error("server.ip must not be empty")]
    EmptyIp,

    /// `server.port` is zero.
    #[error("server.port must be in 1..=65535")]
    InvalidPort,

    /// `server.bind` (or the derived listen address) does not parse.
    #[error("Invalid listen address '{0}'")]
    InvalidBind(String),

    /// `relay.prefix` does not begin and end with `/`.
    #[error("relay.prefix '{0}' must begin and end with '/'")]
    InvalidPrefix(String),

    /// `relay.upstream` is not an absolute http URL.
    #[error("relay.upstream '{0}' must be an absolute http:// URL")]
    InvalidUpstream(String),
}

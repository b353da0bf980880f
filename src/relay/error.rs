//! Error types for relay operations.

use std::time::Duration;

use hyper::StatusCode;
use thiserror::Error;

/// Unified error type for relay operations.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Upstream base URL is unusable.
    #[error("Invalid relay upstream '{0}'")]
    InvalidUpstream(String),

    /// Rewritten request URI could not be built.
    #[error("Failed to build upstream URI: {0}")]
    InvalidUri(#[from] hyper::http::Error),

    /// Could not open a connection to the upstream.
    #[error("Failed to connect to upstream '{addr}': {message}")]
    UpstreamConnect {
        /// The upstream we tried to reach.
        addr: String,
        /// Error message.
        message: String,
    },

    /// Connection was made but the exchange failed.
    #[error("Upstream '{addr}' request failed: {message}")]
    Upstream {
        /// The upstream we tried to reach.
        addr: String,
        /// Error message.
        message: String,
    },

    /// No response headers within the configured timeout.
    #[error("Upstream '{addr}' did not respond within {}s", .timeout.as_secs())]
    Timeout {
        /// The upstream we tried to reach.
        addr: String,
        /// Configured timeout.
        timeout: Duration,
    },
}

impl RelayError {
    /// Classify a client error by whether the connection was ever established
    pub fn from_client(addr: &str, err: &hyper_util::client::legacy::Error) -> Self {
        let message = match std::error::Error::source(err) {
            Some(source) => format!("{err}: {source}"),
            None => err.to_string(),
        };
        if err.is_connect() {
            Self::UpstreamConnect {
                addr: addr.to_string(),
                message,
            }
        } else {
            Self::Upstream {
                addr: addr.to_string(),
                message,
            }
        }
    }

    /// Gateway-class status reported to the client
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}

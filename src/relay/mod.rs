//! gf-relay module
//!
//! Binds this service's public `host` and a mount `prefix` to an upstream
//! relay. [`GfRelay::router`] yields the handler mounted at the prefix and
//! [`GfRelay::url`] builds the public URL of a named relay service.

mod error;
mod proxy;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use hyper::Uri;
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioTimer};

use crate::config::RelayConfig;
use proxy::RelayTarget;

pub use error::RelayError;
pub use proxy::RelayRouter;

/// Relay binding, constructed once at startup
pub struct GfRelay {
    target: Arc<RelayTarget>,
    /// Logical service name -> sub-path below the prefix
    services: HashMap<String, String>,
}

impl GfRelay {
    pub fn new(
        host: impl Into<String>,
        prefix: impl Into<String>,
        config: &RelayConfig,
    ) -> Result<Self, RelayError> {
        let upstream = config
            .upstream
            .parse::<Uri>()
            .map_err(|_| RelayError::InvalidUpstream(config.upstream.clone()))?;
        let parts = upstream.into_parts();
        let (Some(scheme), Some(authority)) = (parts.scheme, parts.authority) else {
            return Err(RelayError::InvalidUpstream(config.upstream.clone()));
        };
        let base_path = parts
            .path_and_query
            .map(|pq| pq.path().trim_end_matches('/').to_string())
            .unwrap_or_default();

        let client = Client::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .build_http();

        let target = RelayTarget {
            host: host.into(),
            prefix: prefix.into(),
            scheme,
            authority,
            base_path,
            timeout: (config.timeout > 0).then(|| Duration::from_secs(config.timeout)),
            client,
        };

        Ok(Self {
            target: Arc::new(target),
            services: config.services.clone(),
        })
    }

    /// `ip:port` of this service
    pub fn host(&self) -> &str {
        &self.target.host
    }

    pub fn prefix(&self) -> &str {
        &self.target.prefix
    }

    /// Upstream base URL relayed traffic is sent to
    pub fn upstream(&self) -> String {
        format!(
            "{}://{}{}",
            self.target.scheme, self.target.authority, self.target.base_path
        )
    }

    /// Handler to mount at [`Self::prefix`]
    pub fn router(&self) -> RelayRouter {
        RelayRouter::new(Arc::clone(&self.target))
    }

    /// Public URL clients use to reach the relay service `name`
    ///
    /// Names missing from the service table map to themselves.
    pub fn url(&self, name: &str) -> String {
        let sub_path = self.services.get(name).map_or(name, String::as_str);
        format!(
            "http://{}{}{}",
            self.target.host,
            self.target.prefix,
            sub_path.trim_start_matches('/')
        )
    }
}

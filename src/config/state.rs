// Application state module
// Everything a request handler needs, built once at startup

use super::types::Config;
use crate::relay::{GfRelay, RelayError};
use crate::routing::{self, Route};

/// Application state
pub struct AppState {
    pub config: Config,
    pub relay: GfRelay,
    /// Ordered route table, first match wins
    pub routes: Vec<Route>,
}

impl AppState {
    /// Build the relay binding and route table from validated configuration
    pub fn new(config: Config) -> Result<Self, RelayError> {
        let relay = GfRelay::new(config.host(), config.relay.prefix.clone(), &config.relay)?;
        let routes = routing::build_routes(&relay);

        Ok(Self {
            config,
            relay,
            routes,
        })
    }
}

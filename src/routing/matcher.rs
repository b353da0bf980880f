//! Route matching module
//!
//! Exact, prefix and template (`/setup.sh/:uuid`) path matching over an
//! ordered route table.

use hyper::Method;
use percent_encoding::percent_decode_str;

use crate::relay::RelayRouter;

/// Route - matches requests and dispatches to an action
pub struct Route {
    /// Route name for logging
    pub name: &'static str,
    pub match_rule: PathMatch,
    /// Allowed methods; `None` accepts any method
    pub methods: Option<Vec<Method>>,
    pub action: RouteAction,
}

/// Path matching conditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatch {
    /// Whole path must be equal
    Exact(String),
    /// Mount point: matches the prefix itself, everything below it,
    /// and the prefix without its trailing slash
    Prefix(String),
    /// Segment pattern; `:name` segments capture one path segment
    Template(String),
}

/// Route action - what to do when a route matches
pub enum RouteAction {
    /// One-line connect command
    Info,
    /// Per-identity setup script
    SetupScript,
    /// Forward to the relay upstream
    Relay(RelayRouter),
}

/// Captured template parameters, in pattern order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Find the first matching route for a given path
pub fn match_route<'a>(path: &str, routes: &'a [Route]) -> Option<(&'a Route, Params)> {
    routes
        .iter()
        .find_map(|route| match_path(&route.match_rule, path).map(|params| (route, params)))
}

/// Check if a path matches a rule, returning captured parameters
pub fn match_path(rule: &PathMatch, path: &str) -> Option<Params> {
    match rule {
        PathMatch::Exact(exact) => (path == exact).then(Params::default),
        PathMatch::Prefix(prefix) => strip_mount(path, prefix).map(|_| Params::default()),
        PathMatch::Template(pattern) => match_template(pattern, path),
    }
}

/// Path remainder below a mount prefix (`/gf-relay/` style)
///
/// `/gf-relay` (no trailing slash) maps to an empty remainder.
pub fn strip_mount<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    if let Some(rest) = path.strip_prefix(prefix) {
        return Some(rest);
    }
    let bare = prefix.trim_end_matches('/');
    (!bare.is_empty() && path == bare).then_some("")
}

/// Segment-wise template match; captured segments are percent-decoded
///
/// A single trailing slash after the last segment is accepted.
fn match_template(pattern: &str, path: &str) -> Option<Params> {
    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');
    let mut params = Vec::new();

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return Some(Params(params)),
            (None, Some("")) if path_segments.next().is_none() => return Some(Params(params)),
            (Some(expected), Some(actual)) => {
                if let Some(name) = expected.strip_prefix(':') {
                    let value = percent_decode_str(actual).decode_utf8_lossy();
                    params.push((name.to_string(), value.into_owned()));
                } else if expected != actual {
                    return None;
                }
            }
            _ => return None,
        }
    }
}

//! Request forwarding for the gf-relay mount.
//!
//! Requests under the prefix are rewritten onto the upstream base URL and
//! sent through a pooled `hyper-util` client. Bodies are streamed in both
//! directions; only hop-by-hop headers are touched.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http_body_util::BodyExt;
use hyper::header::{HeaderMap, HeaderName, HeaderValue, CONNECTION, HOST};
use hyper::http::uri::{Authority, Scheme};
use hyper::{Request, Response, Uri, Version};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;

use super::error::RelayError;
use crate::http::{build_gateway_error_response, RequestBody, ResponseBody};
use crate::routing::strip_mount;

/// Headers that describe a single connection and must not be forwarded
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_FORWARDED_HOST: &str = "x-forwarded-host";
const X_FORWARDED_PREFIX: &str = "x-forwarded-prefix";

/// Where relayed traffic goes and how to get there
pub(super) struct RelayTarget {
    /// `ip:port` of this service
    pub host: String,
    pub prefix: String,
    pub scheme: Scheme,
    pub authority: Authority,
    /// Upstream base path without trailing slash
    pub base_path: String,
    pub timeout: Option<Duration>,
    pub client: Client<HttpConnector, RequestBody>,
}

/// Request handler mounted at the relay prefix
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct RelayRouter {
    target: Arc<RelayTarget>,
}

impl RelayRouter {
    pub(super) const fn new(target: Arc<RelayTarget>) -> Self {
        Self { target }
    }

    /// Mount prefix this handler expects
    pub fn prefix(&self) -> &str {
        &self.target.prefix
    }

    /// Forward a request and stream the upstream response back
    ///
    /// Upstream failures become 502/504 responses; this never errors.
    pub async fn forward(
        &self,
        req: Request<RequestBody>,
        client_addr: Option<SocketAddr>,
    ) -> Response<ResponseBody> {
        match self.try_forward(req, client_addr).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(
                    upstream = %self.target.authority,
                    status = err.status().as_u16(),
                    "relay request failed: {err}"
                );
                build_gateway_error_response(err.status(), &err.to_string())
            }
        }
    }

    async fn try_forward(
        &self,
        req: Request<RequestBody>,
        client_addr: Option<SocketAddr>,
    ) -> Result<Response<ResponseBody>, RelayError> {
        let target = &self.target;
        let (mut parts, body) = req.into_parts();

        let uri = rewrite_uri(target, &parts.uri)?;
        tracing::debug!(method = %parts.method, from = %parts.uri, to = %uri, "relaying request");

        strip_hop_by_hop(&mut parts.headers);
        self.add_forwarding_headers(&mut parts.headers, client_addr);
        parts.uri = uri;
        parts.version = Version::HTTP_11;

        let upstream_addr = target.authority.as_str();
        let pending = target.client.request(Request::from_parts(parts, body));
        let result = match target.timeout {
            Some(timeout) => tokio::time::timeout(timeout, pending)
                .await
                .map_err(|_| RelayError::Timeout {
                    addr: upstream_addr.to_string(),
                    timeout,
                })?,
            None => pending.await,
        };
        let response = result.map_err(|e| RelayError::from_client(upstream_addr, &e))?;

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        Ok(Response::from_parts(parts, body.boxed()))
    }

    fn add_forwarding_headers(&self, headers: &mut HeaderMap, client_addr: Option<SocketAddr>) {
        let target = &self.target;

        if let Ok(value) = HeaderValue::from_str(target.authority.as_str()) {
            headers.insert(HOST, value);
        }
        if let Ok(value) = HeaderValue::from_str(&target.host) {
            headers.insert(X_FORWARDED_HOST, value);
        }
        if let Ok(value) = HeaderValue::from_str(&target.prefix) {
            headers.insert(X_FORWARDED_PREFIX, value);
        }

        if let Some(addr) = client_addr {
            let client_ip = addr.ip().to_string();
            let mut chain: Vec<&str> = headers
                .get_all(X_FORWARDED_FOR)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .collect();
            chain.push(&client_ip);
            let forwarded_for = chain.join(", ");
            if let Ok(value) = HeaderValue::from_str(&forwarded_for) {
                headers.insert(X_FORWARDED_FOR, value);
            }
        }
    }
}

/// Map `<prefix><rest>?<query>` onto `<upstream base>/<rest>?<query>`
pub(super) fn rewrite_uri(target: &RelayTarget, uri: &Uri) -> Result<Uri, RelayError> {
    let path = uri.path();
    let rest = strip_mount(path, &target.prefix).unwrap_or_else(|| path.trim_start_matches('/'));

    let mut path_and_query = format!("{}/{rest}", target.base_path);
    if let Some(query) = uri.query() {
        path_and_query.push('?');
        path_and_query.push_str(query);
    }

    Ok(Uri::builder()
        .scheme(target.scheme.clone())
        .authority(target.authority.clone())
        .path_and_query(path_and_query)
        .build()?)
}

/// Remove hop-by-hop headers, including any listed in `Connection`
fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

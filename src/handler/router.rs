//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for route matching,
//! method checks, dispatching and access logging.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::BodyExt;
use hyper::body::{Body, Incoming};
use hyper::header::{HeaderName, CONTENT_LENGTH, REFERER, USER_AGENT};
use hyper::{Method, Request, Response};

use super::info;
use crate::config::AppState;
use crate::http::{self, RequestBody, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use crate::routing::{self, RouteAction};
use crate::script::{GfWrt, SetupScript};

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let req = req.map(|body| body.boxed());

    let entry = state
        .config
        .logging
        .access_log
        .then(|| access_entry(&req, peer_addr));

    let response = route_request(req, &state, Some(peer_addr)).await;

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response_size(&response);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on path and the state's route table
pub async fn route_request(
    req: Request<RequestBody>,
    state: &AppState,
    client_addr: Option<SocketAddr>,
) -> Response<ResponseBody> {
    let Some((route, params)) = routing::match_route(req.uri().path(), &state.routes) else {
        return http::build_404_response();
    };

    let method = req.method();
    if let Some(methods) = &route.methods {
        let allowed = methods.contains(method)
            || (*method == Method::HEAD && methods.contains(&Method::GET));
        if !allowed {
            logger::log_warning(&format!(
                "Method not allowed: {method} {} (route {})",
                req.uri().path(),
                route.name
            ));
            return http::build_405_response(&allow_header(methods));
        }
    }
    let is_head = *method == Method::HEAD;

    match &route.action {
        RouteAction::Info => http::build_text_response(info::connect_command(&state.config), is_head),
        RouteAction::SetupScript => {
            let gfwrt = GfWrt::new(params.get("uuid").unwrap_or_default());
            let script = SetupScript::new(&gfwrt, &state.config, &state.relay).generate();
            tracing::debug!(uuid = gfwrt.uuid(), "generated setup script");
            http::build_text_response(script, is_head)
        }
        RouteAction::Relay(router) => router.forward(req, client_addr).await,
    }
}

/// `Allow` header value for a method list (GET implies HEAD)
fn allow_header(methods: &[Method]) -> String {
    let mut names: Vec<&str> = methods.iter().map(Method::as_str).collect();
    if methods.contains(&Method::GET) && !methods.contains(&Method::HEAD) {
        names.push("HEAD");
    }
    names.join(", ")
}

/// Capture the request side of an access log line
fn access_entry(req: &Request<RequestBody>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = logger::http_version(req.version()).to_string();
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry
}

/// Body size for logging: exact when known, else the declared length
fn response_size(response: &Response<ResponseBody>) -> usize {
    response
        .body()
        .size_hint()
        .exact()
        .or_else(|| {
            response
                .headers()
                .get(CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
        })
        .and_then(|size| usize::try_from(size).ok())
        .unwrap_or(0)
}

//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for title
//! extraction, method validation and dispatching to the page handlers.

use crate::config::AppState;
use crate::handler::{pages, static_files};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::{self, RouteKind};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, SERVER};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

const READ_METHODS: &str = "GET, HEAD, OPTIONS";
const WRITE_METHODS: &str = "POST, OPTIONS";

/// Request context encapsulating information needed for request processing
pub struct RequestContext {
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let mut entry = state
        .config
        .logging
        .access_log
        .then(|| access_entry(&req, remote_addr));

    let mut response = route_request(req, &state).await;
    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if let Some(ref mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
            .unwrap_or(usize::MAX);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on path and method
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let path = req.uri().path().to_string();
    let ctx = RequestContext {
        is_head: req.method() == Method::HEAD,
        if_none_match: header_string(&req, "if-none-match"),
    };

    // Not-found route takes priority over page titles
    if path == state.config.routes.not_found_path {
        return match check_http_method(req.method(), READ_METHODS) {
            Some(resp) => resp,
            None => pages::not_found(&ctx, state),
        };
    }

    let route = match routing::extract(&path) {
        Ok(route) => route,
        Err(e) => {
            log::debug!("[Route] Rejected: {e}");
            return http::build_404_response();
        }
    };

    let allowed = match route.kind {
        RouteKind::Save => WRITE_METHODS,
        RouteKind::View | RouteKind::Edit | RouteKind::Static => READ_METHODS,
    };
    if let Some(resp) = check_http_method(req.method(), allowed) {
        return resp;
    }

    match route.kind {
        RouteKind::View => pages::view(&ctx, state, &route.title).await,
        RouteKind::Edit => pages::edit(&ctx, state, &route.title).await,
        RouteKind::Static => {
            static_files::serve(&ctx, &state.config.routes.static_dir, &route.title).await
        }
        RouteKind::Save => {
            let max_body_size = state.config.http.max_body_size;
            if let Some(resp) = check_body_size(&req, max_body_size) {
                return resp;
            }
            match read_body(req, max_body_size).await {
                Ok(form) => pages::save(state, &route.title, &form).await,
                Err(resp) => resp,
            }
        }
    }
}

/// Check HTTP method against the route's allowed set
///
/// OPTIONS is answered directly; a method outside `allowed` gets 405.
fn check_http_method(method: &Method, allowed: &str) -> Option<Response<Full<Bytes>>> {
    if method == Method::OPTIONS {
        return Some(http::build_options_response(allowed));
    }
    let permitted = allowed.split(", ").any(|m| m == method.as_str());
    if permitted {
        None
    } else {
        logger::log_warning(&format!("Method not allowed: {method}"));
        Some(http::build_405_response(allowed))
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Collect the request body, enforcing the size limit while streaming
async fn read_body<B>(req: Request<B>, max_body_size: u64) -> Result<Bytes, Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => {
            logger::log_error(&format!("Request body exceeded {max_body_size} bytes"));
            Err(http::build_413_response())
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Err(http::build_400_response("unreadable body"))
        }
    }
}

fn header_string<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn access_entry<B>(req: &Request<B>, remote_addr: SocketAddr) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        remote_addr.to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.referer = header_string(req, "referer");
    entry.user_agent = header_string(req, "user-agent");
    entry
}

fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_09 {
        "0.9"
    } else if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else if version == Version::HTTP_3 {
        "3"
    } else {
        "1.1"
    }
}

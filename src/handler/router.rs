//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for body limits, route
//! matching, method validation and access logging.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, HeaderName, CONTENT_LENGTH, REFERER, USER_AGENT};
use hyper::{Method, Request, Response, Version};

use super::status::{self, STATUS_PATH};
use super::venn::{self, VENN_PATH};
use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};

const ALLOW_ANY: &str = "GET, HEAD, OPTIONS, POST";

/// The service's fixed routes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Status,
    Venn,
}

impl Endpoint {
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            STATUS_PATH => Some(Self::Status),
            VENN_PATH => Some(Self::Venn),
            _ => None,
        }
    }

    /// Value of the `Allow` header for this route
    pub const fn allow(self) -> &'static str {
        match self {
            Self::Status => "GET, HEAD, OPTIONS",
            Self::Venn => "OPTIONS, POST",
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    let entry = state.access_log.is_some().then(|| access_entry(&parts, peer_addr));

    let mut response = match check_body_size(&parts.headers, state.config.http.max_body_size) {
        Some(resp) => resp,
        None => match read_body(&parts.method, body).await {
            Ok(body) => route(&parts.method, parts.uri.path(), &body, &state).await,
            Err(message) => {
                logger::log_error(&message);
                http::build_error_response(&message)
            }
        },
    };

    http::apply_common_headers(&mut response, &state.config.http);

    if let (Some(mut entry), Some(format)) = (entry, state.access_log.as_ref()) {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, format);
    }

    Ok(response)
}

/// Dispatch a request whose body has been read in full
pub async fn route(
    method: &Method,
    path: &str,
    body: &[u8],
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    let Some(endpoint) = Endpoint::from_path(path) else {
        if *method == Method::OPTIONS && path == "*" {
            return http::build_options_response(ALLOW_ANY, state.config.http.enable_cors);
        }
        return http::build_404_response();
    };

    match (endpoint, method) {
        (_, &Method::OPTIONS) => {
            http::build_options_response(endpoint.allow(), state.config.http.enable_cors)
        }
        (Endpoint::Status, &Method::GET | &Method::HEAD) => {
            status::handle_status(*method == Method::HEAD)
        }
        (Endpoint::Venn, &Method::POST) => venn::handle_venn(body, state).await,
        _ => {
            logger::log_warning(&format!("Method not allowed: {method} {path}"));
            http::build_405_response(endpoint.allow())
        }
    }
}

/// Only diagram requests carry a body; other methods skip reading it
async fn read_body<B>(method: &Method, body: B) -> Result<Bytes, String>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    if *method != Method::POST {
        return Ok(Bytes::new());
    }
    body.collect()
        .await
        .map(|collected| collected.to_bytes())
        .map_err(|e| format!("Failed to read request body: {e}"))
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: Option<u64>) -> Option<Response<Full<Bytes>>> {
    let max_body_size = max_body_size?;
    let content_length = headers.get(CONTENT_LENGTH)?;
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

fn access_entry(parts: &hyper::http::request::Parts, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = match parts.version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_matching() {
        assert_eq!(Endpoint::from_path("/"), Some(Endpoint::Status));
        assert_eq!(Endpoint::from_path("/stakeholder-venn"), Some(Endpoint::Venn));
        assert_eq!(Endpoint::from_path("/stakeholder-venn/"), None);
        assert_eq!(Endpoint::from_path("/index.html"), None);
        assert_eq!(Endpoint::Venn.allow(), "OPTIONS, POST");
    }

    #[test]
    fn test_body_size_limit() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, "2048".parse().unwrap());
        assert!(check_body_size(&headers, None).is_none());
        assert!(check_body_size(&headers, Some(4096)).is_none());
        let resp = check_body_size(&headers, Some(1024)).unwrap();
        assert_eq!(resp.status(), hyper::StatusCode::PAYLOAD_TOO_LARGE);

        headers.insert(CONTENT_LENGTH, "abc".parse().unwrap());
        assert!(check_body_size(&headers, Some(1024)).is_none());
    }

    #[test]
    fn test_access_entry_fields() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/stakeholder-venn?x=1")
            .header(USER_AGENT, "curl/8.0")
            .body(())
            .unwrap();
        let (parts, ()) = req.into_parts();
        let entry = access_entry(&parts, "10.0.0.7:4242".parse().unwrap());
        assert_eq!(entry.remote_addr, "10.0.0.7");
        assert_eq!(entry.method, "POST");
        assert_eq!(entry.path, "/stakeholder-venn");
        assert_eq!(entry.query.as_deref(), Some("x=1"));
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(entry.referer, None);
    }
}

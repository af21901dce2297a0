//! Request extraction.
//!
//! # Responsibilities
//! - Read a routed axum request into an owned `IncomingRequest`
//! - Collect query parameters and headers as multi-valued maps
//! - Report header names in canonical form (`x-test` → `X-Test`)
//!
//! # Design Decisions
//! - The body is read completely before any handler runs
//! - Maps are key-ordered so identical requests serialize identically
//! - Non-UTF-8 header values are reported lossily rather than dropped

use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, Uri},
};
use http_body_util::LengthLimitError;
use thiserror::Error;

/// Multi-valued, key-ordered string map used for headers and query arguments.
pub type MultiMap = BTreeMap<String, Vec<String>>;

/// Failure while reading the request off the wire.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to read request body: {0}")]
    Body(#[from] axum::Error),
}

impl RequestError {
    /// True when the body was cut off by the configured size limit.
    pub fn is_too_large(&self) -> bool {
        let RequestError::Body(err) = self;
        let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
        while let Some(e) = source {
            if e.is::<LengthLimitError>() {
                return true;
            }
            source = e.source();
        }
        false
    }
}

/// Everything a handler may observe about a request.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    pub method: Method,
    pub path: String,
    /// Path and query exactly as received (`/get?a=1`).
    pub url: String,
    pub args: MultiMap,
    pub headers: MultiMap,
    pub body: Bytes,
    pub remote_addr: SocketAddr,
}

impl IncomingRequest {
    /// Consume an axum request, buffering the body.
    ///
    /// Body size is capped by the `RequestBodyLimitLayer` installed on the server.
    pub async fn read(request: Request<Body>, remote_addr: SocketAddr) -> Result<Self, RequestError> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX).await?;

        Ok(Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            url: request_url(&parts.uri),
            args: parse_query(parts.uri.query()),
            headers: collect_headers(&parts.headers),
            body,
            remote_addr,
        })
    }

    /// First value of a query argument.
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args.get(name).and_then(|values| values.first()).map(String::as_str)
    }

    /// First value of a header, looked up case-insensitively.
    pub fn first_header(&self, name: &str) -> Option<&str> {
        self.header(name).and_then(|values| values.first()).map(String::as_str)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&[String]> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }
}

fn request_url(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// Parse a query string with form-urlencoded rules, keeping repeated keys.
pub fn parse_query(query: Option<&str>) -> MultiMap {
    let mut args = MultiMap::new();
    if let Some(query) = query {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            args.entry(key.into_owned()).or_default().push(value.into_owned());
        }
    }
    args
}

/// Group header values under their canonical names, preserving value order.
pub fn collect_headers(headers: &HeaderMap) -> MultiMap {
    let mut out = MultiMap::new();
    for (name, value) in headers {
        out.entry(canonical_header_name(name.as_str()))
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    out
}

/// Canonical MIME header form: first letter and letters after `-` upper-cased.
pub fn canonical_header_name(name: &str) -> String {
    let mut upper = true;
    name.chars()
        .map(|c| {
            let mapped = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            mapped
        })
        .collect()
}

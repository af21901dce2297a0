//! Response construction helpers.
//!
//! # Responsibilities
//! - Encode JSON, plain text, HTML and empty responses with the right content type
//! - Map encoding failures to a generic 500 without leaking detail
//! - Build the routing-level 404 / 405 / 413 responses

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub const APPLICATION_JSON: &str = "application/json";
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const TEXT_HTML: &str = "text/html; charset=utf-8";

/// Serialize `value` as the JSON body of a response.
pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => (status, [(header::CONTENT_TYPE, APPLICATION_JSON)], body).into_response(),
        Err(_) => text(StatusCode::INTERNAL_SERVER_ERROR, "Error encoding response"),
    }
}

pub fn text(status: StatusCode, body: impl Into<String>) -> Response {
    (status, [(header::CONTENT_TYPE, TEXT_PLAIN)], body.into()).into_response()
}

pub fn html(body: String) -> Response {
    html_with_status(StatusCode::OK, body)
}

pub fn html_with_status(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, TEXT_HTML)], body).into_response()
}

/// Escape text for HTML content and double-quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Status line only; the content type is still declared for consistency with
/// the error variants of the same endpoint.
pub fn empty(status: StatusCode) -> Response {
    (status, [(header::CONTENT_TYPE, TEXT_PLAIN)], Body::empty()).into_response()
}

pub fn not_found() -> Response {
    text(StatusCode::NOT_FOUND, "404 page not found")
}

pub fn method_not_allowed(allowed: &[Method]) -> Response {
    let mut response = text(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    let allow = allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if let Ok(value) = HeaderValue::from_str(&allow) {
        response.headers_mut().insert(header::ALLOW, value);
    }
    response
}

pub fn unreadable_body() -> Response {
    text(StatusCode::BAD_REQUEST, "Failed to read request body")
}

pub fn payload_too_large() -> Response {
    text(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
}

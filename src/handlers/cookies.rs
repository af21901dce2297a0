//! Cookie inspection and manipulation.
//!
//! The service keeps no cookie jar. `GET /cookies` reports what the client
//! sent; the mutating verbs only emit `Set-Cookie` headers.

use std::collections::BTreeMap;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::http::request::IncomingRequest;
use crate::http::response;

const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";
const EXPIRED: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

#[derive(Serialize)]
struct CookieJar {
    cookies: BTreeMap<String, String>,
}

/// Body of `POST /cookies`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewCookie {
    pub name: String,
    pub value: String,
    /// RFC 3339 timestamp; session cookie when absent.
    #[serde(default)]
    pub expires: Option<String>,
}

/// Parse every `Cookie` header into name/value pairs. The first occurrence
/// of a name wins.
pub fn parse_cookies(request: &IncomingRequest) -> BTreeMap<String, String> {
    let mut cookies = BTreeMap::new();
    let headers = request.header(header::COOKIE.as_str()).unwrap_or_default();
    for pair in headers.iter().flat_map(|h| h.split(';')) {
        let Some((name, value)) = pair.trim().split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        cookies
            .entry(name.to_string())
            .or_insert_with(|| value.trim().trim_matches('"').to_string());
    }
    cookies
}

/// RFC 6265 token characters.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}

/// RFC 6265 cookie-octets.
fn is_valid_value(value: &str) -> bool {
    value
        .bytes()
        .all(|b| matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E))
}

/// Render an RFC 3339 timestamp as a cookie `Expires` date.
pub fn format_expires(raw: &str) -> Option<String> {
    let parsed = DateTime::parse_from_rfc3339(raw).ok()?;
    Some(parsed.with_timezone(&Utc).format(EXPIRES_FORMAT).to_string())
}

pub fn cookies(request: &IncomingRequest) -> Response {
    response::json(
        StatusCode::OK,
        &CookieJar {
            cookies: parse_cookies(request),
        },
    )
}

/// Answers with the cookies the request carried, plus a `Set-Cookie` for
/// the new one.
pub fn set_cookie(request: &IncomingRequest) -> Response {
    let Ok(cookie) = serde_json::from_slice::<NewCookie>(&request.body) else {
        return response::text(StatusCode::BAD_REQUEST, "Invalid request body");
    };
    if !is_valid_name(&cookie.name) || !is_valid_value(&cookie.value) {
        return response::text(StatusCode::BAD_REQUEST, "Invalid cookie");
    }

    let mut line = format!("{}={}; Path=/", cookie.name, cookie.value);
    if let Some(expires) = &cookie.expires {
        let Some(expires) = format_expires(expires) else {
            return response::text(StatusCode::BAD_REQUEST, "Invalid date format");
        };
        line.push_str("; Expires=");
        line.push_str(&expires);
    }
    let Ok(value) = HeaderValue::from_str(&line) else {
        return response::text(StatusCode::BAD_REQUEST, "Invalid cookie");
    };

    let mut response = cookies(request);
    response.headers_mut().append(header::SET_COOKIE, value);
    response
}

/// Expire the cookie named by `?name=`.
pub fn delete_cookie(request: &IncomingRequest) -> Response {
    let Some(name) = request.arg("name").filter(|name| !name.is_empty()) else {
        return response::text(StatusCode::BAD_REQUEST, "Missing name parameter");
    };
    if !is_valid_name(name) {
        return response::text(StatusCode::BAD_REQUEST, "Invalid cookie");
    }

    let line = format!("{name}=; Path=/; Max-Age=0; Expires={EXPIRED}");
    let Ok(value) = HeaderValue::from_str(&line) else {
        return response::text(StatusCode::BAD_REQUEST, "Invalid cookie");
    };
    let mut response = response::empty(StatusCode::NO_CONTENT);
    response.headers_mut().append(header::SET_COOKIE, value);
    response
}

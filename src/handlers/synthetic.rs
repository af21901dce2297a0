//! Synthetic responses: forced status codes, delays, caller-chosen headers
//! and fixed payloads.
//!
//! Path parameters arrive as raw strings. They are parsed as base-10
//! integers with no truncation, so `3.5`, `abc` and overflowing values are
//! rejected with 400 instead of being coerced.

use std::time::Duration;

use axum::{
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::Response,
};
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use serde::Serialize;

use crate::http::request::{IncomingRequest, MultiMap};
use crate::http::response;
use crate::routing::PathParams;

pub const MIN_STATUS: i64 = 100;
pub const MAX_STATUS: i64 = 599;

/// Fixed body of `/json`. Field order is part of the output.
#[derive(Serialize)]
struct Greeting {
    message: &'static str,
    author: &'static str,
}

const GREETING: Greeting = Greeting {
    message: "Hello, mockhttp!",
    author: "mockhttp team",
};

#[derive(Serialize)]
struct UuidBody {
    uuid: String,
}

/// Headers a caller may not set; they would corrupt the response framing.
const FRAMING_HEADERS: [&str; 3] = ["content-length", "transfer-encoding", "connection"];

/// Standard alphabet, padding optional, sloppy trailing bits tolerated.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Validate a status code from the path; `None` when not usable.
pub fn parse_status(raw: &str) -> Option<StatusCode> {
    let code = raw.parse::<i64>().ok()?;
    if !(MIN_STATUS..=MAX_STATUS).contains(&code) {
        return None;
    }
    StatusCode::from_u16(u16::try_from(code).ok()?).ok()
}

/// Validate a delay from the path; negative values are rejected.
pub fn parse_delay(raw: &str) -> Option<u64> {
    let seconds = raw.parse::<i64>().ok()?;
    u64::try_from(seconds).ok()
}

pub fn status(params: &PathParams) -> Response {
    match params.get("code").and_then(parse_status) {
        Some(code) => response::empty(code),
        None => response::text(StatusCode::BAD_REQUEST, "Invalid status code"),
    }
}

/// Wait `seconds` on the current task, then answer.
///
/// Dropping the future (client gone) cancels the sleep.
pub async fn delay(params: &PathParams, max_secs: Option<u64>) -> Response {
    let Some(seconds) = params.get("seconds").and_then(parse_delay) else {
        return response::text(StatusCode::BAD_REQUEST, "Invalid delay time");
    };
    if let Some(max) = max_secs {
        if seconds > max {
            return response::text(
                StatusCode::BAD_REQUEST,
                format!("Delay exceeds maximum of {max} second(s)"),
            );
        }
    }

    tokio::time::sleep(Duration::from_secs(seconds)).await;
    response::text(StatusCode::OK, format!("Response after {seconds} second(s)"))
}

/// Echo query arguments (and, on POST, a flat JSON object body) as
/// response headers. The JSON body lists the same pairs.
pub fn response_headers(request: &IncomingRequest) -> Response {
    let mut pairs = request.args.clone();
    if request.method == Method::POST && !request.body.is_empty() {
        let Ok(serde_json::Value::Object(fields)) = serde_json::from_slice(&request.body) else {
            return response::text(StatusCode::BAD_REQUEST, "Invalid request body");
        };
        for (name, value) in fields {
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            pairs.entry(name).or_default().push(value);
        }
    }

    let Some(headers) = build_headers(&pairs) else {
        return response::text(StatusCode::BAD_REQUEST, "Invalid response header");
    };
    let mut response = response::json(StatusCode::OK, &pairs);
    // Replaces, so a caller-chosen Content-Type wins over the JSON default.
    response.headers_mut().extend(headers);
    response
}

fn build_headers(pairs: &MultiMap) -> Option<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, values) in pairs {
        let name = HeaderName::from_bytes(name.as_bytes()).ok()?;
        if FRAMING_HEADERS.contains(&name.as_str()) {
            return None;
        }
        for value in values {
            headers.append(name.clone(), HeaderValue::from_str(value).ok()?);
        }
    }
    Some(headers)
}

/// Decode a base64 path segment. URL-safe characters are accepted too.
pub fn decode_base64(raw: &str) -> Option<Vec<u8>> {
    let normalized: String = raw
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    LENIENT_BASE64.decode(normalized).ok()
}

pub fn decoded_base64(params: &PathParams) -> Response {
    match params.get("value").and_then(decode_base64) {
        Some(bytes) => {
            response::html_with_status(StatusCode::OK, String::from_utf8_lossy(&bytes).into_owned())
        }
        None => response::text(StatusCode::BAD_REQUEST, "Incorrect Base64 data"),
    }
}

pub fn json() -> Response {
    response::json(StatusCode::OK, &GREETING)
}

pub fn uuid() -> Response {
    response::json(
        StatusCode::OK,
        &UuidBody {
            uuid: uuid::Uuid::new_v4().to_string(),
        },
    )
}

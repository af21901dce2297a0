//! Request inspection handlers: each one reflects part of the request back.

use axum::{
    http::{header, StatusCode},
    response::Response,
};
use serde::Serialize;
use serde_json::Value;

use crate::http::request::{IncomingRequest, MultiMap};
use crate::http::response;

/// Outcome of decoding a request body as JSON.
///
/// Decoding is lenient on purpose: anything that is not valid JSON becomes
/// `Empty` and the request still succeeds.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBody {
    Json(Value),
    Empty,
}

impl DecodedBody {
    pub fn decode(body: &[u8]) -> Self {
        match serde_json::from_slice(body) {
            Ok(value) => DecodedBody::Json(value),
            Err(_) => DecodedBody::Empty,
        }
    }
}

impl Serialize for DecodedBody {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DecodedBody::Json(value) => value.serialize(serializer),
            DecodedBody::Empty => serializer.serialize_none(),
        }
    }
}

#[derive(Serialize)]
struct GetEcho<'a> {
    args: &'a MultiMap,
    headers: &'a MultiMap,
    url: &'a str,
}

#[derive(Serialize)]
struct BodyEcho<'a> {
    data: DecodedBody,
    headers: &'a MultiMap,
    url: &'a str,
}

#[derive(Serialize)]
struct AnythingEcho<'a> {
    method: &'a str,
    headers: &'a MultiMap,
    args: &'a MultiMap,
    url: &'a str,
}

#[derive(Serialize)]
struct Origin {
    origin: String,
}

#[derive(Serialize)]
struct UserAgent<'a> {
    #[serde(rename = "userAgent")]
    user_agent: Option<&'a str>,
}

pub fn get(request: &IncomingRequest) -> Response {
    response::json(
        StatusCode::OK,
        &GetEcho {
            args: &request.args,
            headers: &request.headers,
            url: &request.url,
        },
    )
}

/// Shared by POST, PUT, PATCH and DELETE.
pub fn body_echo(request: &IncomingRequest) -> Response {
    response::json(
        StatusCode::OK,
        &BodyEcho {
            data: DecodedBody::decode(&request.body),
            headers: &request.headers,
            url: &request.url,
        },
    )
}

pub fn headers(request: &IncomingRequest) -> Response {
    response::json(StatusCode::OK, &request.headers)
}

pub fn ip(request: &IncomingRequest) -> Response {
    response::json(
        StatusCode::OK,
        &Origin {
            origin: request.remote_addr.to_string(),
        },
    )
}

pub fn user_agent(request: &IncomingRequest) -> Response {
    let user_agent = request
        .header(header::USER_AGENT.as_str())
        .and_then(|values| values.first())
        .map(String::as_str);
    response::json(StatusCode::OK, &UserAgent { user_agent })
}

pub fn anything(request: &IncomingRequest) -> Response {
    response::json(
        StatusCode::OK,
        &AnythingEcho {
            method: request.method.as_str(),
            headers: &request.headers,
            args: &request.args,
            url: &request.url,
        },
    )
}

//! Authentication checks.
//!
//! Nothing is stored: Basic credentials are compared with the ones in the
//! path, Bearer only checks that a token is present.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

use crate::http::request::IncomingRequest;
use crate::http::response;
use crate::routing::PathParams;

pub const BASIC_CHALLENGE: &str = "Basic realm=\"mockhttp\"";
pub const BEARER_CHALLENGE: &str = "Bearer";

#[derive(Serialize)]
struct UserAuthenticated<'a> {
    authenticated: bool,
    user: &'a str,
}

#[derive(Serialize)]
struct TokenAuthenticated<'a> {
    authenticated: bool,
    token: &'a str,
}

#[derive(Serialize)]
struct Rejection {
    message: &'static str,
}

/// Credentials from an `Authorization: Basic ...` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

/// Decode a Basic authorization header. The username must be non-empty,
/// the password may be empty.
pub fn parse_basic(header: &str) -> Option<BasicCredentials> {
    let (scheme, value) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") || value.is_empty() {
        return None;
    }
    let decoded = String::from_utf8(STANDARD.decode(value.trim()).ok()?).ok()?;
    let (username, password) = decoded.split_once(':')?;
    if username.is_empty() {
        return None;
    }
    Some(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let mut parts = header.split(' ');
    let scheme = parts.next()?;
    let token = parts.next()?;
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Byte comparison whose running time depends only on the lengths.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

pub fn basic_auth(request: &IncomingRequest, params: &PathParams) -> Response {
    let user = params.get("user").unwrap_or_default();
    let passwd = params.get("passwd").unwrap_or_default();

    let accepted = request
        .first_header(header::AUTHORIZATION.as_str())
        .and_then(parse_basic)
        .is_some_and(|supplied| {
            // Both comparisons run so a wrong user costs as much as a wrong password.
            let user_ok = constant_time_eq(supplied.username.as_bytes(), user.as_bytes());
            let passwd_ok = constant_time_eq(supplied.password.as_bytes(), passwd.as_bytes());
            !user.is_empty() && user_ok & passwd_ok
        });

    if accepted {
        response::json(
            StatusCode::OK,
            &UserAuthenticated {
                authenticated: true,
                user,
            },
        )
    } else {
        unauthorized(BASIC_CHALLENGE)
    }
}

/// `?required=false` lets a request without a token through as unauthenticated.
pub fn bearer(request: &IncomingRequest) -> Response {
    let required = match request.arg("required") {
        None => true,
        Some(raw) => match raw.parse::<bool>() {
            Ok(required) => required,
            Err(_) => return response::text(StatusCode::BAD_REQUEST, "Invalid required parameter"),
        },
    };

    match request
        .first_header(header::AUTHORIZATION.as_str())
        .and_then(parse_bearer)
    {
        Some(token) => response::json(
            StatusCode::OK,
            &TokenAuthenticated {
                authenticated: true,
                token,
            },
        ),
        None if required => unauthorized(BEARER_CHALLENGE),
        None => response::json(
            StatusCode::OK,
            &TokenAuthenticated {
                authenticated: false,
                token: "",
            },
        ),
    }
}

fn unauthorized(challenge: &'static str) -> Response {
    let mut response = response::json(
        StatusCode::UNAUTHORIZED,
        &Rejection {
            message: "Unauthorized",
        },
    );
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(challenge));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{body_json, request};
    use axum::http::Method;
    use serde_json::json;

    fn credentials(user: &str, passwd: &str) -> PathParams {
        let mut params = PathParams::default();
        params.insert("user", user);
        params.insert("passwd", passwd);
        params
    }

    #[test]
    fn test_parse_basic() {
        // "user:passwd"
        assert_eq!(
            parse_basic("Basic dXNlcjpwYXNzd2Q="),
            Some(BasicCredentials {
                username: "user".to_string(),
                password: "passwd".to_string(),
            })
        );
        // ":passwd" has no username
        assert_eq!(parse_basic("Basic OnBhc3N3ZA=="), None);
        assert_eq!(parse_basic("Bearer dXNlcjpwYXNzd2Q="), None);
        assert_eq!(parse_basic("Basic"), None);
        assert_eq!(parse_basic("Basic !!!"), None);
    }

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer("Bearer abc"), Some("abc"));
        assert_eq!(parse_bearer("bearer abc"), Some("abc"));
        assert_eq!(parse_bearer("Bearer"), None);
        assert_eq!(parse_bearer("Basic abc"), None);
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"secret", b"secret"));
        assert!(!constant_time_eq(b"secret", b"secreT"));
        assert!(!constant_time_eq(b"secret", b"secrets"));
    }

    #[tokio::test]
    async fn test_basic_auth_accepts_matching_credentials() {
        let req = request(
            Method::GET,
            "/basic-auth/user/passwd",
            &[("authorization", "Basic dXNlcjpwYXNzd2Q=")],
            b"",
        );
        let response = basic_auth(&req, &credentials("user", "passwd"));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"authenticated": true, "user": "user"})
        );
    }

    #[tokio::test]
    async fn test_basic_auth_challenges() {
        let missing = request(Method::GET, "/basic-auth/user/passwd", &[], b"");
        let wrong = request(
            Method::GET,
            "/basic-auth/user/other",
            &[("authorization", "Basic dXNlcjpwYXNzd2Q=")],
            b"",
        );

        for (req, params) in [
            (&missing, credentials("user", "passwd")),
            (&wrong, credentials("user", "other")),
        ] {
            let response = basic_auth(req, &params);
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(response.headers()[header::WWW_AUTHENTICATE], BASIC_CHALLENGE);
            assert_eq!(body_json(response).await, json!({"message": "Unauthorized"}));
        }
    }

    #[tokio::test]
    async fn test_bearer() {
        let req = request(Method::GET, "/bearer", &[("authorization", "Bearer t0k3n")], b"");
        assert_eq!(
            body_json(bearer(&req)).await,
            json!({"authenticated": true, "token": "t0k3n"})
        );

        let req = request(Method::GET, "/bearer", &[], b"");
        let response = bearer(&req);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], BEARER_CHALLENGE);

        let req = request(Method::GET, "/bearer?required=false", &[], b"");
        let response = bearer(&req);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"authenticated": false, "token": ""})
        );

        let req = request(Method::GET, "/bearer?required=maybe", &[], b"");
        assert_eq!(bearer(&req).status(), StatusCode::BAD_REQUEST);
    }
}

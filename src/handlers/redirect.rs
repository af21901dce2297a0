//! Redirect endpoints.
//!
//! `/redirect-to` sends the client wherever `url` points. The chained
//! variants count down `n` hops and finish on `/get`.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::Response,
};

use crate::http::request::IncomingRequest;
use crate::http::response;
use crate::routing::PathParams;

/// Validate `status_code`; a missing value means 302, anything outside 3xx is refused.
pub fn parse_redirect_status(raw: Option<&str>) -> Option<StatusCode> {
    let Some(raw) = raw else {
        return Some(StatusCode::FOUND);
    };
    let code = raw.parse::<u16>().ok()?;
    if !(300..=399).contains(&code) {
        return None;
    }
    StatusCode::from_u16(code).ok()
}

/// Remaining hops of a redirect chain; at least one.
pub fn parse_hops(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok().filter(|n| *n >= 1)
}

pub fn redirect_to(request: &IncomingRequest) -> Response {
    let Some(url) = request.arg("url").filter(|url| !url.is_empty()) else {
        return response::text(StatusCode::BAD_REQUEST, "Missing url parameter");
    };
    let Some(status) = parse_redirect_status(request.arg("status_code")) else {
        return response::text(StatusCode::BAD_REQUEST, "Invalid status code");
    };
    redirect(status, url)
}

pub fn relative_redirect(params: &PathParams) -> Response {
    match params.get("n").and_then(parse_hops) {
        Some(n) => redirect(StatusCode::FOUND, &next_hop("/relative-redirect", n)),
        None => invalid_hops(),
    }
}

/// Like `relative_redirect`, but `Location` carries scheme and host.
pub fn absolute_redirect(request: &IncomingRequest, params: &PathParams) -> Response {
    let Some(n) = params.get("n").and_then(parse_hops) else {
        return invalid_hops();
    };
    let Some(host) = request.first_header(header::HOST.as_str()) else {
        return response::text(StatusCode::BAD_REQUEST, "Missing Host header");
    };
    let target = format!("http://{host}{}", next_hop("/absolute-redirect", n));
    redirect(StatusCode::FOUND, &target)
}

fn next_hop(prefix: &str, n: u64) -> String {
    if n > 1 {
        format!("{prefix}/{}", n - 1)
    } else {
        "/get".to_string()
    }
}

fn invalid_hops() -> Response {
    response::text(StatusCode::BAD_REQUEST, "Invalid redirect count")
}

fn redirect(status: StatusCode, location: &str) -> Response {
    let Ok(value) = HeaderValue::from_str(location) else {
        return response::text(StatusCode::BAD_REQUEST, "Invalid redirect target");
    };
    let target = response::escape_html(location);
    let page = format!(
        "<title>Redirecting...</title>\n\
         <h1>Redirecting...</h1>\n\
         <p>You should be redirected automatically to target URL: \
         <a href=\"{target}\">{target}</a>. If not click the link.</p>\n"
    );

    let mut response = response::html_with_status(status, page);
    response.headers_mut().insert(header::LOCATION, value);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{body_text, request};
    use axum::http::Method;

    fn hops(n: &str) -> PathParams {
        let mut params = PathParams::default();
        params.insert("n", n);
        params
    }

    #[tokio::test]
    async fn test_redirect_to_defaults_to_found() {
        let req = request(Method::GET, "/redirect-to?url=https%3A%2F%2Fexample.com%2Fa", &[], b"");
        let response = redirect_to(&req);
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "https://example.com/a");
        assert!(body_text(response).await.contains("<a href=\"https://example.com/a\">"));
    }

    #[test]
    fn test_redirect_to_custom_status() {
        let req = request(Method::POST, "/redirect-to?url=/get&status_code=307", &[], b"");
        let response = redirect_to(&req);
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/get");
    }

    #[tokio::test]
    async fn test_redirect_to_rejects_bad_input() {
        let req = request(Method::GET, "/redirect-to", &[], b"");
        let response = redirect_to(&req);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Missing url parameter");

        for code in ["200", "404", "abc", "3000"] {
            let req = request(Method::GET, &format!("/redirect-to?url=/get&status_code={code}"), &[], b"");
            let response = redirect_to(&req);
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "status_code {code}");
            assert_eq!(body_text(response).await, "Invalid status code");
        }

        let req = request(Method::GET, "/redirect-to?url=%2Fa%0D%0Ab", &[], b"");
        assert_eq!(redirect_to(&req).status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_redirect_page_escapes_target() {
        let req = request(Method::GET, "/redirect-to?url=%2F%22%3E%3Cb%3E", &[], b"");
        let page = body_text(redirect_to(&req)).await;
        assert!(page.contains("/&quot;&gt;&lt;b&gt;"));
        assert!(!page.contains("<b>"));
    }

    #[test]
    fn test_relative_redirect_counts_down() {
        let response = relative_redirect(&hops("3"));
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/relative-redirect/2");

        let response = relative_redirect(&hops("1"));
        assert_eq!(response.headers()[header::LOCATION], "/get");
    }

    #[test]
    fn test_redirect_chain_rejects_bad_count() {
        for raw in ["0", "-1", "two", "1.5"] {
            assert_eq!(relative_redirect(&hops(raw)).status(), StatusCode::BAD_REQUEST, "n {raw}");
        }
    }

    #[test]
    fn test_absolute_redirect_uses_host() {
        let req = request(Method::GET, "/absolute-redirect/2", &[("host", "mock.test:8080")], b"");
        let response = absolute_redirect(&req, &hops("2"));
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            "http://mock.test:8080/absolute-redirect/1"
        );

        let response = absolute_redirect(&req, &hops("1"));
        assert_eq!(response.headers()[header::LOCATION], "http://mock.test:8080/get");

        let req = request(Method::GET, "/absolute-redirect/2", &[], b"");
        assert_eq!(absolute_redirect(&req, &hops("2")).status(), StatusCode::BAD_REQUEST);
    }
}

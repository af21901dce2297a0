//! Endpoint handlers.
//!
//! # Data Flow
//! ```text
//! RouteMatch::Found { route, params }
//!     → route.target (Endpoint)
//!     → handle(endpoint, &IncomingRequest, &PathParams, &HandlerSettings)
//!         inspect.rs   (echo request facts back)
//!         synthetic.rs (forced status, delay, chosen headers, fixed payloads)
//!         redirect.rs  (redirect-to and redirect chains)
//!         cookies.rs   (cookie echo, set and expire)
//!         auth.rs      (basic and bearer checks)
//!         home.rs      (landing page)
//!     → Response
//! ```
//!
//! # Design Decisions
//! - Handlers are stateless and never log; dispatch does the logging
//! - Every failure is turned into a response here, nothing propagates
//! - The route table lives next to the handlers it points at

pub mod auth;
pub mod cookies;
pub mod home;
pub mod inspect;
pub mod redirect;
pub mod synthetic;

use axum::{http::Method, response::Response};

use crate::http::request::IncomingRequest;
use crate::routing::{PathParams, Route, RouteError, Router};

/// Identifies the handler a route dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Home,
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Headers,
    Status,
    Delay,
    Ip,
    UserAgent,
    Anything,
    Json,
    Uuid,
    Cookies,
    SetCookie,
    DeleteCookie,
    ResponseHeaders,
    RedirectTo,
    RelativeRedirect,
    AbsoluteRedirect,
    BasicAuth,
    Bearer,
    Base64,
}

/// Registered routes: (verb, template, endpoint).
pub const ROUTES: &[(Method, &str, Endpoint)] = &[
    (Method::GET, "/", Endpoint::Home),
    (Method::GET, "/get", Endpoint::Get),
    (Method::POST, "/post", Endpoint::Post),
    (Method::PUT, "/put", Endpoint::Put),
    (Method::PATCH, "/patch", Endpoint::Patch),
    (Method::DELETE, "/delete", Endpoint::Delete),
    (Method::GET, "/headers", Endpoint::Headers),
    (Method::GET, "/status/{code}", Endpoint::Status),
    (Method::GET, "/delay/{seconds}", Endpoint::Delay),
    (Method::GET, "/ip", Endpoint::Ip),
    (Method::GET, "/user-agent", Endpoint::UserAgent),
    (Method::GET, "/anything", Endpoint::Anything),
    (Method::POST, "/anything", Endpoint::Anything),
    (Method::PUT, "/anything", Endpoint::Anything),
    (Method::PATCH, "/anything", Endpoint::Anything),
    (Method::DELETE, "/anything", Endpoint::Anything),
    (Method::GET, "/json", Endpoint::Json),
    (Method::GET, "/uuid", Endpoint::Uuid),
    (Method::GET, "/cookies", Endpoint::Cookies),
    (Method::POST, "/cookies", Endpoint::SetCookie),
    (Method::DELETE, "/cookies", Endpoint::DeleteCookie),
    (Method::GET, "/response-headers", Endpoint::ResponseHeaders),
    (Method::POST, "/response-headers", Endpoint::ResponseHeaders),
    (Method::GET, "/redirect-to", Endpoint::RedirectTo),
    (Method::POST, "/redirect-to", Endpoint::RedirectTo),
    (Method::PUT, "/redirect-to", Endpoint::RedirectTo),
    (Method::PATCH, "/redirect-to", Endpoint::RedirectTo),
    (Method::DELETE, "/redirect-to", Endpoint::RedirectTo),
    (Method::GET, "/relative-redirect/{n}", Endpoint::RelativeRedirect),
    (Method::GET, "/absolute-redirect/{n}", Endpoint::AbsoluteRedirect),
    (Method::GET, "/basic-auth/{user}/{passwd}", Endpoint::BasicAuth),
    (Method::GET, "/bearer", Endpoint::Bearer),
    (Method::GET, "/base64/{value}", Endpoint::Base64),
];

impl Endpoint {
    /// Stable label for logs and metrics.
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Home => "home",
            Endpoint::Get => "get",
            Endpoint::Post => "post",
            Endpoint::Put => "put",
            Endpoint::Patch => "patch",
            Endpoint::Delete => "delete",
            Endpoint::Headers => "headers",
            Endpoint::Status => "status",
            Endpoint::Delay => "delay",
            Endpoint::Ip => "ip",
            Endpoint::UserAgent => "user_agent",
            Endpoint::Anything => "anything",
            Endpoint::Json => "json",
            Endpoint::Uuid => "uuid",
            Endpoint::Cookies => "cookies",
            Endpoint::SetCookie => "set_cookie",
            Endpoint::DeleteCookie => "delete_cookie",
            Endpoint::ResponseHeaders => "response_headers",
            Endpoint::RedirectTo => "redirect_to",
            Endpoint::RelativeRedirect => "relative_redirect",
            Endpoint::AbsoluteRedirect => "absolute_redirect",
            Endpoint::BasicAuth => "basic_auth",
            Endpoint::Bearer => "bearer",
            Endpoint::Base64 => "base64",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Endpoint::Home => "This page.",
            Endpoint::Get => "Returns GET request data.",
            Endpoint::Post => "Returns POST request data.",
            Endpoint::Put => "Returns PUT request data.",
            Endpoint::Patch => "Returns PATCH request data.",
            Endpoint::Delete => "Returns DELETE request data.",
            Endpoint::Headers => "Returns request headers.",
            Endpoint::Status => "Returns response with the given status code.",
            Endpoint::Delay => "Returns response after a given delay.",
            Endpoint::Ip => "Returns the client's IP address.",
            Endpoint::UserAgent => "Returns the User-Agent header.",
            Endpoint::Anything => "Returns request data for any request.",
            Endpoint::Json => "Returns a sample JSON response.",
            Endpoint::Uuid => "Returns a random UUID4.",
            Endpoint::Cookies => "Returns the cookies sent with the request.",
            Endpoint::SetCookie => "Sets a cookie from a JSON body.",
            Endpoint::DeleteCookie => "Expires the cookie named by ?name=.",
            Endpoint::ResponseHeaders => "Returns the query arguments as response headers.",
            Endpoint::RedirectTo => "Redirects to ?url= with an optional ?status_code=.",
            Endpoint::RelativeRedirect => "Redirects n times with relative Location headers.",
            Endpoint::AbsoluteRedirect => "Redirects n times with absolute Location headers.",
            Endpoint::BasicAuth => "Challenges HTTP Basic authentication.",
            Endpoint::Bearer => "Challenges Bearer token authentication.",
            Endpoint::Base64 => "Decodes a base64 path segment.",
        }
    }

    /// Example link for the landing page; placeholders filled with sample values.
    pub fn example_path(self, template: &str) -> String {
        match self {
            Endpoint::Status => "/status/200".to_string(),
            Endpoint::Delay => "/delay/3".to_string(),
            Endpoint::RelativeRedirect => "/relative-redirect/3".to_string(),
            Endpoint::AbsoluteRedirect => "/absolute-redirect/3".to_string(),
            Endpoint::BasicAuth => "/basic-auth/user/passwd".to_string(),
            Endpoint::Base64 => "/base64/SGVsbG8sIG1vY2todHRwIQ==".to_string(),
            _ => template.to_string(),
        }
    }
}

/// Build the immutable route table.
pub fn route_table() -> Result<Router<Endpoint>, RouteError> {
    let routes = ROUTES
        .iter()
        .map(|(method, template, endpoint)| Route::new(method.clone(), template, *endpoint))
        .collect::<Result<Vec<_>, _>>()?;
    Router::new(routes)
}

/// Policy knobs that handlers read but never change.
#[derive(Debug, Clone, Default)]
pub struct HandlerSettings {
    /// Upper bound for `/delay/{seconds}`; `None` accepts any value.
    pub max_delay_secs: Option<u64>,
    /// `(verb, template, endpoint)` rows listed on the landing page.
    pub listing: Vec<(Method, String, Endpoint)>,
}

impl HandlerSettings {
    pub fn new(router: &Router<Endpoint>, max_delay_secs: Option<u64>) -> Self {
        let listing = router
            .routes()
            .iter()
            .map(|r| (r.method.clone(), r.template.to_string(), r.target))
            .collect();
        Self {
            max_delay_secs,
            listing,
        }
    }
}

/// Run the handler behind `endpoint`.
pub async fn handle(
    endpoint: Endpoint,
    request: &IncomingRequest,
    params: &PathParams,
    settings: &HandlerSettings,
) -> Response {
    match endpoint {
        Endpoint::Home => home::home(&settings.listing),
        Endpoint::Get => inspect::get(request),
        Endpoint::Post | Endpoint::Put | Endpoint::Patch | Endpoint::Delete => {
            inspect::body_echo(request)
        }
        Endpoint::Headers => inspect::headers(request),
        Endpoint::Status => synthetic::status(params),
        Endpoint::Delay => synthetic::delay(params, settings.max_delay_secs).await,
        Endpoint::Ip => inspect::ip(request),
        Endpoint::UserAgent => inspect::user_agent(request),
        Endpoint::Anything => inspect::anything(request),
        Endpoint::Json => synthetic::json(),
        Endpoint::Uuid => synthetic::uuid(),
        Endpoint::Cookies => cookies::cookies(request),
        Endpoint::SetCookie => cookies::set_cookie(request),
        Endpoint::DeleteCookie => cookies::delete_cookie(request),
        Endpoint::ResponseHeaders => synthetic::response_headers(request),
        Endpoint::RedirectTo => redirect::redirect_to(request),
        Endpoint::RelativeRedirect => redirect::relative_redirect(params),
        Endpoint::AbsoluteRedirect => redirect::absolute_redirect(request, params),
        Endpoint::BasicAuth => auth::basic_auth(request, params),
        Endpoint::Bearer => auth::bearer(request),
        Endpoint::Base64 => synthetic::decoded_base64(params),
    }
}

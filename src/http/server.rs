//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with a single catch-all handler
//! - Wire up middleware (tracing, body limit, optional timeout)
//! - Dispatch requests through the route table to the endpoint handlers
//! - Record per-request metrics
//! - Serve until the shutdown signal fires, then drain for a bounded time

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::handlers::{self, Endpoint, HandlerSettings};
use crate::http::request::IncomingRequest;
use crate::http::response;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::routing::{RouteError, RouteMatch, Router as RouteTable};

/// Application state injected into the dispatcher.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable<Endpoint>>,
    pub settings: Arc<HandlerSettings>,
}

/// HTTP server for the mock service.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails only if the built-in route table is inconsistent.
    pub fn new(config: ServerConfig) -> Result<Self, RouteError> {
        let router = Self::build_router(&config)?;
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &ServerConfig) -> Result<Router, RouteError> {
        let routes = handlers::route_table()?;
        let settings = HandlerSettings::new(&routes, config.delay.max_secs);
        let state = AppState {
            routes: Arc::new(routes),
            settings: Arc::new(settings),
        };

        let mut router = Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes));

        if let Some(secs) = config.timeouts.request_secs {
            router = router.layer(TimeoutLayer::new(Duration::from_secs(secs)));
        }

        Ok(router.layer(TraceLayer::new_for_http()))
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    ///
    /// In-flight requests get `timeouts.shutdown_secs` to drain; whatever is
    /// still running after that is abandoned and `run` returns.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let grace = Duration::from_secs(self.config.timeouts.shutdown_secs);
        tracing::info!(
            address = %addr,
            max_delay_secs = ?self.config.delay.max_secs,
            max_body_bytes = self.config.limits.max_body_bytes,
            shutdown_grace_secs = grace.as_secs(),
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        let serve = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.clone().wait())
            .into_future();
        let deadline = async move {
            shutdown.wait().await;
            tokio::time::sleep(grace).await;
        };

        tokio::select! {
            result = serve => {
                result?;
                tracing::info!("HTTP server stopped");
            }
            _ = deadline => {
                tracing::warn!(
                    grace_secs = grace.as_secs(),
                    "Shutdown grace period elapsed, abandoning in-flight requests"
                );
            }
        }
        Ok(())
    }
}

/// Catch-all handler.
/// Resolves the route, reads the request and runs the endpoint.
async fn dispatch(
    State(state): State<AppState>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let (route, params) = match state.routes.resolve(&method, &path) {
        RouteMatch::Found { route, params } => (route, params),
        RouteMatch::MethodNotAllowed { allowed } => {
            tracing::debug!(method = %method, path = %path, "Method not allowed");
            let response = response::method_not_allowed(&allowed);
            metrics::record_request(method.as_str(), 405, metrics::UNROUTED, start_time);
            return response;
        }
        RouteMatch::NotFound => {
            tracing::debug!(method = %method, path = %path, "No route matched");
            metrics::record_request(method.as_str(), 404, metrics::UNROUTED, start_time);
            return response::not_found();
        }
    };
    let endpoint = route.target;

    let incoming = match IncomingRequest::read(request, remote).await {
        Ok(incoming) => incoming,
        Err(e) => {
            let response = if e.is_too_large() {
                response::payload_too_large()
            } else {
                response::unreadable_body()
            };
            tracing::warn!(
                method = %method,
                path = %path,
                endpoint = endpoint.name(),
                error = %e,
                "Failed to read request"
            );
            metrics::record_request(method.as_str(), response.status().as_u16(), endpoint.name(), start_time);
            return response;
        }
    };

    let response = handlers::handle(endpoint, &incoming, &params, &state.settings).await;
    let status = response.status();

    tracing::debug!(
        method = %method,
        path = %path,
        endpoint = endpoint.name(),
        status = status.as_u16(),
        remote = %remote,
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "Request handled"
    );
    metrics::record_request(method.as_str(), status.as_u16(), endpoint.name(), start_time);

    response
}

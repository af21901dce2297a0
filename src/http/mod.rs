//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, dispatch)
//!     → [routing table resolves endpoint or 404/405]
//!     → request.rs (buffer body, collect query and headers)
//!     → [endpoint handler]
//!     → response.rs (encode JSON / text / HTML)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{IncomingRequest, MultiMap, RequestError};
pub use server::HttpServer;

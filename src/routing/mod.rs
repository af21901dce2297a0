//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (route lookup)
//!     → matcher.rs (template match, placeholder binding)
//!     → Return: Found{route, params} | MethodNotAllowed | NotFound
//!
//! Route Compilation (at startup):
//!     (verb, template, target)[]
//!     → Parse templates
//!     → Reject ambiguous pairs
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: most specific template wins regardless of order

pub mod matcher;
pub mod router;

use axum::http::Method;
use thiserror::Error;

pub use matcher::{PathParams, PathTemplate, Segment};
pub use router::{Route, RouteMatch, Router};

/// Errors raised while compiling the route table.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid path template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("ambiguous routes for {method}: '{first}' and '{second}' match the same paths")]
    Ambiguous {
        method: Method,
        first: String,
        second: String,
    },
}

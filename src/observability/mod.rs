//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatch produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Metrics are cheap and optional
//! - Handlers stay free of observability side effects

pub mod logging;
pub mod metrics;

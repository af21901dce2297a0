//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → ShutdownSignal::wait resolves
//!             → server stops accepting, drains in-flight requests, exits
//! ```
//!
//! # Design Decisions
//! - One coordinator per process, cloned receivers per task
//! - In-flight delays are allowed to finish during drain

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownSignal};

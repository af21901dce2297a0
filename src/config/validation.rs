//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (clap handles syntactic)
//! - Validate value ranges (body limit > 0, timeouts > 0)
//! - Check that addresses parse
//! - Detect policies that contradict each other (timeout shorter than max delay)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listen address '{0}' is not a valid socket address")]
    BindAddress(String),

    #[error("max body size must be greater than zero")]
    ZeroBodyLimit,

    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,

    #[error("request timeout ({timeout}s) must exceed the maximum delay ({max_delay}s)")]
    TimeoutBelowDelay { timeout: u64, max_delay: u64 },

    #[error("metrics address '{0}' is not a valid socket address")]
    MetricsAddress(String),

    #[error("metrics address '{0}' collides with the listen address")]
    MetricsCollision(String),
}

pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let bind = config.listener.bind_address();
    let bind_addr = bind.parse::<SocketAddr>().ok();
    if bind_addr.is_none() {
        errors.push(ValidationError::BindAddress(bind));
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if let Some(timeout) = config.timeouts.request_secs {
        if timeout == 0 {
            errors.push(ValidationError::ZeroRequestTimeout);
        } else if let Some(max_delay) = config.delay.max_secs {
            if timeout <= max_delay {
                errors.push(ValidationError::TimeoutBelowDelay { timeout, max_delay });
            }
        }
    }

    if let Some(raw) = &config.observability.metrics_address {
        match raw.parse::<SocketAddr>() {
            Ok(addr) if bind_addr == Some(addr) && addr.port() != 0 => {
                errors.push(ValidationError::MetricsCollision(raw.clone()));
            }
            Ok(_) => {}
            Err(_) => errors.push(ValidationError::MetricsAddress(raw.clone())),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

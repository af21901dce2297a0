//! Configuration loading from the command line and environment.
//!
//! Every setting resolves with the same precedence: explicit flag, then
//! environment variable, then built-in default.

use clap::Parser;
use thiserror::Error;

use crate::config::schema::{
    DelayConfig, LimitConfig, ListenerConfig, LogFormat, ObservabilityConfig, ServerConfig,
    TimeoutConfig,
};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid arguments: {0}")]
    Args(#[from] clap::Error),

    #[error("validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Command-line interface of the `mockhttp` binary.
#[derive(Debug, Parser)]
#[command(name = "mockhttp")]
#[command(version, about = "A mock HTTP server that echoes requests back", long_about = None)]
pub struct Cli {
    /// Port to run the server on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Interface to bind
    #[arg(long, env = "MOCKHTTP_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Largest delay accepted by /delay/{seconds} (unbounded when unset)
    #[arg(long, env = "MOCKHTTP_MAX_DELAY", value_name = "SECONDS")]
    pub max_delay: Option<u64>,

    /// Whole-request timeout (disabled when unset)
    #[arg(long, env = "MOCKHTTP_REQUEST_TIMEOUT", value_name = "SECONDS")]
    pub request_timeout: Option<u64>,

    /// Grace period for in-flight requests after a shutdown signal
    #[arg(long, env = "MOCKHTTP_SHUTDOWN_TIMEOUT", value_name = "SECONDS", default_value_t = 10)]
    pub shutdown_timeout: u64,

    /// Maximum accepted request body size
    #[arg(long, env = "MOCKHTTP_MAX_BODY_BYTES", default_value_t = 1024 * 1024)]
    pub max_body_bytes: usize,

    /// Log filter directive
    #[arg(long, env = "RUST_LOG", default_value = "mockhttp=info,tower_http=info")]
    pub log_level: String,

    /// Log output format: pretty or json
    #[arg(long, env = "MOCKHTTP_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    /// Expose Prometheus metrics on this address
    #[arg(long, env = "MOCKHTTP_METRICS_ADDRESS", value_name = "ADDR")]
    pub metrics_address: Option<String>,
}

impl Cli {
    pub fn into_config(self) -> ServerConfig {
        ServerConfig {
            listener: ListenerConfig {
                host: self.host,
                port: self.port,
            },
            delay: DelayConfig {
                max_secs: self.max_delay,
            },
            limits: LimitConfig {
                max_body_bytes: self.max_body_bytes,
            },
            timeouts: TimeoutConfig {
                request_secs: self.request_timeout,
                shutdown_secs: self.shutdown_timeout,
            },
            observability: ObservabilityConfig {
                log_level: self.log_level,
                log_format: self.log_format,
                metrics_address: self.metrics_address,
            },
        }
    }
}

/// Resolve and validate configuration from parsed arguments.
pub fn load_config(cli: Cli) -> Result<ServerConfig, ConfigError> {
    let config = cli.into_config();
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Parse `args` (first item is the program name), then resolve and validate.
pub fn load_from_args<I, T>(args: I) -> Result<ServerConfig, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    load_config(Cli::try_parse_from(args)?)
}

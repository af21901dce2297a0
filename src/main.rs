//! mockhttp
//!
//! A diagnostic HTTP service for exercising HTTP clients. Every endpoint
//! reflects some property of the incoming request or produces a
//! controllable response (forced status, delay, fixed payloads).
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ TcpListener ──▶ axum (trace, body limit, timeout)
//!                                        │
//!                                        ▼
//!                                 route table (verb + template)
//!                                   │          │
//!                           404 / 405          ▼
//!                                       endpoint handler
//!     Client Response                          │
//!     ◀────────────────────── response encoder ◀┘
//!
//!     Cross-cutting: config (flags/env), logging, metrics, shutdown
//! ```

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use mockhttp::config::{load_config, Cli};
use mockhttp::lifecycle::{signals, Shutdown};
use mockhttp::observability::{logging, metrics};
use mockhttp::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match load_config(Cli::parse()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("mockhttp: {e}");
            std::process::exit(2);
        }
    };

    logging::init_logging(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "mockhttp starting");
    if let Ok(rendered) = serde_json::to_string(&config) {
        tracing::debug!(config = %rendered, "Configuration loaded");
    }

    if let Some(address) = &config.observability.metrics_address {
        match address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(metrics_address = %address, error = %e, "Failed to start metrics exporter");
                    return Err(e.into());
                }
            }
            Err(e) => {
                tracing::error!(metrics_address = %address, "Failed to parse metrics address");
                return Err(e.into());
            }
        }
    }

    let bind_address = config.listener.bind_address();
    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(address = %bind_address, error = %e, "Failed to bind listener");
            return Err(e.into());
        }
    };
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    signals::trigger_on_termination(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

//! F5 BIG-IP management API mock.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────────┐
//!                      │                     F5 MOCK                          │
//!                      │                                                      │
//!   Client Request     │  ┌─────────┐    ┌─────────┐    ┌──────────────┐      │
//!   ───────────────────┼─▶│   net   │───▶│  http   │───▶│   api auth   │      │
//!                      │  │ TLS/TCP │    │ layers  │    │   + version  │      │
//!                      │  └─────────┘    └─────────┘    └──────┬───────┘      │
//!                      │                                       ▼              │
//!                      │                               ┌──────────────┐       │
//!                      │                               │ api handlers │       │
//!                      │                               └──────┬───────┘       │
//!                      │                                       ▼              │
//!   Client Response    │               ┌────────────┐   ┌──────────────┐      │
//!   ◀──────────────────┼───────────────│ validation │◀──│ ConfigStore  │      │
//!                      │               └────────────┘   │  + vfs       │      │
//!                      │                                └──────────────┘      │
//!                      │  ┌────────────────────────────────────────────────┐  │
//!                      │  │ config · observability · lifecycle · auth      │  │
//!                      │  └────────────────────────────────────────────────┘  │
//!                      └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use f5_mock::config::validation::validate_config;
use f5_mock::config::{load_config, read_config, ConfigError, MockConfig, Overrides};
use f5_mock::http::HttpServer;
use f5_mock::lifecycle::{bootstrap, Shutdown};
use f5_mock::net::load_tls_config;
use f5_mock::observability::{logging::init_logging, metrics::init_metrics};

#[derive(Debug, Parser)]
#[command(name = "f5-mock", version, about = "Mock of the F5 BIG-IP management REST API")]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = resolve_config(cli.overrides)?;

    init_logging(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "f5-mock starting");

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        init_metrics(addr)?;
    }

    let addr: SocketAddr = config.listener.bind_address.parse()?;
    let tls = config.listener.tls.clone();
    tracing::info!(
        bind_address = %addr,
        tls = tls.is_some(),
        login_provider = config.auth.login_provider().unwrap_or("none"),
        "Configuration loaded"
    );

    let state = bootstrap(config)?;
    let server = HttpServer::new(state);

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    shutdown.trigger_on_signal();

    match tls {
        Some(tls) => {
            let rustls = load_tls_config(&tls).await?;
            server.run_tls(addr, rustls, receiver).await?;
        }
        None => {
            let listener = TcpListener::bind(addr).await?;
            server.run(listener, receiver).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Config file (if any) with command-line and environment overrides applied,
/// validated as a whole.
fn resolve_config(overrides: Overrides) -> Result<MockConfig, ConfigError> {
    if overrides.is_empty() {
        if let Some(path) = overrides.config.as_deref() {
            return load_config(path);
        }
    }

    let mut config = match overrides.config.as_deref() {
        Some(path) => read_config(path)?,
        None => MockConfig::default(),
    };
    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Hold the shared application state handed to every handler
//! - Create the Axum router with the management API
//! - Wire up middleware (request ID, tracing, metrics, body limit)
//! - Serve plain HTTP on a bound listener, or HTTPS via rustls
//! - Stop accepting and drain in-flight requests on shutdown
//!
//! # Design Decisions
//! - State is cloned per request; everything mutable sits behind an `Arc`
//!   with its own synchronization
//! - Layers are ordered so the request ID exists before the trace span opens

use axum::{extract::DefaultBodyLimit, middleware, Router};
use axum_server::{tls_rustls::RustlsConfig, Handle};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::api;
use crate::auth::{AdminIdentity, TokenCache};
use crate::config::MockConfig;
use crate::http::request::{make_span, track_metrics};
use crate::store::ConfigStore;

/// Time allowed for in-flight TLS connections to finish after shutdown.
const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ConfigStore>,
    pub tokens: Arc<TokenCache>,
    pub config: Arc<MockConfig>,
    pub admin: Arc<AdminIdentity>,
}

impl AppState {
    pub fn new(config: MockConfig, store: ConfigStore) -> Self {
        let admin = AdminIdentity::new(
            config.auth.admin_username.clone(),
            config.auth.admin_password.clone(),
        );
        Self {
            store: Arc::new(store),
            tokens: Arc::new(TokenCache::new(config.auth.token_ttl())),
            admin: Arc::new(admin),
            config: Arc::new(config),
        }
    }

    /// Login provider name when external auth is enabled.
    pub fn login_provider(&self) -> Option<&str> {
        self.config.auth.login_provider()
    }

    pub fn default_partition(&self) -> Option<&str> {
        self.config.api.default_partition()
    }
}

/// HTTP server for the management API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over the given state.
    pub fn new(state: AppState) -> Self {
        let max_body_bytes = state.config.listener.max_body_bytes;
        let router = Self::build_router(state, max_body_bytes);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState, max_body_bytes: usize) -> Router {
        api::router(state)
            .layer(middleware::from_fn(track_metrics))
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(max_body_bytes))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for driving the API without a socket.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serve plain HTTP on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve HTTPS on `addr` until `shutdown` fires.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let handle = Handle::new();

        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            shutdown_handle.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
        });

        tracing::info!(address = %addr, "HTTPS server starting");
        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

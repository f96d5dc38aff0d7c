//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the three routes
//! - Wire up middleware (request ID, tracing)
//! - Bind server to listener
//! - Stop gracefully when the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::flags::FlagService;
use crate::http::handlers::{health_check, reset_counter, visit_counter};
use crate::http::request::{request_id_header, request_id_of, MakeRequestUuidV4};
use crate::store::{Connector, Store};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub connector: Connector,
    pub flags: FlagService,
    pub counter_key: Arc<str>,
    /// Deadline for one handler, store retries included.
    pub request_timeout: Duration,
}

/// HTTP server for the visit counter.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and collaborators.
    pub fn new(config: AppConfig, store: Arc<dyn Store>, flags: FlagService) -> Self {
        let state = AppState {
            connector: Connector::from_config(store, &config.store),
            flags,
            counter_key: Arc::from(config.store.counter_key.as_str()),
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
        };

        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id_header(), MakeRequestUuidV4))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id_of(request),
                )
            }))
            .layer(PropagateRequestIdLayer::new(request_id_header()));

        Router::new()
            .route("/", get(visit_counter))
            .route("/reiniciar", get(reset_counter))
            .route("/health", get(health_check))
            .with_state(state)
            .layer(middleware)
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

//! HTTP shell around the simulation engine
//!
//! - `POST /api/simulation` runs one simulation
//! - `GET /health` reports liveness

pub mod config;
pub mod error;
pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::config::ServerConfig;

/// Build the application router
pub fn build_router() -> Router {
    // The front end is served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/simulation",
            post(handlers::run_simulation).options(handlers::preflight),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Server instance that can be started
pub struct Server {
    config: ServerConfig,
    router: Router,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            router: build_router(),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Bind to the configured address and serve until the process exits.
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.config.socket_addr()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, self.router).await?;
        Ok(())
    }
}

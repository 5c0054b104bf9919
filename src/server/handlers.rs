//! REST API handlers

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::io::request::{SimulationRequest, SimulationResponse};
use crate::server::error::ApiError;
use crate::simulation::config::SimulationParameters;
use crate::simulation::error::SimulationError;
use crate::simulation::random::fresh_seed;
use crate::simulation::simulate;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /api/simulation - run one stock price simulation
pub async fn run_simulation(
    payload: Result<Json<SimulationRequest>, JsonRejection>,
) -> Result<Json<SimulationResponse>, ApiError> {
    let Json(request) = payload?;
    let params = SimulationParameters::try_from(&request)?;
    let seed = request.seed.unwrap_or_else(fresh_seed);
    info!(?params, seed, "received simulation parameters");

    // Sampling is CPU-bound; keep it off the async workers.
    let result = tokio::task::spawn_blocking(move || simulate(params, seed))
        .await
        .map_err(|e| SimulationError::InternalFailure(format!("simulation task: {e}")))??;
    Ok(Json(SimulationResponse::new(result, seed)))
}

/// OPTIONS /api/simulation - bare preflight without CORS headers
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

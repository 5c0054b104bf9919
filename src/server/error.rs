//! Mapping of simulation failures onto HTTP responses

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::simulation::error::SimulationError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Body was not valid JSON or lacked a field.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

/// Error payload, shaped like the one the front end already handles.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Simulation(SimulationError::InvalidParameter { .. }) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Simulation(SimulationError::InternalFailure(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = if status.is_client_error() {
            tracing::warn!(error = %self, "rejected simulation request");
            ErrorBody {
                error: "Invalid input data".to_string(),
                details: Some(self.to_string()),
            }
        } else {
            tracing::error!(error = %self, "simulation failed");
            ErrorBody {
                error: "Internal simulation failure".to_string(),
                details: None,
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_is_a_client_error() {
        let err = ApiError::from(SimulationError::invalid("order_f", "must be positive"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_failure_is_a_server_error() {
        let err = ApiError::from(SimulationError::InternalFailure("boom".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn malformed_body_is_a_client_error() {
        let err = ApiError::MalformedBody("expected value".into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}

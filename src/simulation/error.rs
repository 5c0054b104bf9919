// src/simulation/error.rs

use rand_distr::{BinomialError, PoissonError};
use thiserror::Error;

/// Failures that abort a simulation run.
///
/// A zero inventory buffer in the pricing formula is not an error: it is
/// clamped and recorded in `StockPriceResult::singular_indices`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// A caller-supplied value violates a documented constraint.
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    /// Something went wrong inside the pipeline after validation passed.
    #[error("internal simulation failure: {0}")]
    InternalFailure(String),
}

impl SimulationError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }
}

impl From<PoissonError> for SimulationError {
    fn from(err: PoissonError) -> Self {
        Self::InternalFailure(format!("poisson sampler: {err}"))
    }
}

impl From<BinomialError> for SimulationError {
    fn from(err: BinomialError) -> Self {
        Self::InternalFailure(format!("binomial sampler: {err}"))
    }
}

pub type SimulationResult<T> = Result<T, SimulationError>;

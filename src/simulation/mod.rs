pub mod config;
pub mod engine;
pub mod error;
pub mod random;

use tracing::debug;

use crate::simulation::config::SimulationParameters;
use crate::simulation::engine::{StockPriceEngine, StockPriceResult};
use crate::simulation::error::SimulationResult;
use crate::simulation::random::seeded_rng;

/// Validates `params` and runs one simulation with a generator built from `seed`.
pub fn simulate(params: SimulationParameters, seed: u64) -> SimulationResult<StockPriceResult> {
    let engine = StockPriceEngine::new(params)?;
    let result = engine.compute(&mut seeded_rng(seed))?;
    debug!(
        seed,
        orders = result.len(),
        first_critical_index = ?result.first_critical_index,
        singular = result.singular_indices.len(),
        "stock price run complete"
    );
    Ok(result)
}

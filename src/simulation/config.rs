// src/simulation/config.rs

use crate::model::orders::OrderProfile;
use crate::simulation::error::{SimulationError, SimulationResult};

/// Largest number of order events a single run may draw.
pub const MAX_ORDER_COUNT: usize = 1_000_000;

/// Business inputs for one stock price run.
///
/// Values are immutable for the duration of a run. Call [`validate`] before
/// handing them to the engine; the engine calls it again so an unchecked
/// struct can never reach the samplers.
///
/// [`validate`]: SimulationParameters::validate
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParameters {
    /// Supply unit cost.
    pub unit_price: f64,
    /// Sale unit price.
    pub unit_sale: f64,
    /// Target markup on expenses.
    pub benefit_rate: f64,
    /// Fixed cost per period.
    pub fixed_expenses: f64,
    /// Days between a restock dispatch and the order it covers.
    pub supply_delay: u32,
    /// Supply inflation factor (alpha).
    pub stock_rate: f64,
    /// Number of simulated order events (n).
    pub order_count: usize,
    /// Poisson mean of the gap between two orders, in days (lambda).
    pub order_frequency: u32,
    /// Simulation cutoff date (d).
    pub horizon_days: u32,
    /// Mean quantity scale (m).
    pub order_mean_qty: u32,
    /// Quantity variance parameter (sigma).
    pub order_fluctuation: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            unit_price: 50.0,
            unit_sale: 100.0,
            benefit_rate: 0.1,
            fixed_expenses: 10_000.0,
            supply_delay: 5,
            stock_rate: 0.2,
            order_count: 50,
            order_frequency: 4,
            horizon_days: 60,
            order_mean_qty: 100,
            order_fluctuation: 5.0,
        }
    }
}

impl SimulationParameters {
    /// Checks every range constraint once, before any sampling happens.
    ///
    /// `order_count == 0` is accepted: it produces an empty series.
    pub fn validate(&self) -> SimulationResult<()> {
        let floats = [
            ("unit_price", self.unit_price),
            ("unit_sale", self.unit_sale),
            ("benefit_rate", self.benefit_rate),
            ("fixed_expenses", self.fixed_expenses),
            ("stock_rate", self.stock_rate),
            ("order_fluctuation", self.order_fluctuation),
        ];
        for (field, value) in floats {
            if !value.is_finite() {
                return Err(SimulationError::invalid(field, "must be a finite number"));
            }
        }

        if self.order_frequency == 0 {
            return Err(SimulationError::invalid(
                "order_frequency",
                "must be strictly positive",
            ));
        }
        if self.horizon_days == 0 {
            return Err(SimulationError::invalid(
                "horizon_days",
                "must be strictly positive",
            ));
        }
        if self.stock_rate < -1.0 {
            return Err(SimulationError::invalid(
                "stock_rate",
                "must be at least -1 so restocking never goes negative",
            ));
        }
        if self.order_count > MAX_ORDER_COUNT {
            return Err(SimulationError::invalid(
                "order_count",
                format!("{} is out of range (at most {MAX_ORDER_COUNT})", self.order_count),
            ));
        }

        // Mean quantity, fluctuation and trial count are checked by the profile.
        let profile = OrderProfile::from(self);
        profile.success_probability()?;
        profile.binomial_trials()?;

        Ok(())
    }
}

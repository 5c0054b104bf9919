// src/simulation/engine.rs

use rand::Rng;
use serde::Serialize;
use tracing::warn;

use crate::model::orders::{first_difference, generate_order_quantities, OrderProfile};
use crate::model::supply::{generate_supply, SupplySeries};
use crate::simulation::config::SimulationParameters;
use crate::simulation::error::SimulationResult;

/// Output of one run: four aligned series plus the depletion marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StockPriceResult {
    pub dates: Vec<u64>,
    /// Price per date, clamped at zero.
    pub stock_price: Vec<f64>,
    pub quantity_ordered: Vec<u64>,
    pub cumulative_supply: Vec<i64>,
    /// First index whose price was zero or below, if any.
    pub first_critical_index: Option<usize>,
    /// Indices where supply exactly matched orders and the ratio was undefined.
    pub singular_indices: Vec<usize>,
}

impl StockPriceResult {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Date at which the stock price first hit zero.
    pub fn depletion_date(&self) -> Option<u64> {
        self.first_critical_index.map(|i| self.dates[i])
    }
}

/// Turns order arrivals and restocking into a stock price series.
#[derive(Debug, Clone)]
pub struct StockPriceEngine {
    params: SimulationParameters,
}

impl StockPriceEngine {
    /// Validates `params` up front; an invalid set never reaches the samplers.
    pub fn new(params: SimulationParameters) -> SimulationResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// Runs the full pipeline with the caller's generator.
    pub fn compute<R: Rng + ?Sized>(&self, rng: &mut R) -> SimulationResult<StockPriceResult> {
        let profile = OrderProfile::from(&self.params);
        let orders = generate_order_quantities(rng, &profile)?;
        let supply = generate_supply(self.params.supply_delay, self.params.stock_rate, &orders);

        Ok(self.price_supply(&supply))
    }

    /// Applies the pricing formula to an existing supply table.
    pub fn price_supply(&self, supply: &SupplySeries) -> StockPriceResult {
        let mut stock_price = Vec::with_capacity(supply.len());
        let mut first_critical_index = None;
        let mut singular_indices = Vec::new();

        for (i, (&ordered, &supplied)) in supply
            .cumulative_orders
            .iter()
            .zip(&supply.cumulative_supply)
            .enumerate()
        {
            let price = match self.raw_price(ordered as f64, supplied as f64) {
                Some(price) => price,
                None => {
                    warn!(
                        index = i,
                        date = supply.order_dates[i],
                        "supply equals orders, price undefined"
                    );
                    singular_indices.push(i);
                    0.0
                }
            };

            // NaN fails this comparison as well and is treated as depleted.
            if price > 0.0 {
                stock_price.push(price);
            } else {
                first_critical_index.get_or_insert(i);
                stock_price.push(0.0);
            }
        }

        StockPriceResult {
            dates: supply.order_dates.clone(),
            stock_price,
            quantity_ordered: first_difference(&supply.cumulative_orders),
            cumulative_supply: supply.cumulative_supply.clone(),
            first_critical_index,
            singular_indices,
        }
    }

    /// `(F(1 + b) - s*S + u*C) / (C - S)`, or `None` when `C == S`.
    fn raw_price(&self, ordered: f64, supplied: f64) -> Option<f64> {
        let p = &self.params;
        let buffer = supplied - ordered;
        if buffer == 0.0 {
            return None;
        }
        let margin = p.fixed_expenses * (1.0 + p.benefit_rate) - p.unit_sale * ordered
            + p.unit_price * supplied;
        Some(margin / buffer)
    }
}

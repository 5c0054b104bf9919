// src/io/request.rs

//! Mapping between the HTTP payload and the simulation types.
//!
//! The payload keeps the field names used by the web front end
//! (`u_price`, `expences_F`, `order_n`, ...). Every numeric field may be sent
//! either as a JSON number or as a numeric string.

use serde::{Deserialize, Serialize};

use crate::simulation::config::SimulationParameters;
use crate::simulation::engine::StockPriceResult;
use crate::simulation::error::{SimulationError, SimulationResult};

/// A number as it arrives on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(serde_json::Number),
    Text(String),
}

/// Body of `POST /api/simulation`.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationRequest {
    pub u_price: NumericInput,
    pub u_sale: NumericInput,
    pub benefit_rate: NumericInput,
    #[serde(rename = "expences_F")]
    pub expences_f: NumericInput,
    pub delay_supply: NumericInput,
    pub stock_rate: NumericInput,
    pub order_n: NumericInput,
    pub order_f: NumericInput,
    pub due_date: NumericInput,
    pub order_q: NumericInput,
    pub order_fluc: NumericInput,
    /// Replays a previous run when set.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl TryFrom<&SimulationRequest> for SimulationParameters {
    type Error = SimulationError;

    fn try_from(req: &SimulationRequest) -> SimulationResult<Self> {
        let params = SimulationParameters {
            unit_price: float_field("u_price", &req.u_price)?,
            unit_sale: float_field("u_sale", &req.u_sale)?,
            benefit_rate: float_field("benefit_rate", &req.benefit_rate)?,
            fixed_expenses: float_field("expences_F", &req.expences_f)?,
            supply_delay: int_field("delay_supply", &req.delay_supply)?,
            stock_rate: float_field("stock_rate", &req.stock_rate)?,
            order_count: int_field("order_n", &req.order_n)?,
            order_frequency: int_field("order_f", &req.order_f)?,
            horizon_days: int_field("due_date", &req.due_date)?,
            order_mean_qty: int_field("order_q", &req.order_q)?,
            order_fluctuation: float_field("order_fluc", &req.order_fluc)?,
        };
        params.validate()?;
        Ok(params)
    }
}

/// Body returned for a successful run. The four series have equal length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub dates: Vec<u64>,
    pub stock_price: Vec<f64>,
    pub quantity_ordered: Vec<u64>,
    pub cumulative_supply: Vec<i64>,
    pub first_critical_index: Option<usize>,
    pub seed: u64,
}

impl SimulationResponse {
    pub fn new(result: StockPriceResult, seed: u64) -> Self {
        Self {
            dates: result.dates,
            stock_price: result.stock_price,
            quantity_ordered: result.quantity_ordered,
            cumulative_supply: result.cumulative_supply,
            first_critical_index: result.first_critical_index,
            seed,
        }
    }
}

fn float_field(field: &'static str, input: &NumericInput) -> SimulationResult<f64> {
    let value = match input {
        NumericInput::Number(n) => n.as_f64(),
        NumericInput::Text(s) => s.trim().parse::<f64>().ok(),
    };
    value
        .filter(|v| v.is_finite())
        .ok_or_else(|| SimulationError::invalid(field, format!("expected a number, got {input:?}")))
}

fn int_field<T: TryFrom<i64>>(field: &'static str, input: &NumericInput) -> SimulationResult<T> {
    let value = match input {
        NumericInput::Number(n) if n.is_f64() => n.as_f64().map(|v| whole_float(field, v)),
        NumericInput::Number(n) => n.as_i64().map(Ok),
        NumericInput::Text(s) => s.trim().parse::<i64>().ok().map(Ok),
    };
    let value = value.ok_or_else(|| {
        SimulationError::invalid(field, format!("expected an integer, got {input:?}"))
    })??;
    T::try_from(value)
        .map_err(|_| SimulationError::invalid(field, format!("{value} is out of range")))
}

/// Accepts `30.0` as `30`; anything fractional or beyond `i64` is rejected.
fn whole_float(field: &'static str, value: f64) -> SimulationResult<i64> {
    if value.fract() != 0.0 {
        return Err(SimulationError::invalid(
            field,
            format!("expected an integer, got {value}"),
        ));
    }
    // 2^63 is exactly representable; anything at or above it overflows i64.
    if !(-9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0).contains(&value) {
        return Err(SimulationError::invalid(
            field,
            format!("{value} is out of range"),
        ));
    }
    Ok(value as i64)
}

// src/model/supply.rs

use serde::Serialize;

use crate::model::orders::OrderQuantitySeries;

/// Restocking plan derived from the order table, row for row.
///
/// Row `i` describes the supply dispatched for order `i`: it leaves `delay`
/// days before the order date and is inflated by `1 + alpha`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SupplySeries {
    /// Dispatch dates. May be negative or out of order relative to real time.
    pub supply_dates: Vec<i64>,
    /// Running total of supplied units.
    pub cumulative_supply: Vec<i64>,
    /// Date of the order each row covers.
    pub order_dates: Vec<u64>,
    /// Running total of ordered units at that order.
    pub cumulative_orders: Vec<u64>,
}

impl SupplySeries {
    pub fn len(&self) -> usize {
        self.supply_dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supply_dates.is_empty()
    }
}

/// Shifts every order back by `delay` days and sizes its restock at
/// `round(quantity * (1 + alpha))`, rounding halves to even.
pub fn generate_supply(delay: u32, alpha: f64, orders: &OrderQuantitySeries) -> SupplySeries {
    let supply_dates = orders
        .dates
        .iter()
        .map(|&date| date as i64 - i64::from(delay))
        .collect();

    let inflation = 1.0 + alpha;
    let mut cumulative_supply = Vec::with_capacity(orders.len());
    let mut running = 0i64;
    for &quantity in &orders.quantities {
        let restock = (quantity as f64 * inflation).round_ties_even() as i64;
        running = running.saturating_add(restock);
        cumulative_supply.push(running);
    }

    SupplySeries {
        supply_dates,
        cumulative_supply,
        order_dates: orders.dates.clone(),
        cumulative_orders: orders.cumulative.clone(),
    }
}

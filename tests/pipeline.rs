//! End-to-end checks of the simulation pipeline through the public API.

use stock_price_dynamics::model::orders::{
    generate_order_dates, generate_order_quantities, horizon_prefix_len, OrderProfile,
};
use stock_price_dynamics::model::supply::generate_supply;
use stock_price_dynamics::simulation::random::seeded_rng;
use stock_price_dynamics::{simulate, SimulationError, SimulationParameters, StockPriceEngine};

#[test]
fn default_scenario_invariants() {
    let params = SimulationParameters::default();
    let horizon = u64::from(params.horizon_days);
    let result = simulate(params, 2024).unwrap();

    assert_eq!(result.stock_price.len(), result.len());
    assert_eq!(result.quantity_ordered.len(), result.len());
    assert_eq!(result.cumulative_supply.len(), result.len());
    assert!(result.dates.iter().all(|&d| d <= horizon));
    assert!(result.stock_price.iter().all(|&p| p >= 0.0));
    assert!(result.cumulative_supply.windows(2).all(|w| w[0] <= w[1]));

    if let Some(first) = result.first_critical_index {
        assert_eq!(result.stock_price[first], 0.0);
        assert!(result.stock_price[..first].iter().all(|&p| p > 0.0));
    }
}

#[test]
fn seeded_runs_are_bit_identical() {
    let a = simulate(SimulationParameters::default(), 31337).unwrap();
    let b = simulate(SimulationParameters::default(), 31337).unwrap();
    assert_eq!(a, b);
    let prices_a: Vec<u64> = a.stock_price.iter().map(|p| p.to_bits()).collect();
    let prices_b: Vec<u64> = b.stock_price.iter().map(|p| p.to_bits()).collect();
    assert_eq!(prices_a, prices_b);
}

#[test]
fn small_order_scenario_length_matches_dates_in_horizon() {
    let profile = OrderProfile {
        count: 5,
        frequency: 2,
        horizon_days: 10,
        mean_qty: 100,
        fluctuation: 1.0,
    };
    for seed in 0..20 {
        let orders = generate_order_quantities(&mut seeded_rng(seed), &profile).unwrap();
        let dates = generate_order_dates(&mut seeded_rng(seed), 5, 2.0).unwrap();

        assert!(orders.len() <= 5);
        assert_eq!(orders.len(), horizon_prefix_len(&dates, 10));
        assert!(orders.cumulative.windows(2).all(|w| w[0] <= w[1]));
    }
}

#[test]
fn supply_rows_follow_orders_one_to_one() {
    let profile = OrderProfile {
        count: 40,
        frequency: 3,
        horizon_days: 90,
        mean_qty: 50,
        fluctuation: 2.0,
    };
    let orders = generate_order_quantities(&mut seeded_rng(5), &profile).unwrap();
    let supply = generate_supply(4, 0.25, &orders);

    assert_eq!(supply.len(), orders.len());
    for i in 0..orders.len() {
        assert_eq!(supply.supply_dates[i], orders.dates[i] as i64 - 4);
        assert_eq!(supply.order_dates[i], orders.dates[i]);
        assert_eq!(supply.cumulative_orders[i], orders.cumulative[i]);
    }
}

#[test]
fn excessive_fluctuation_is_invalid_parameter() {
    let params = SimulationParameters {
        order_mean_qty: 10,
        order_fluctuation: 4.0,
        ..Default::default()
    };
    match StockPriceEngine::new(params) {
        Err(SimulationError::InvalidParameter { field, .. }) => {
            assert_eq!(field, "order_fluctuation")
        }
        other => panic!("expected InvalidParameter, got {other:?}"),
    }
}

#[test]
fn zero_orders_is_empty_not_error() {
    let params = SimulationParameters {
        order_count: 0,
        ..Default::default()
    };
    let result = simulate(params, 1).unwrap();
    assert!(result.is_empty());
    assert_eq!(result.depletion_date(), None);
}

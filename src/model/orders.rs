// src/model/orders.rs

use rand::Rng;
use rand_distr::{Binomial, Distribution, Poisson};
use serde::Serialize;

use crate::simulation::config::SimulationParameters;
use crate::simulation::error::{SimulationError, SimulationResult};

/// The subset of parameters that drives customer order generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderProfile {
    /// Number of order events to draw (n).
    pub count: usize,
    /// Poisson mean of the inter-arrival gap (lambda).
    pub frequency: u32,
    /// Last day kept in the series (d).
    pub horizon_days: u32,
    /// Mean quantity scale (m).
    pub mean_qty: u32,
    /// Quantity variance parameter (sigma).
    pub fluctuation: f64,
}

impl From<&SimulationParameters> for OrderProfile {
    fn from(params: &SimulationParameters) -> Self {
        Self {
            count: params.order_count,
            frequency: params.order_frequency,
            horizon_days: params.horizon_days,
            mean_qty: params.order_mean_qty,
            fluctuation: params.order_fluctuation,
        }
    }
}

impl OrderProfile {
    /// Trial count of the quantity sampler: `n * lambda`.
    pub fn binomial_trials(&self) -> SimulationResult<u64> {
        u64::try_from(self.count)
            .ok()
            .and_then(|n| n.checked_mul(u64::from(self.frequency)))
            .ok_or_else(|| {
                SimulationError::invalid("order_count", "order_count * order_frequency overflows")
            })
    }

    /// Success probability of the quantity sampler: `1 - sigma^2 / m`.
    pub fn success_probability(&self) -> SimulationResult<f64> {
        if self.mean_qty == 0 {
            return Err(SimulationError::invalid(
                "order_mean_qty",
                "must be strictly positive",
            ));
        }
        let probability = 1.0 - self.fluctuation.powi(2) / f64::from(self.mean_qty);
        if !(0.0..=1.0).contains(&probability) {
            return Err(SimulationError::invalid(
                "order_fluctuation",
                format!(
                    "fluctuation too large relative to order_mean_qty ({}^2 > {})",
                    self.fluctuation, self.mean_qty
                ),
            ));
        }
        Ok(probability)
    }
}

/// Orders that fall at or before the horizon, one row per order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderQuantitySeries {
    /// Order dates (day indices), non-decreasing.
    pub dates: Vec<u64>,
    /// Quantity ordered on each date.
    pub quantities: Vec<u64>,
    /// Running total of `quantities`.
    pub cumulative: Vec<u64>,
}

impl OrderQuantitySeries {
    /// Builds the table from dates and an already cumulative quantity column.
    ///
    /// # Panics
    /// If the two columns differ in length.
    pub fn from_cumulative(dates: Vec<u64>, cumulative: Vec<u64>) -> Self {
        assert_eq!(
            dates.len(),
            cumulative.len(),
            "dates and cumulative quantities must be aligned"
        );
        let quantities = first_difference(&cumulative);
        Self {
            dates,
            quantities,
            cumulative,
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Draws `count` Poisson gaps with mean `rate` and returns their running sum.
///
/// Gaps of zero are legal, so two orders may share a day.
pub fn generate_order_dates<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    rate: f64,
) -> SimulationResult<Vec<u64>> {
    if !(rate.is_finite() && rate > 0.0) {
        return Err(SimulationError::invalid(
            "order_frequency",
            format!("poisson rate must be strictly positive, got {rate}"),
        ));
    }
    if count == 0 {
        return Ok(Vec::new());
    }

    let poisson = Poisson::new(rate)?;
    let mut dates = Vec::with_capacity(count);
    let mut day = 0u64;
    for _ in 0..count {
        let gap: f64 = poisson.sample(rng);
        day = day.saturating_add(gap as u64);
        dates.push(day);
    }
    Ok(dates)
}

/// Number of leading dates that fall at or before `horizon`.
///
/// The scan stops at the first date past the horizon; later dates are never
/// looked at, even if one of them would qualify on its own.
pub fn horizon_prefix_len(dates: &[u64], horizon: u64) -> usize {
    dates.iter().take_while(|&&date| date <= horizon).count()
}

/// Generates the order table for one run.
///
/// Dates are drawn first, truncated to the horizon prefix, and then one
/// binomial quantity (`n * lambda` trials, success `1 - sigma^2 / m`) is drawn
/// per retained date.
pub fn generate_order_quantities<R: Rng + ?Sized>(
    rng: &mut R,
    profile: &OrderProfile,
) -> SimulationResult<OrderQuantitySeries> {
    // Reject a bad probability before any draw is made.
    let probability = profile.success_probability()?;
    let trials = profile.binomial_trials()?;

    let mut dates = generate_order_dates(rng, profile.count, f64::from(profile.frequency))?;
    let kept = horizon_prefix_len(&dates, u64::from(profile.horizon_days));
    dates.truncate(kept);

    if dates.is_empty() {
        return Ok(OrderQuantitySeries::default());
    }

    let binomial = Binomial::new(trials, probability)?;
    let mut cumulative = Vec::with_capacity(kept);
    let mut running = 0u64;
    for _ in 0..kept {
        running = running.saturating_add(binomial.sample(rng));
        cumulative.push(running);
    }

    Ok(OrderQuantitySeries::from_cumulative(dates, cumulative))
}

/// First difference of a running total, with an implicit zero before it.
pub fn first_difference(cumulative: &[u64]) -> Vec<u64> {
    let mut previous = 0u64;
    cumulative
        .iter()
        .map(|&total| {
            let step = total.saturating_sub(previous);
            previous = total;
            step
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::random::seeded_rng;
    use rand::RngCore;

    /// Counts draws so tests can assert that nothing was sampled.
    struct CountingRng<R> {
        inner: R,
        draws: usize,
    }

    impl<R: RngCore> RngCore for CountingRng<R> {
        fn next_u32(&mut self) -> u32 {
            self.draws += 1;
            self.inner.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.draws += 1;
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.draws += 1;
            self.inner.fill_bytes(dest)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.draws += 1;
            self.inner.try_fill_bytes(dest)
        }
    }

    fn profile(count: usize, frequency: u32, horizon_days: u32) -> OrderProfile {
        OrderProfile {
            count,
            frequency,
            horizon_days,
            mean_qty: 100,
            fluctuation: 1.0,
        }
    }

    #[test]
    fn order_dates_have_requested_length_and_never_decrease() {
        let mut rng = seeded_rng(42);
        let dates = generate_order_dates(&mut rng, 200, 3.0).unwrap();
        assert_eq!(dates.len(), 200);
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn order_dates_reject_non_positive_rate() {
        let mut rng = seeded_rng(1);
        for rate in [0.0, -2.0, f64::NAN] {
            let err = generate_order_dates(&mut rng, 5, rate).unwrap_err();
            assert!(err.is_invalid_parameter());
        }
    }

    #[test]
    fn zero_orders_give_no_dates() {
        let mut rng = seeded_rng(1);
        assert!(generate_order_dates(&mut rng, 0, 2.0).unwrap().is_empty());
    }

    #[test]
    fn prefix_scan_stops_at_first_date_past_horizon() {
        assert_eq!(horizon_prefix_len(&[1, 4, 10, 12, 3], 10), 3);
        assert_eq!(horizon_prefix_len(&[11, 2, 3], 10), 0);
        assert_eq!(horizon_prefix_len(&[], 10), 0);
        assert_eq!(horizon_prefix_len(&[0, 0, 5], 10), 3);
    }

    #[test]
    fn first_difference_treats_predecessor_as_zero() {
        assert_eq!(first_difference(&[5, 9, 9, 20]), vec![5, 4, 0, 11]);
        assert!(first_difference(&[]).is_empty());
    }

    #[test]
    fn small_scenario_is_a_consistent_prefix() {
        let mut rng = seeded_rng(2024);
        let series = generate_order_quantities(&mut rng, &profile(5, 2, 10)).unwrap();

        let mut replay = seeded_rng(2024);
        let all_dates = generate_order_dates(&mut replay, 5, 2.0).unwrap();
        let expected_k = horizon_prefix_len(&all_dates, 10);

        assert_eq!(series.len(), expected_k);
        assert_eq!(series.dates, all_dates[..expected_k]);
        assert!(series.dates.iter().all(|&d| d <= 10));
        assert!(series.cumulative.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(series.quantities.len(), series.len());
    }

    #[test]
    fn certain_success_orders_every_trial() {
        let mut rng = seeded_rng(9);
        let profile = OrderProfile {
            fluctuation: 0.0,
            ..profile(4, 3, 10_000)
        };
        let series = generate_order_quantities(&mut rng, &profile).unwrap();
        assert_eq!(series.len(), 4);
        assert_eq!(series.quantities, vec![12; 4]);
        assert_eq!(series.cumulative, vec![12, 24, 36, 48]);
    }

    #[test]
    fn excessive_fluctuation_is_rejected_before_sampling() {
        let mut rng = CountingRng {
            inner: seeded_rng(3),
            draws: 0,
        };
        let profile = OrderProfile {
            fluctuation: 11.0,
            ..profile(5, 2, 10)
        };
        let err = generate_order_quantities(&mut rng, &profile).unwrap_err();
        assert!(err.is_invalid_parameter());
        assert_eq!(rng.draws, 0);
    }

    #[test]
    fn zero_orders_give_an_empty_series() {
        let mut rng = seeded_rng(5);
        let series = generate_order_quantities(&mut rng, &profile(0, 2, 10)).unwrap();
        assert!(series.is_empty());
        assert!(series.cumulative.is_empty());
    }

    #[test]
    fn same_seed_reproduces_the_series() {
        let a = generate_order_quantities(&mut seeded_rng(77), &profile(30, 2, 40)).unwrap();
        let b = generate_order_quantities(&mut seeded_rng(77), &profile(30, 2, 40)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn profile_checks_agree_with_parameter_validation() {
        for (mean, fluctuation) in [(9, 3.0), (9, 3.1), (1, 0.0), (0, 0.0)] {
            let params = SimulationParameters {
                order_mean_qty: mean,
                order_fluctuation: fluctuation,
                ..Default::default()
            };
            let profile = OrderProfile::from(&params);
            assert_eq!(
                params.validate().is_ok(),
                profile.success_probability().is_ok(),
                "mean {mean}, fluctuation {fluctuation}"
            );
        }
    }
}

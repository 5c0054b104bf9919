// src/io/reporting.rs

use crate::simulation::engine::StockPriceResult;
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tracing::info;

/// One CSV row per simulated order date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRecord {
    pub date: u64,
    pub stock_price: f64,
    pub quantity_ordered: u64,
    pub cumulative_supply: i64,
}

/// Zips the aligned result series into rows.
pub fn price_records(result: &StockPriceResult) -> Vec<PriceRecord> {
    result
        .dates
        .iter()
        .zip(&result.stock_price)
        .zip(&result.quantity_ordered)
        .zip(&result.cumulative_supply)
        .map(
            |(((&date, &stock_price), &quantity_ordered), &cumulative_supply)| PriceRecord {
                date,
                stock_price,
                quantity_ordered,
                cumulative_supply,
            },
        )
        .collect()
}

/// Writes the stock price series to a CSV file.
///
/// # Arguments
/// * `file_path` - The path to save the file (e.g., "results/run_1.csv").
/// * `result` - The output of one engine run.
pub fn write_simulation_log(
    file_path: impl AsRef<Path>,
    result: &StockPriceResult,
) -> Result<(), Box<dyn Error>> {
    let path = file_path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;

    let records = price_records(result);
    for record in &records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;

    info!(rows = records.len(), path = %path.display(), "exported stock price series");
    Ok(())
}

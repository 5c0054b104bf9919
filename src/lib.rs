//! Stock price dynamics of a retailer under random customer orders.
//!
//! Orders arrive on Poisson-spaced days with binomial quantities, restocking
//! follows them with a lead time and a markup, and the stock price is derived
//! from the gap between supply and demand.

pub mod io;
pub mod model;
pub mod server;
pub mod simulation;

pub use simulation::config::SimulationParameters;
pub use simulation::engine::{StockPriceEngine, StockPriceResult};
pub use simulation::error::{SimulationError, SimulationResult};
pub use simulation::simulate;

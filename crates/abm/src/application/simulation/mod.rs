//! Simulation Framework
//!
//! Runs a population through a time-stepped market driven by an external
//! asset-return series.
//!
//! # Period structure
//!
//! 1. Regime transition and sentiment update
//! 2. Base returns (external series scaled by regime, plus noise)
//! 3. Shared signal bundle (momentum, volatility, sentiment, regime)
//! 4. Per-agent perception and decision, optionally in parallel
//! 5. Aggregate demand (barrier)
//! 6. Price update from base return and price impact
//! 7. Settlement: mark-to-market, transaction costs, reputation
//!
//! Every agent draws from its own RNG stream, seeded from the caller's RNG in
//! agent order, so parallel and sequential runs are identical.

mod config;
mod decision;
mod regime;
mod result;
mod runner;
mod signals;

pub use config::{RegimeConfig, SimulationConfig};
pub use decision::raw_signal;
pub use result::{SimulationResult, SimulationSummary};
pub use runner::MarketSimulator;

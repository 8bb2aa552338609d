//! Agora Core
//!
//! Shared kernel for the market simulation and spillover analysis crates.
//! This crate contains no I/O and no randomness, and is 100% unit testable.
//!
//! - **error**: the error taxonomy shared by every stage
//! - **parallel**: rayon-or-sequential mapping behind the `parallel` feature
//! - **series**: validated rectangular return series
//! - **regime**: discrete market-volatility states
//! - **stats**: floating-point statistics (moments, correlation, quantiles, inequality)

pub mod error;
pub mod parallel;
pub mod regime;
pub mod series;
pub mod stats;

// Re-export commonly used types at crate root
pub use error::{AgoraError, Result};
pub use regime::Regime;
pub use series::ReturnSeries;
pub use stats::RollingStats;

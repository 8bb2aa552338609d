//! Population Construction
//!
//! Builds a [`Population`](crate::domain::Population) from a configuration and
//! an explicitly owned random source.

mod factory;
mod wealth;

pub use factory::{AgentPopulationFactory, PopulationConfig};
pub use wealth::WealthDistribution;

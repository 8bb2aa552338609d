//! Agent-Based Model (ABM) for market simulation
//!
//! This crate simulates a market populated by heterogeneous behavioral traders.
//! Prices are formed from aggregate demand on top of an external return series,
//! and every agent's wealth is marked to market each period.

pub mod application;
pub mod domain;

// Re-export key types at crate root
pub use application::network::{MultilayerNetworkBuilder, NetworkConfig};
pub use application::population::{AgentPopulationFactory, PopulationConfig, WealthDistribution};
pub use application::simulation::{
    MarketSimulator, RegimeConfig, SimulationConfig, SimulationResult, SimulationSummary,
};
pub use domain::{
    Agent, AgentGraph, AgentId, AgentType, BehaviorParams, MarketSignals, MarketState,
    MultilayerNetwork, Population, PopulationSummary,
};

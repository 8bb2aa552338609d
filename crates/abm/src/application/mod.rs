//! Application layer: Use cases and orchestration
//!
//! Contains:
//! - **population**: AgentPopulationFactory building typed, heterogeneous agents
//! - **network**: MultilayerNetworkBuilder for the trading/information/social graphs
//! - **simulation**: MarketSimulator running the period-by-period market

pub mod network;
pub mod population;
pub mod simulation;

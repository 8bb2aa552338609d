//! Domain layer: Agents, populations, networks and market state

mod agent;
mod behavior;
mod market_state;
mod network;
mod population;

pub use agent::{Agent, AgentId, BehaviorParams};
pub use behavior::{AgentType, BehaviorTemplate};
pub use market_state::{MarketSignals, MarketState};
pub use network::{AgentGraph, LayerStats, MultilayerNetwork};
pub use population::{Population, PopulationSummary};

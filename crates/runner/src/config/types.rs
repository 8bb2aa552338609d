//! Pipeline configuration document

use agora_abm::{NetworkConfig, PopulationConfig, SimulationConfig};
use agora_spillover::{ContagionConfig, SpilloverConfig};
use serde::{Deserialize, Serialize};

/// Root configuration for one pipeline run; missing sections take their defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Seed of the single RNG driving population, networks and simulation
    pub seed: u64,
    pub population: PopulationConfig,
    pub network: NetworkConfig,
    pub simulation: SimulationConfig,
    pub spillover: SpilloverConfig,
    pub contagion: ContagionConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            population: PopulationConfig::default(),
            network: NetworkConfig::default(),
            simulation: SimulationConfig::default(),
            spillover: SpilloverConfig::default(),
            contagion: ContagionConfig::default(),
        }
    }
}

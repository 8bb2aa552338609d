//! Agent Population Factory
//!
//! Draws agent types from the fixed categorical distribution, applies one
//! shared heterogeneity multiplier per agent and samples initial wealth.

use super::wealth::{WealthDistribution, WealthSampler};
use crate::domain::{Agent, AgentId, AgentType, BehaviorParams, Population};
use agora_core::{AgoraError, Result};
use log::{debug, info};
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use serde::{Deserialize, Serialize};

/// Configuration for population construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Number of agents (> 0)
    pub n_agents: usize,
    /// Number of tradable assets (> 0)
    pub n_assets: usize,
    /// Spread of the per-agent parameter multiplier, in [0, 1]
    pub behavioral_heterogeneity: f64,
    /// Shape of the initial wealth distribution
    pub wealth_distribution: WealthDistribution,
    /// Base (mean) initial wealth
    pub base_wealth: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            n_agents: 100,
            n_assets: 3,
            behavioral_heterogeneity: 0.5,
            wealth_distribution: WealthDistribution::Pareto,
            base_wealth: 10_000.0,
        }
    }
}

impl PopulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.n_agents == 0 {
            return Err(AgoraError::configuration("n_agents must be positive"));
        }
        if self.n_assets == 0 {
            return Err(AgoraError::configuration("n_assets must be positive"));
        }
        if !(0.0..=1.0).contains(&self.behavioral_heterogeneity) {
            return Err(AgoraError::configuration(format!(
                "behavioral_heterogeneity must be in [0, 1], got {}",
                self.behavioral_heterogeneity
            )));
        }
        if !(self.base_wealth.is_finite() && self.base_wealth > 0.0) {
            return Err(AgoraError::configuration(format!(
                "base_wealth must be positive, got {}",
                self.base_wealth
            )));
        }
        Ok(())
    }
}

/// Builds populations of heterogeneous agents
#[derive(Debug, Clone)]
pub struct AgentPopulationFactory {
    config: PopulationConfig,
    wealth: WealthSampler,
}

impl AgentPopulationFactory {
    /// Validate the configuration and prepare the samplers
    pub fn new(config: PopulationConfig) -> Result<Self> {
        config.validate()?;
        let wealth = config.wealth_distribution.sampler(config.base_wealth)?;
        Ok(Self { config, wealth })
    }

    /// Create with a wealth distribution given by name ("equal", "normal", "pareto")
    pub fn with_distribution_name(mut config: PopulationConfig, name: &str) -> Result<Self> {
        config.wealth_distribution = name.parse()?;
        Self::new(config)
    }

    pub fn config(&self) -> &PopulationConfig {
        &self.config
    }

    /// Draw a population with independently sampled agent types
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Population> {
        let weights: Vec<f64> = AgentType::ALL.iter().map(|t| t.probability()).collect();
        let type_dist = WeightedIndex::new(&weights)
            .map_err(|e| AgoraError::configuration(format!("type weights: {}", e)))?;

        let agents = (0..self.config.n_agents)
            .map(|i| {
                let agent_type = AgentType::ALL[type_dist.sample(rng)];
                self.make_agent(i, agent_type, rng)
            })
            .collect();

        let population = Population::new(agents, self.config.n_assets);
        self.log_built(&population);
        Ok(population)
    }

    /// Build a population with the given types, in order
    ///
    /// `n_agents` from the configuration is ignored; the population has one
    /// agent per entry in `types`.
    pub fn build_with_types<R: Rng + ?Sized>(
        &self,
        types: &[AgentType],
        rng: &mut R,
    ) -> Result<Population> {
        if types.is_empty() {
            return Err(AgoraError::configuration("agent type list is empty"));
        }

        let agents = types
            .iter()
            .enumerate()
            .map(|(i, t)| self.make_agent(i, *t, rng))
            .collect();

        let population = Population::new(agents, self.config.n_assets);
        self.log_built(&population);
        Ok(population)
    }

    fn make_agent<R: Rng + ?Sized>(&self, idx: usize, agent_type: AgentType, rng: &mut R) -> Agent {
        let multiplier = self.heterogeneity_multiplier(rng);
        let params = BehaviorParams::from_template(&agent_type.template(), multiplier);
        let wealth = self.wealth.sample(rng);
        let social_influence = rng.gen_range(0.1..=1.0);

        Agent::new(
            AgentId(idx),
            agent_type,
            params,
            wealth,
            self.config.n_assets,
            social_influence,
        )
    }

    /// One uniform draw from [1 - h/2, 1 + h/2)
    fn heterogeneity_multiplier<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let h = self.config.behavioral_heterogeneity;
        1.0 + (rng.r#gen::<f64>() - 0.5) * h
    }

    fn log_built(&self, population: &Population) {
        info!(
            "Built population: {} agents, {} assets, wealth={}, gini={:.3}",
            population.len(),
            population.n_assets(),
            self.config.wealth_distribution,
            population.initial_gini()
        );
        debug!("Type distribution: {:?}", population.type_distribution());
    }
}

//! Agent Population
//!
//! Ordered, fixed-size collection of agents plus metadata derived once at
//! creation (type histogram, initial wealth Gini).

use super::agent::Agent;
use super::behavior::AgentType;
use agora_core::stats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Population of trading agents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Population {
    agents: Vec<Agent>,
    n_assets: usize,
    type_distribution: BTreeMap<AgentType, usize>,
    initial_gini: f64,
}

/// Descriptive summary of a population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationSummary {
    pub n_agents: usize,
    pub n_assets: usize,
    pub type_distribution: BTreeMap<AgentType, usize>,
    pub type_shares: BTreeMap<AgentType, f64>,
    pub total_wealth: f64,
    pub mean_wealth: f64,
    pub initial_gini: f64,
}

impl Population {
    /// Wrap agents and derive the population metadata
    pub fn new(agents: Vec<Agent>, n_assets: usize) -> Self {
        let mut type_distribution = BTreeMap::new();
        for agent in &agents {
            *type_distribution.entry(agent.agent_type()).or_insert(0) += 1;
        }

        let wealth: Vec<f64> = agents.iter().map(|a| a.initial_wealth()).collect();
        let initial_gini = stats::gini(&wealth);

        Self {
            agents,
            n_assets,
            type_distribution,
            initial_gini,
        }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn n_assets(&self) -> usize {
        self.n_assets
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Membership is fixed; only agent internals may change
    pub(crate) fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn agent(&self, idx: usize) -> Option<&Agent> {
        self.agents.get(idx)
    }

    /// Number of agents per type
    pub fn type_distribution(&self) -> &BTreeMap<AgentType, usize> {
        &self.type_distribution
    }

    /// Number of agents of one type
    pub fn count_of(&self, agent_type: AgentType) -> usize {
        self.type_distribution.get(&agent_type).copied().unwrap_or(0)
    }

    /// Realized share of each type
    pub fn type_shares(&self) -> BTreeMap<AgentType, f64> {
        let n = self.agents.len().max(1) as f64;
        self.type_distribution
            .iter()
            .map(|(t, c)| (*t, *c as f64 / n))
            .collect()
    }

    /// Gini coefficient of the initial wealth distribution
    pub fn initial_gini(&self) -> f64 {
        self.initial_gini
    }

    /// Current wealth of every agent, in population order
    pub fn current_wealth(&self) -> Vec<f64> {
        self.agents.iter().map(|a| a.current_wealth()).collect()
    }

    /// Gini coefficient of the current wealth distribution
    pub fn current_gini(&self) -> f64 {
        stats::gini(&self.current_wealth())
    }

    pub fn summary(&self) -> PopulationSummary {
        let total_wealth: f64 = self.agents.iter().map(|a| a.initial_wealth()).sum();
        PopulationSummary {
            n_agents: self.len(),
            n_assets: self.n_assets,
            type_distribution: self.type_distribution.clone(),
            type_shares: self.type_shares(),
            total_wealth,
            mean_wealth: total_wealth / self.len().max(1) as f64,
            initial_gini: self.initial_gini,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AgentId, BehaviorParams};
    use approx::assert_relative_eq;

    fn agent(id: usize, agent_type: AgentType, wealth: f64) -> Agent {
        let params = BehaviorParams::from_template(&agent_type.template(), 1.0);
        Agent::new(AgentId(id), agent_type, params, wealth, 1, 0.5)
    }

    #[test]
    fn test_metadata() {
        let population = Population::new(
            vec![
                agent(0, AgentType::Noise, 100.0),
                agent(1, AgentType::Noise, 100.0),
                agent(2, AgentType::Herding, 100.0),
                agent(3, AgentType::Momentum, 100.0),
            ],
            1,
        );

        assert_eq!(population.len(), 4);
        assert_eq!(population.count_of(AgentType::Noise), 2);
        assert_eq!(population.count_of(AgentType::Sophisticated), 0);
        assert_relative_eq!(population.type_shares()[&AgentType::Noise], 0.5);
        assert_relative_eq!(population.initial_gini(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_summary() {
        let population = Population::new(
            vec![
                agent(0, AgentType::Noise, 0.0),
                agent(1, AgentType::Herding, 300.0),
            ],
            1,
        );
        let summary = population.summary();
        assert_eq!(summary.n_agents, 2);
        assert_relative_eq!(summary.total_wealth, 300.0);
        assert_relative_eq!(summary.mean_wealth, 150.0);
        assert_relative_eq!(summary.initial_gini, 0.5, epsilon = 1e-12);
    }
}

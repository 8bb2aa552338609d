//! Simulation Output

use crate::domain::{AgentType, MarketState, Population};
use agora_core::{ReturnSeries, Result, stats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary statistics over a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub n_periods: usize,
    pub initial_gini: f64,
    pub final_gini: f64,
    /// Wealth Gini per recorded state (initial state first)
    pub gini_trajectory: Vec<f64>,
    /// Total return on initial wealth, per agent
    pub agent_returns: Vec<f64>,
    pub mean_return_by_type: BTreeMap<AgentType, f64>,
    /// Total price return over the run, per asset
    pub market_returns: Vec<f64>,
    pub crisis_periods: usize,
    pub total_volume: f64,
    pub total_transaction_costs: f64,
}

/// Full, append-only record of one simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Initial state followed by one state per simulated period
    pub market_states: Vec<MarketState>,
    /// Wealth per agent, one row per recorded state
    pub wealth_history: Vec<Vec<f64>>,
    /// Position per agent and asset, one entry per recorded state
    pub position_history: Vec<Vec<Vec<f64>>>,
    pub summary: SimulationSummary,
}

impl SimulationResult {
    pub(crate) fn new(
        market_states: Vec<MarketState>,
        wealth_history: Vec<Vec<f64>>,
        position_history: Vec<Vec<Vec<f64>>>,
        population: &Population,
        total_transaction_costs: f64,
    ) -> Self {
        let summary = summarize(
            &market_states,
            &wealth_history,
            population,
            total_transaction_costs,
        );
        Self {
            market_states,
            wealth_history,
            position_history,
            summary,
        }
    }

    /// Number of simulated periods (excludes the initial state)
    pub fn n_periods(&self) -> usize {
        self.market_states.len().saturating_sub(1)
    }

    /// Price rows (periods x assets), initial state first
    pub fn price_matrix(&self) -> Vec<Vec<f64>> {
        self.market_states.iter().map(|s| s.prices.clone()).collect()
    }

    /// Price path of one asset
    pub fn price_path(&self, asset: usize) -> Vec<f64> {
        self.market_states
            .iter()
            .filter_map(|s| s.prices.get(asset).copied())
            .collect()
    }

    /// Per-asset log returns of the simulated prices
    pub fn log_returns(&self) -> Result<ReturnSeries> {
        let n_assets = self.market_states.first().map_or(0, |s| s.n_assets());
        let columns = (0..n_assets)
            .map(|a| stats::log_returns(&self.price_path(a)))
            .collect::<Result<Vec<_>>>()?;

        let n_rows = columns.first().map_or(0, |c| c.len());
        let rows = (0..n_rows)
            .map(|t| columns.iter().map(|c| c[t]).collect())
            .collect();
        ReturnSeries::from_rows(rows)
    }

    /// Wealth trajectory of one agent
    pub fn wealth_path(&self, agent: usize) -> Vec<f64> {
        self.wealth_history
            .iter()
            .filter_map(|row| row.get(agent).copied())
            .collect()
    }

    /// Regime of each simulated period
    pub fn regimes(&self) -> Vec<agora_core::Regime> {
        self.market_states.iter().skip(1).map(|s| s.regime).collect()
    }
}

fn summarize(
    market_states: &[MarketState],
    wealth_history: &[Vec<f64>],
    population: &Population,
    total_transaction_costs: f64,
) -> SimulationSummary {
    let gini_trajectory: Vec<f64> = wealth_history.iter().map(|w| stats::gini(w)).collect();

    let agent_returns: Vec<f64> = population.agents().iter().map(|a| a.total_return()).collect();

    let mut by_type: BTreeMap<AgentType, Vec<f64>> = BTreeMap::new();
    for (agent, ret) in population.agents().iter().zip(&agent_returns) {
        by_type.entry(agent.agent_type()).or_default().push(*ret);
    }
    let mean_return_by_type = by_type
        .into_iter()
        .filter_map(|(t, rets)| stats::mean(&rets).map(|m| (t, m)))
        .collect();

    let market_returns = match (market_states.first(), market_states.last()) {
        (Some(first), Some(last)) => first
            .prices
            .iter()
            .zip(&last.prices)
            .map(|(p0, p1)| stats::simple_return(*p0, *p1).unwrap_or(0.0))
            .collect(),
        _ => Vec::new(),
    };

    SimulationSummary {
        n_periods: market_states.len().saturating_sub(1),
        initial_gini: population.initial_gini(),
        final_gini: gini_trajectory.last().copied().unwrap_or(0.0),
        gini_trajectory,
        agent_returns,
        mean_return_by_type,
        market_returns,
        crisis_periods: market_states
            .iter()
            .skip(1)
            .filter(|s| s.regime.is_crisis())
            .count(),
        total_volume: market_states.iter().map(|s| s.total_volume()).sum(),
        total_transaction_costs,
    }
}

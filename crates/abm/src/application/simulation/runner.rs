//! Market Simulator
//!
//! The period loop: regime, base returns, signals, per-agent decisions,
//! demand aggregation, price update and settlement, in that order.

use super::config::SimulationConfig;
use super::decision::{self, Perception};
use super::regime::RegimeProcess;
use super::result::SimulationResult;
use super::signals;
use crate::domain::{AgentGraph, MarketSignals, MarketState, MultilayerNetwork, Population};
use agora_core::{AgoraError, Result, ReturnSeries, parallel};
use log::{debug, info, warn};
use rand::Rng;
use rand_distr::StandardNormal;

/// Drives a population through a fixed number of market periods
#[derive(Debug, Clone)]
pub struct MarketSimulator {
    config: SimulationConfig,
}

impl MarketSimulator {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        if config.parallel && !parallel::is_available() {
            warn!("Parallel decisions requested but built without the `parallel` feature");
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run the simulation
    ///
    /// Agents' wealth, positions and reputation are updated in place. The
    /// return series must cover at least the population's assets; extra
    /// columns are ignored and periods past its end reuse the last row.
    pub fn run<R: Rng + ?Sized>(
        &self,
        population: &mut Population,
        network: Option<&MultilayerNetwork>,
        returns: &ReturnSeries,
        rng: &mut R,
    ) -> Result<SimulationResult> {
        self.check_inputs(population, network, returns)?;

        let n_assets = population.n_assets();
        let n_agents = population.len();
        let n_periods = self.config.n_periods;
        let information = network
            .filter(|_| self.config.network_effects)
            .map(|n| &n.information);

        info!(
            "Simulating {} periods: {} agents, {} assets, network effects {}",
            n_periods,
            n_agents,
            n_assets,
            if information.is_some() { "on" } else { "off" }
        );

        let mut regime =
            RegimeProcess::new(self.config.regime.clone(), self.config.initial_sentiment);
        let mut state =
            MarketState::initial(n_assets, self.config.initial_price, regime.sentiment());

        let mut price_history = vec![state.prices.clone()];
        let mut market_states = Vec::with_capacity(n_periods + 1);
        let mut wealth_history = Vec::with_capacity(n_periods + 1);
        let mut position_history = Vec::with_capacity(n_periods + 1);
        market_states.push(state.clone());
        wealth_history.push(population.current_wealth());
        position_history.push(positions(population));

        let mut total_costs = 0.0;

        for period in 1..=n_periods {
            // 1. Regime and sentiment
            let current_regime = regime.step(rng);

            // 2. Base returns for this period
            let base = returns.row_clamped(period - 1);
            let base_returns: Vec<f64> = (0..n_assets)
                .map(|a| {
                    let noise: f64 = rng.sample(StandardNormal);
                    base[a] * current_regime.return_multiplier()
                        + noise * self.config.return_noise_std
                })
                .collect();

            // 3. Shared signal bundle
            let signals = signals::market_signals(
                &price_history,
                regime.sentiment(),
                current_regime,
                &self.config,
            );

            // 4. Decisions; one seed per agent, drawn in agent order
            let seeds: Vec<u64> = (0..n_agents).map(|_| rng.r#gen()).collect();
            let targets = self.decide_all(population, information, &signals, &seeds);

            // 5. Aggregate demand and volume
            let mut demand = vec![0.0; n_assets];
            let mut volumes = vec![0.0; n_assets];
            for (agent, target) in population.agents().iter().zip(&targets) {
                for a in 0..n_assets {
                    let change = target[a] - agent.position()[a];
                    demand[a] += change;
                    volumes[a] += change.abs();
                }
            }

            // 6. Prices
            let old_prices = state.prices.clone();
            let new_prices: Vec<f64> = (0..n_assets)
                .map(|a| {
                    let impact = demand[a] * self.config.price_impact;
                    old_prices[a] * (1.0 + base_returns[a] + impact).max(0.01)
                })
                .collect();

            // 7. Settlement
            for (agent, target) in population.agents_mut().iter_mut().zip(&targets) {
                total_costs += agent.settle(target, &old_prices, &new_prices);
            }

            state = MarketState {
                period,
                prices: new_prices,
                volumes,
                regime: current_regime,
                sentiment: regime.sentiment(),
            };

            if state.prices.iter().any(|p| !p.is_finite()) {
                return Err(AgoraError::numerical(format!(
                    "non-finite price at period {}",
                    period
                )));
            }

            debug!(
                "Period {}: regime={} mean_price={:.4} volume={:.2}",
                period,
                state.regime,
                state.mean_price(),
                state.total_volume()
            );

            price_history.push(state.prices.clone());
            market_states.push(state.clone());
            wealth_history.push(population.current_wealth());
            position_history.push(positions(population));
        }

        let result = SimulationResult::new(
            market_states,
            wealth_history,
            position_history,
            population,
            total_costs,
        );

        info!(
            "Simulation finished: gini {:.3} -> {:.3}, {} crisis periods, volume {:.1}",
            result.summary.initial_gini,
            result.summary.final_gini,
            result.summary.crisis_periods,
            result.summary.total_volume
        );

        Ok(result)
    }

    fn check_inputs(
        &self,
        population: &Population,
        network: Option<&MultilayerNetwork>,
        returns: &ReturnSeries,
    ) -> Result<()> {
        if population.is_empty() {
            return Err(AgoraError::configuration("population is empty"));
        }
        if returns.n_assets() < population.n_assets() {
            return Err(AgoraError::data_shape(format!(
                "return series has {} assets, population trades {}",
                returns.n_assets(),
                population.n_assets()
            )));
        }
        if returns.n_assets() > population.n_assets() {
            warn!(
                "Return series has {} assets, using the first {}",
                returns.n_assets(),
                population.n_assets()
            );
        }
        if let Some(network) = network {
            if network.n_nodes() != population.len() {
                return Err(AgoraError::data_shape(format!(
                    "network has {} nodes, population has {} agents",
                    network.n_nodes(),
                    population.len()
                )));
            }
        }
        Ok(())
    }

    /// Perceive, blend and decide for every agent; no agent sees another's draws
    fn decide_all(
        &self,
        population: &Population,
        information: Option<&AgentGraph>,
        signals: &MarketSignals,
        seeds: &[u64],
    ) -> Vec<Vec<f64>> {
        let agents = population.agents();
        let sequential = !self.config.parallel;

        let perceptions: Vec<Perception> = parallel::map_indexed(
            agents.len(),
            |i| decision::perceive(&agents[i], signals, &self.config, seeds[i]),
            sequential,
        );

        let sentiments: Vec<f64> = match information {
            Some(graph) => {
                let own: Vec<f64> = perceptions.iter().map(|p| p.sentiment).collect();
                let influence: Vec<f64> = agents.iter().map(|a| a.social_influence()).collect();
                (0..agents.len())
                    .map(|i| {
                        decision::blend_sentiment(
                            own[i],
                            &graph.neighbors(i),
                            &own,
                            &influence,
                            self.config.social_weight,
                        )
                    })
                    .collect()
            }
            None => perceptions.iter().map(|p| p.sentiment).collect(),
        };

        parallel::map_indexed(
            agents.len(),
            |i| {
                decision::next_position(
                    &agents[i],
                    &perceptions[i],
                    sentiments[i],
                    signals,
                    &self.config,
                )
            },
            sequential,
        )
    }
}

fn positions(population: &Population) -> Vec<Vec<f64>> {
    population
        .agents()
        .iter()
        .map(|a| a.position().to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::population::{AgentPopulationFactory, PopulationConfig};
    use crate::domain::AgentType;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn population(n_agents: usize, n_assets: usize, seed: u64) -> Population {
        AgentPopulationFactory::new(PopulationConfig {
            n_agents,
            n_assets,
            ..Default::default()
        })
        .unwrap()
        .build(&mut StdRng::seed_from_u64(seed))
        .unwrap()
    }

    #[test]
    fn test_rejects_short_return_series() {
        let mut population = population(5, 3, 1);
        let returns = ReturnSeries::constant(10, 2, 0.0).unwrap();
        let simulator = MarketSimulator::new(SimulationConfig {
            n_periods: 5,
            ..Default::default()
        })
        .unwrap();

        let err = simulator
            .run(&mut population, None, &returns, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, AgoraError::DataShape(_)));
        // Nothing was simulated
        assert!(population.agents().iter().all(|a| a.current_wealth() == a.initial_wealth()));
    }

    #[test]
    fn test_history_lengths() {
        let mut population = population(10, 2, 2);
        let returns = ReturnSeries::constant(3, 2, 0.001).unwrap();
        let simulator = MarketSimulator::new(SimulationConfig {
            n_periods: 8,
            ..Default::default()
        })
        .unwrap();

        let result = simulator
            .run(&mut population, None, &returns, &mut StdRng::seed_from_u64(3))
            .unwrap();

        assert_eq!(result.n_periods(), 8);
        assert_eq!(result.market_states.len(), 9);
        assert_eq!(result.wealth_history.len(), 9);
        assert_eq!(result.position_history.len(), 9);
        assert_eq!(result.wealth_history[8], population.current_wealth());
        assert_eq!(result.market_states[0].prices, vec![100.0, 100.0]);
        assert_eq!(result.log_returns().unwrap().n_periods(), 8);
        assert_eq!(result.regimes().len(), 8);
        assert_eq!(result.wealth_path(0).len(), 9);
        assert_eq!(result.price_path(1).len(), 9);
    }

    /// Neutral-sentiment herding agent, no noise, no regime changes: never trades
    fn idle_market(n_periods: usize) -> (Population, SimulationConfig) {
        let factory = AgentPopulationFactory::new(PopulationConfig {
            n_assets: 1,
            behavioral_heterogeneity: 0.0,
            ..Default::default()
        })
        .unwrap();
        let population = factory
            .build_with_types(&[AgentType::Herding], &mut StdRng::seed_from_u64(0))
            .unwrap();

        let mut config = SimulationConfig {
            n_periods,
            return_noise_std: 0.0,
            sentiment_noise_std: 0.0,
            ..Default::default()
        };
        config.regime.crisis_probability = 0.0;
        config.regime.switch_probability = 0.0;
        (population, config)
    }

    #[test]
    fn test_price_floor_under_crash() {
        let (mut population, config) = idle_market(20);
        // -150% every period: each step keeps 1% of the previous price
        let returns = ReturnSeries::constant(1, 1, -1.5).unwrap();

        let result = MarketSimulator::new(config)
            .unwrap()
            .run(&mut population, None, &returns, &mut StdRng::seed_from_u64(5))
            .unwrap();

        assert!((result.market_states[1].prices[0] - 1.0).abs() < 1e-12);
        assert!(result.market_states.iter().all(|s| s.prices[0] > 0.0));
    }

    #[test]
    fn test_idle_market_keeps_wealth() {
        let (mut population, config) = idle_market(10);
        let returns = ReturnSeries::constant(10, 1, 0.01).unwrap();
        let result = MarketSimulator::new(config)
            .unwrap()
            .run(&mut population, None, &returns, &mut StdRng::seed_from_u64(1))
            .unwrap();

        let agent = &population.agents()[0];
        assert_eq!(agent.current_wealth(), agent.initial_wealth());
        assert_eq!(result.summary.total_volume, 0.0);
        // Prices follow the base returns exactly
        let expected = 100.0 * 1.01_f64.powi(10);
        assert!((result.market_states[10].prices[0] - expected).abs() < 1e-9);
    }
}

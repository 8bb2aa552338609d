//! Multilayer Network Builder

use super::similarity;
use crate::domain::{Agent, AgentGraph, MultilayerNetwork, Population};
use agora_core::{AgoraError, Result};
use log::{debug, info};
use petgraph::graph::{NodeIndex, UnGraph};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration for the three network layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Edge probability scale for the trading layer
    pub trading_density: f64,
    /// Edge probability scale for the information layer
    pub information_density: f64,
    /// Ring-lattice neighbours per node in the social layer (k)
    pub social_neighbors: usize,
    /// Watts-Strogatz rewiring probability (p)
    pub rewire_probability: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            trading_density: 0.1,
            information_density: 0.15,
            social_neighbors: 4,
            rewire_probability: 0.1,
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("trading_density", self.trading_density),
            ("information_density", self.information_density),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(AgoraError::configuration(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.rewire_probability) {
            return Err(AgoraError::configuration(format!(
                "rewire_probability must be in [0, 1], got {}",
                self.rewire_probability
            )));
        }
        Ok(())
    }
}

/// Builds the trading, information and social layers
#[derive(Debug, Clone)]
pub struct MultilayerNetworkBuilder {
    config: NetworkConfig,
}

impl MultilayerNetworkBuilder {
    pub fn new(config: NetworkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Build all three layers; layers are drawn in order trading, information, social
    pub fn build<R: Rng + ?Sized>(
        &self,
        population: &Population,
        rng: &mut R,
    ) -> Result<MultilayerNetwork> {
        if population.is_empty() {
            return Err(AgoraError::configuration(
                "cannot build a network over an empty population",
            ));
        }

        let agents = population.agents();
        let trading = similarity_graph(
            agents,
            self.config.trading_density,
            similarity::trading,
            rng,
        );
        let information = similarity_graph(
            agents,
            self.config.information_density,
            similarity::information,
            rng,
        );
        let social = watts_strogatz(
            agents.len(),
            self.config.social_neighbors,
            self.config.rewire_probability,
            rng,
        );

        let network = MultilayerNetwork {
            trading,
            information,
            social,
        };

        info!(
            "Built network over {} agents: trading={} information={} social={} edges",
            network.n_nodes(),
            network.trading.edge_count(),
            network.information.edge_count(),
            network.social.edge_count()
        );
        debug!(
            "Layer densities: trading={:.3} information={:.3} social={:.3}",
            network.trading.density(),
            network.information.density(),
            network.social.density()
        );

        Ok(network)
    }
}

/// Independent edge per pair with probability min(1, density * similarity)
fn similarity_graph<R, F>(agents: &[Agent], density: f64, score: F, rng: &mut R) -> AgentGraph
where
    R: Rng + ?Sized,
    F: Fn(&Agent, &Agent) -> f64,
{
    let n = agents.len();
    let mut graph: UnGraph<usize, ()> = UnGraph::with_capacity(n, 0);
    let nodes: Vec<NodeIndex> = (0..n).map(|i| graph.add_node(i)).collect();

    for i in 0..n {
        for j in (i + 1)..n {
            let p = (density * score(&agents[i], &agents[j])).clamp(0.0, 1.0);
            if rng.r#gen::<f64>() < p {
                graph.add_edge(nodes[i], nodes[j], ());
            }
        }
    }

    AgentGraph::from(graph)
}

/// Ring lattice with k nearest neighbours, each lattice edge rewired with probability p
///
/// `k` is rounded down to an even number and capped at n - 1.
fn watts_strogatz<R: Rng + ?Sized>(n: usize, k: usize, p: f64, rng: &mut R) -> AgentGraph {
    let mut graph: UnGraph<usize, ()> = UnGraph::with_capacity(n, 0);
    let nodes: Vec<NodeIndex> = (0..n).map(|i| graph.add_node(i)).collect();
    if n < 2 {
        return AgentGraph::from(graph);
    }

    let half = (k.min(n - 1) / 2).max(1);

    for i in 0..n {
        for offset in 1..=half {
            let j = (i + offset) % n;
            if !graph.contains_edge(nodes[i], nodes[j]) {
                graph.add_edge(nodes[i], nodes[j], ());
            }
        }
    }

    // Rewire lattice edges (i, i + offset) in a fixed order
    for offset in 1..=half {
        for i in 0..n {
            let j = (i + offset) % n;
            let Some(edge) = graph.find_edge(nodes[i], nodes[j]) else {
                continue;
            };
            if rng.r#gen::<f64>() >= p {
                continue;
            }
            // A node connected to everything has nowhere to rewire to
            if graph.neighbors(nodes[i]).count() >= n - 1 {
                continue;
            }

            let target = loop {
                let candidate = rng.gen_range(0..n);
                if candidate != i && !graph.contains_edge(nodes[i], nodes[candidate]) {
                    break candidate;
                }
            };

            graph.remove_edge(edge);
            graph.add_edge(nodes[i], nodes[target], ());
        }
    }

    AgentGraph::from(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::population::{AgentPopulationFactory, PopulationConfig};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn population(n_agents: usize, seed: u64) -> Population {
        let factory = AgentPopulationFactory::new(PopulationConfig {
            n_agents,
            ..Default::default()
        })
        .unwrap();
        factory.build(&mut StdRng::seed_from_u64(seed)).unwrap()
    }

    fn is_symmetric(graph: &AgentGraph) -> bool {
        (0..graph.n_nodes()).all(|i| {
            graph
                .neighbors(i)
                .iter()
                .all(|&j| j != i && graph.has_edge(j, i))
        })
    }

    #[test]
    fn test_layers_are_symmetric_without_self_loops() {
        let population = population(60, 11);
        let builder = MultilayerNetworkBuilder::new(NetworkConfig::default()).unwrap();
        let network = builder
            .build(&population, &mut StdRng::seed_from_u64(5))
            .unwrap();

        assert_eq!(network.n_nodes(), 60);
        assert!(is_symmetric(&network.trading));
        assert!(is_symmetric(&network.information));
        assert!(is_symmetric(&network.social));
    }

    #[test]
    fn test_zero_density_gives_empty_layers() {
        let population = population(20, 2);
        let builder = MultilayerNetworkBuilder::new(NetworkConfig {
            trading_density: 0.0,
            information_density: 0.0,
            ..Default::default()
        })
        .unwrap();
        let network = builder
            .build(&population, &mut StdRng::seed_from_u64(1))
            .unwrap();

        assert_eq!(network.trading.edge_count(), 0);
        assert_eq!(network.information.edge_count(), 0);
    }

    #[test]
    fn test_saturated_density_connects_similar_pairs() {
        // Density high enough that every pair with similarity > 0 connects
        let population = population(15, 3);
        let builder = MultilayerNetworkBuilder::new(NetworkConfig {
            trading_density: 1e9,
            ..Default::default()
        })
        .unwrap();
        let network = builder
            .build(&population, &mut StdRng::seed_from_u64(4))
            .unwrap();
        assert_eq!(network.trading.edge_count(), 15 * 14 / 2);
    }

    #[test]
    fn test_unrewired_ring_lattice() {
        let graph = watts_strogatz(10, 4, 0.0, &mut StdRng::seed_from_u64(0));
        assert_eq!(graph.edge_count(), 20);
        for i in 0..10 {
            assert_eq!(graph.degree(i), 4);
            assert!(graph.has_edge(i, (i + 1) % 10));
            assert!(graph.has_edge(i, (i + 2) % 10));
        }
    }

    #[test]
    fn test_rewiring_preserves_edge_count() {
        let graph = watts_strogatz(30, 4, 0.5, &mut StdRng::seed_from_u64(8));
        assert_eq!(graph.edge_count(), 60);
        assert!(is_symmetric(&graph));
    }

    #[test]
    fn test_small_ring_has_no_duplicate_edges() {
        // Two nodes: both ends of the ring name the same pair
        let pair = watts_strogatz(2, 4, 0.0, &mut StdRng::seed_from_u64(0));
        assert_eq!(pair.edges(), vec![(0, 1)]);

        let complete = watts_strogatz(5, 4, 0.0, &mut StdRng::seed_from_u64(0));
        assert_eq!(complete.edge_count(), 10);
        assert!((complete.density() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_same_seed_same_layers() {
        let population = population(40, 9);
        let builder = MultilayerNetworkBuilder::new(NetworkConfig::default()).unwrap();
        let first = builder
            .build(&population, &mut StdRng::seed_from_u64(21))
            .unwrap();
        let second = builder
            .build(&population, &mut StdRng::seed_from_u64(21))
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first.social.graph().node_count(), 40);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = NetworkConfig {
            rewire_probability: 2.0,
            ..Default::default()
        };
        assert!(MultilayerNetworkBuilder::new(config).is_err());
    }
}

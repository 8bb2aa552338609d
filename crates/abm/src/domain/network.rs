//! Agent Networks
//!
//! Undirected graphs over agents. Three layers are built; only the
//! information layer feeds back into the simulation (sentiment diffusion).

use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};

/// Undirected simple graph over agent indices
///
/// Node `i` carries agent index `i`; nodes are never removed, so node and
/// agent indices coincide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentGraph {
    graph: UnGraph<usize, ()>,
}

impl AgentGraph {
    /// Graph with `n_nodes` nodes and no edges
    pub fn empty(n_nodes: usize) -> Self {
        let mut graph = UnGraph::with_capacity(n_nodes, 0);
        for i in 0..n_nodes {
            graph.add_node(i);
        }
        Self { graph }
    }

    pub fn n_nodes(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Underlying petgraph graph
    pub fn graph(&self) -> &UnGraph<usize, ()> {
        &self.graph
    }

    fn node(&self, idx: usize) -> Option<NodeIndex> {
        (idx < self.n_nodes()).then(|| NodeIndex::new(idx))
    }

    /// Add the undirected edge {a, b}
    ///
    /// Returns false for self loops, out-of-range nodes and duplicates.
    pub fn add_edge(&mut self, a: usize, b: usize) -> bool {
        let (Some(na), Some(nb)) = (self.node(a), self.node(b)) else {
            return false;
        };
        if a == b || self.graph.find_edge(na, nb).is_some() {
            return false;
        }
        self.graph.add_edge(na, nb, ());
        true
    }

    /// Remove the undirected edge {a, b}, if present
    pub fn remove_edge(&mut self, a: usize, b: usize) -> bool {
        let (Some(na), Some(nb)) = (self.node(a), self.node(b)) else {
            return false;
        };
        match self.graph.find_edge(na, nb) {
            Some(edge) => self.graph.remove_edge(edge).is_some(),
            None => false,
        }
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        match (self.node(a), self.node(b)) {
            (Some(na), Some(nb)) => self.graph.find_edge(na, nb).is_some(),
            _ => false,
        }
    }

    /// Neighbors of `node` in ascending order
    pub fn neighbors(&self, node: usize) -> Vec<usize> {
        let Some(n) = self.node(node) else {
            return Vec::new();
        };
        let mut neighbors: Vec<usize> = self.graph.neighbors(n).map(|m| self.graph[m]).collect();
        neighbors.sort_unstable();
        neighbors
    }

    pub fn degree(&self, node: usize) -> usize {
        self.node(node)
            .map_or(0, |n| self.graph.neighbors(n).count())
    }

    /// Edges as sorted (low, high) agent pairs
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<(usize, usize)> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| {
                let (a, b) = (self.graph[a], self.graph[b]);
                (a.min(b), a.max(b))
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Edges present / edges possible
    pub fn density(&self) -> f64 {
        let n = self.n_nodes() as f64;
        if n < 2.0 {
            return 0.0;
        }
        self.edge_count() as f64 / (n * (n - 1.0) / 2.0)
    }

    pub fn mean_degree(&self) -> f64 {
        if self.n_nodes() == 0 {
            return 0.0;
        }
        2.0 * self.edge_count() as f64 / self.n_nodes() as f64
    }

    pub fn stats(&self) -> LayerStats {
        LayerStats {
            edges: self.edge_count(),
            density: self.density(),
            mean_degree: self.mean_degree(),
        }
    }
}

impl From<UnGraph<usize, ()>> for AgentGraph {
    fn from(graph: UnGraph<usize, ()>) -> Self {
        Self { graph }
    }
}

/// Same node count and same edge set, regardless of insertion order
impl PartialEq for AgentGraph {
    fn eq(&self, other: &Self) -> bool {
        self.n_nodes() == other.n_nodes() && self.edges() == other.edges()
    }
}

/// Size statistics of one network layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerStats {
    pub edges: usize,
    pub density: f64,
    pub mean_degree: f64,
}

/// Trading, information and social layers over the same agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultilayerNetwork {
    /// Type, wealth and risk similarity
    pub trading: AgentGraph,
    /// Sophistication and memory similarity; used for sentiment diffusion
    pub information: AgentGraph,
    /// Small-world lattice with random rewiring
    pub social: AgentGraph,
}

impl MultilayerNetwork {
    pub fn n_nodes(&self) -> usize {
        self.information.n_nodes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_is_symmetric() {
        let mut graph = AgentGraph::empty(4);
        assert!(graph.add_edge(0, 2));
        assert!(graph.has_edge(2, 0));
        assert_eq!(graph.neighbors(0), vec![2]);
        assert_eq!(graph.neighbors(2), vec![0]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_rejects_self_loops_and_duplicates() {
        let mut graph = AgentGraph::empty(3);
        assert!(!graph.add_edge(1, 1));
        assert!(graph.add_edge(0, 1));
        assert!(!graph.add_edge(1, 0));
        assert!(!graph.add_edge(0, 7));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_density_and_degree() {
        let mut graph = AgentGraph::empty(4);
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(2, 3);
        // 3 of 6 possible edges
        assert!((graph.density() - 0.5).abs() < 1e-12);
        assert!((graph.mean_degree() - 1.5).abs() < 1e-12);
        assert_eq!(graph.degree(1), 2);

        assert!(graph.remove_edge(1, 2));
        assert_eq!(graph.edge_count(), 2);
        assert!(!graph.has_edge(2, 1));
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let mut first = AgentGraph::empty(4);
        first.add_edge(0, 1);
        first.add_edge(2, 3);
        let mut second = AgentGraph::empty(4);
        second.add_edge(3, 2);
        second.add_edge(1, 0);
        assert_eq!(first, second);
        assert_eq!(first.edges(), vec![(0, 1), (2, 3)]);

        second.remove_edge(0, 1);
        assert_ne!(first, second);
    }

    #[test]
    fn test_serde_round_trip_keeps_edges() {
        let mut graph = AgentGraph::empty(5);
        graph.add_edge(0, 4);
        graph.add_edge(1, 3);
        let json = serde_json::to_string(&graph).unwrap();
        let back: AgentGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(back, graph);
        assert_eq!(back.neighbors(4), vec![0]);
    }
}

//! Network Topology
//!
//! Structural metrics of a spillover matrix read as a directed graph: entry
//! (i, j) > 0 off the diagonal gives an edge j -> i weighted by the entry.
//! Density, clustering and betweenness do not depend on which way the edges
//! point.

use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

/// Topology metrics of one spillover window
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NetworkMetrics {
    /// Directed edges present / n(n-1)
    pub density: f64,
    /// Mean local clustering coefficient of the undirected projection
    pub clustering: f64,
    /// Freeman betweenness centralization in [0, 1]
    pub centralization: f64,
}

impl NetworkMetrics {
    pub fn from_matrix(matrix: &[Vec<f64>]) -> Self {
        Self::from_graph(&spillover_graph(matrix))
    }

    pub fn from_graph(graph: &DiGraph<usize, f64>) -> Self {
        Self {
            density: density(graph),
            clustering: average_clustering(graph),
            centralization: betweenness_centralization(graph),
        }
    }
}

/// Directed spillover graph; node `i` carries asset index `i`
pub fn spillover_graph(matrix: &[Vec<f64>]) -> DiGraph<usize, f64> {
    let n = matrix.len();
    let mut graph = DiGraph::with_capacity(n, n * n.saturating_sub(1));
    let nodes: Vec<NodeIndex> = (0..n).map(|i| graph.add_node(i)).collect();

    for (i, row) in matrix.iter().enumerate() {
        for (j, &w) in row.iter().enumerate().take(n) {
            if i != j && w > 0.0 {
                graph.add_edge(nodes[j], nodes[i], w);
            }
        }
    }

    graph
}

pub fn density(graph: &DiGraph<usize, f64>) -> f64 {
    let n = graph.node_count();
    if n < 2 {
        return 0.0;
    }
    graph.edge_count() as f64 / (n * (n - 1)) as f64
}

/// Average of local clustering coefficients; nodes with degree < 2 count as 0
pub fn average_clustering(graph: &DiGraph<usize, f64>) -> f64 {
    let n = graph.node_count();
    if n == 0 {
        return 0.0;
    }

    let total: f64 = graph
        .node_indices()
        .map(|v| {
            // Undirected projection: in- and out-neighbours, each once
            let neighbors: Vec<NodeIndex> = graph
                .neighbors_undirected(v)
                .filter(|&u| u != v)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            let k = neighbors.len();
            if k < 2 {
                return 0.0;
            }
            let mut links = 0usize;
            for (a, &x) in neighbors.iter().enumerate() {
                for &y in &neighbors[a + 1..] {
                    if graph.find_edge_undirected(x, y).is_some() {
                        links += 1;
                    }
                }
            }
            links as f64 / (k * (k - 1) / 2) as f64
        })
        .sum();

    total / n as f64
}

/// Brandes betweenness on the unweighted directed graph, unnormalized
pub fn betweenness(graph: &DiGraph<usize, f64>) -> Vec<f64> {
    let n = graph.node_count();
    let mut centrality = vec![0.0; n];

    for source in graph.node_indices() {
        let s = source.index();
        let mut stack = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0_f64; n];
        let mut distance = vec![-1_i64; n];
        sigma[s] = 1.0;
        distance[s] = 0;

        let mut queue = VecDeque::from([source]);
        while let Some(v) = queue.pop_front() {
            let vi = v.index();
            stack.push(vi);
            for w in graph.neighbors(v) {
                let wi = w.index();
                if distance[wi] < 0 {
                    distance[wi] = distance[vi] + 1;
                    queue.push_back(w);
                }
                if distance[wi] == distance[vi] + 1 {
                    sigma[wi] += sigma[vi];
                    predecessors[wi].push(vi);
                }
            }
        }

        let mut delta = vec![0.0; n];
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != s {
                centrality[w] += delta[w];
            }
        }
    }

    centrality
}

/// Freeman centralization of normalized directed betweenness
///
/// Sum of (max - c_v) over nodes, divided by its maximum n - 1 (a star).
pub fn betweenness_centralization(graph: &DiGraph<usize, f64>) -> f64 {
    let n = graph.node_count();
    if n < 3 {
        return 0.0;
    }

    let scale = ((n - 1) * (n - 2)) as f64;
    let normalized: Vec<f64> = betweenness(graph).iter().map(|c| c / scale).collect();
    let max = normalized.iter().copied().fold(0.0, f64::max);
    let spread: f64 = normalized.iter().map(|c| max - c).sum();

    (spread / (n - 1) as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn complete(n: usize) -> Vec<Vec<f64>> {
        (0..n)
            .map(|i| (0..n).map(|j| if i == j { 0.0 } else { 0.5 }).collect())
            .collect()
    }

    /// Bidirectional star centred on node 0
    fn star(n: usize) -> Vec<Vec<f64>> {
        (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| if i != j && (i == 0 || j == 0) { 1.0 } else { 0.0 })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_complete_graph() {
        let metrics = NetworkMetrics::from_matrix(&complete(5));
        assert_relative_eq!(metrics.density, 1.0);
        assert_relative_eq!(metrics.clustering, 1.0);
        assert_relative_eq!(metrics.centralization, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_star_is_fully_centralized() {
        let metrics = NetworkMetrics::from_matrix(&star(5));
        assert_relative_eq!(metrics.density, 8.0 / 20.0);
        assert_relative_eq!(metrics.clustering, 0.0);
        assert_relative_eq!(metrics.centralization, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_graph() {
        let metrics = NetworkMetrics::from_matrix(&vec![vec![0.0; 4]; 4]);
        assert_eq!(metrics, NetworkMetrics::default());
    }

    #[test]
    fn test_directed_path_betweenness() {
        // 0 -> 1 -> 2: node 1 lies on the single path 0 ~> 2
        let graph = DiGraph::<usize, f64>::from_edges(&[(0, 1), (1, 2)]);
        assert_eq!(betweenness(&graph), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_diagonal_ignored() {
        let matrix = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let graph = spillover_graph(&matrix);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(density(&graph), 0.0);
    }

    #[test]
    fn test_edges_point_from_leader_to_follower() {
        // Asset 1 leads asset 0 with weight 0.3; nothing else
        let matrix = vec![vec![0.0, 0.3, 0.0], vec![0.0; 3], vec![0.0; 3]];
        let graph = spillover_graph(&matrix);
        assert_eq!(graph.edge_count(), 1);

        let edge = graph
            .find_edge(NodeIndex::new(1), NodeIndex::new(0))
            .unwrap();
        assert_relative_eq!(graph[edge], 0.3);
        assert!(graph.find_edge(NodeIndex::new(0), NodeIndex::new(1)).is_none());
        assert_relative_eq!(density(&graph), 1.0 / 6.0);
    }

    #[test]
    fn test_metrics_ignore_edge_direction() {
        let forward = DiGraph::<usize, f64>::from_edges(&[(0, 1), (1, 2), (2, 3), (0, 2)]);
        let backward = DiGraph::<usize, f64>::from_edges(&[(1, 0), (2, 1), (3, 2), (2, 0)]);
        let a = NetworkMetrics::from_graph(&forward);
        let b = NetworkMetrics::from_graph(&backward);
        assert_relative_eq!(a.density, b.density);
        assert_relative_eq!(a.clustering, b.clustering);
        assert_relative_eq!(a.centralization, b.centralization, epsilon = 1e-12);
    }
}

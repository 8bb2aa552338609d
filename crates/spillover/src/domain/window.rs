//! Spillover Window
//!
//! One rolling window's asset-level spillover matrix and its aggregates.
//! Entry (i, j) is the spillover received by asset i from asset j, so row
//! sums are spillover *from* others and column sums spillover *to* others.

use super::topology::NetworkMetrics;
use serde::{Deserialize, Serialize};

/// Spillover matrix and aggregates for one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpilloverWindow {
    /// Window index (0-based)
    pub index: usize,
    /// First return period covered
    pub start: usize,
    /// Price period at which the window ends
    pub end: usize,
    /// Significant absolute correlations, zero diagonal
    pub matrix: Vec<Vec<f64>>,
    /// Total spillover index in [0, 100]
    pub total_spillover: f64,
    /// Column sums
    pub to_others: Vec<f64>,
    /// Row sums
    pub from_others: Vec<f64>,
    /// to - from
    pub net: Vec<f64>,
    pub metrics: NetworkMetrics,
    /// Correlation was undefined in this window (near-constant returns)
    pub degenerate: bool,
}

impl SpilloverWindow {
    /// Build from a matrix; the diagonal is forced to zero
    pub fn from_matrix(index: usize, start: usize, end: usize, mut matrix: Vec<Vec<f64>>) -> Self {
        let n = matrix.len();
        for (i, row) in matrix.iter_mut().enumerate() {
            if let Some(d) = row.get_mut(i) {
                *d = 0.0;
            }
        }

        let from_others: Vec<f64> = matrix.iter().map(|row| row.iter().sum()).collect();
        let to_others: Vec<f64> = (0..n)
            .map(|j| matrix.iter().map(|row| row[j]).sum())
            .collect();
        let net = to_others
            .iter()
            .zip(&from_others)
            .map(|(to, from)| to - from)
            .collect();

        let total: f64 = from_others.iter().sum();
        let total_spillover = if n < 2 {
            0.0
        } else {
            total / (n * (n - 1)) as f64 * 100.0
        };

        let metrics = NetworkMetrics::from_matrix(&matrix);

        Self {
            index,
            start,
            end,
            matrix,
            total_spillover,
            to_others,
            from_others,
            net,
            metrics,
            degenerate: false,
        }
    }

    /// Zero-spillover window for undefined correlations
    pub fn degenerate(index: usize, start: usize, end: usize, n_assets: usize) -> Self {
        let mut window = Self::from_matrix(index, start, end, vec![vec![0.0; n_assets]; n_assets]);
        window.degenerate = true;
        window
    }

    pub fn n_assets(&self) -> usize {
        self.matrix.len()
    }

    /// Mean off-diagonal entry
    pub fn average_pairwise(&self) -> f64 {
        self.total_spillover / 100.0
    }

    /// Number of significant directed links
    pub fn significant_links(&self) -> usize {
        self.matrix
            .iter()
            .map(|row| row.iter().filter(|w| **w > 0.0).count())
            .sum()
    }
}

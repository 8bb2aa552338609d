//! Correlation Detector
//!
//! Flags periods where the average pairwise spillover is unusually high.

use super::protocol::{DetectionHeuristic, DetectionInput};
use crate::domain::DetectionMethod;
use agora_core::{Result, stats};

#[derive(Debug, Clone)]
pub struct CorrelationDetector {
    quantile: f64,
}

impl CorrelationDetector {
    pub fn new(quantile: f64) -> Self {
        Self { quantile }
    }
}

/// Mean off-diagonal entry of a square matrix
pub fn average_pairwise(matrix: &[Vec<f64>]) -> f64 {
    let n = matrix.len();
    if n < 2 {
        return 0.0;
    }
    let total: f64 = matrix
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, w)| w)
                .sum::<f64>()
        })
        .sum();
    total / (n * (n - 1)) as f64
}

impl DetectionHeuristic for CorrelationDetector {
    fn detect(&self, input: &DetectionInput<'_>) -> Result<Option<Vec<bool>>> {
        let Some(matrices) = input.matrices else {
            return Ok(None);
        };

        let averages: Vec<f64> = matrices.iter().map(|m| average_pairwise(m)).collect();
        let Some(cutoff) = stats::quantile(&averages, self.quantile) else {
            return Ok(Some(Vec::new()));
        };

        Ok(Some(averages.iter().map(|a| *a > cutoff).collect()))
    }

    fn method(&self) -> DetectionMethod {
        DetectionMethod::Correlation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uniform(n: usize, w: f64) -> Vec<Vec<f64>> {
        (0..n)
            .map(|i| (0..n).map(|j| if i == j { 0.0 } else { w }).collect())
            .collect()
    }

    #[test]
    fn test_average_pairwise() {
        assert_relative_eq!(average_pairwise(&uniform(3, 0.4)), 0.4, epsilon = 1e-12);
        assert_eq!(average_pairwise(&uniform(1, 0.4)), 0.0);
    }

    #[test]
    fn test_without_matrices_abstains() {
        let series = [1.0, 2.0];
        let det = CorrelationDetector::new(0.85);
        assert_eq!(det.detect(&DetectionInput::new(&series)).unwrap(), None);
    }

    #[test]
    fn test_flags_high_correlation_windows() {
        let mut matrices: Vec<Vec<Vec<f64>>> = (0..20).map(|_| uniform(3, 0.1)).collect();
        matrices[12] = uniform(3, 0.9);
        matrices[13] = uniform(3, 0.8);
        let series = vec![0.0; 20];

        let flags = CorrelationDetector::new(0.85)
            .detect(&DetectionInput::new(&series).with_matrices(&matrices))
            .unwrap()
            .unwrap();
        let flagged: Vec<usize> = (0..20).filter(|t| flags[*t]).collect();
        assert_eq!(flagged, vec![12, 13]);
    }
}

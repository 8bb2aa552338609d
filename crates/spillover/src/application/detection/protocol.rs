//! Detection Protocol
//!
//! Core trait for contagion detection heuristics

use crate::domain::DetectionMethod;
use agora_core::Result;

/// Series handed to every detector, aligned period by period
#[derive(Debug, Clone, Copy)]
pub struct DetectionInput<'a> {
    /// Total spillover index per period
    pub spillover: &'a [f64],
    /// Per-period spillover matrices
    pub matrices: Option<&'a [Vec<Vec<f64>>]>,
    /// Market return per period
    pub market_returns: Option<&'a [f64]>,
}

impl<'a> DetectionInput<'a> {
    pub fn new(spillover: &'a [f64]) -> Self {
        Self {
            spillover,
            matrices: None,
            market_returns: None,
        }
    }

    pub fn with_matrices(mut self, matrices: &'a [Vec<Vec<f64>>]) -> Self {
        self.matrices = Some(matrices);
        self
    }

    pub fn with_market_returns(mut self, market_returns: &'a [f64]) -> Self {
        self.market_returns = Some(market_returns);
        self
    }

    pub fn len(&self) -> usize {
        self.spillover.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spillover.is_empty()
    }
}

/// Contagion detection interface
///
/// Each heuristic flags periods independently of the others. All
/// implementations must be thread-safe (Send + Sync).
pub trait DetectionHeuristic: Send + Sync {
    /// Flag per period, or None when the input this heuristic needs is absent
    fn detect(&self, input: &DetectionInput<'_>) -> Result<Option<Vec<bool>>>;

    /// Which method this heuristic implements
    fn method(&self) -> DetectionMethod;

    /// Get the heuristic name for logging/debugging
    fn name(&self) -> &str {
        self.method().name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysOn;

    impl DetectionHeuristic for AlwaysOn {
        fn detect(&self, input: &DetectionInput<'_>) -> Result<Option<Vec<bool>>> {
            Ok(Some(vec![true; input.len()]))
        }

        fn method(&self) -> DetectionMethod {
            DetectionMethod::Threshold
        }
    }

    #[test]
    fn test_trait_object() {
        let detector: Box<dyn DetectionHeuristic> = Box::new(AlwaysOn);
        let series = [1.0, 2.0];
        let flags = detector.detect(&DetectionInput::new(&series)).unwrap();
        assert_eq!(flags, Some(vec![true, true]));
        assert_eq!(detector.name(), "threshold");
    }
}

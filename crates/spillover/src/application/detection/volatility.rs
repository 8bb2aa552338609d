//! Volatility Detector
//!
//! Flags periods of unusually high rolling market volatility.

use super::protocol::{DetectionHeuristic, DetectionInput};
use crate::domain::DetectionMethod;
use agora_core::{Result, RollingStats, stats};

#[derive(Debug, Clone)]
pub struct VolatilityDetector {
    window: usize,
    quantile: f64,
}

impl VolatilityDetector {
    pub fn new(window: usize, quantile: f64) -> Self {
        Self {
            window: window.max(1),
            quantile,
        }
    }

    /// Rolling population std, expanding until the window fills
    pub fn rolling_volatility(&self, returns: &[f64]) -> Vec<f64> {
        let mut rolling = RollingStats::new(self.window);
        returns
            .iter()
            .map(|r| {
                rolling.push(*r);
                rolling.std_dev().unwrap_or(0.0)
            })
            .collect()
    }
}

impl DetectionHeuristic for VolatilityDetector {
    fn detect(&self, input: &DetectionInput<'_>) -> Result<Option<Vec<bool>>> {
        let Some(returns) = input.market_returns else {
            return Ok(None);
        };

        let volatility = self.rolling_volatility(returns);
        let Some(cutoff) = stats::quantile(&volatility, self.quantile) else {
            return Ok(Some(Vec::new()));
        };

        Ok(Some(volatility.iter().map(|v| *v > cutoff).collect()))
    }

    fn method(&self) -> DetectionMethod {
        DetectionMethod::Volatility
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_expanding_start() {
        let det = VolatilityDetector::new(3, 0.9);
        let vol = det.rolling_volatility(&[1.0, 3.0, 1.0, 1.0, 1.0]);
        assert_relative_eq!(vol[0], 0.0);
        assert_relative_eq!(vol[1], 1.0);
        // Window [3, 1, 1] after the first value drops out
        assert_relative_eq!(vol[3], (8.0_f64 / 9.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(vol[4], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_flags_turbulent_stretch() {
        // Calm alternating returns, then ever more large moves inside the window
        let returns: Vec<f64> = (0..40)
            .map(|t| {
                let sign = if t % 2 == 0 { 1.0 } else { -1.0 };
                if t >= 36 { sign * 0.05 } else { sign * 0.001 }
            })
            .collect();
        let series = vec![0.0; 40];

        let flags = VolatilityDetector::new(10, 0.9)
            .detect(&DetectionInput::new(&series).with_market_returns(&returns))
            .unwrap()
            .unwrap();
        let flagged: Vec<usize> = (0..40).filter(|t| flags[*t]).collect();
        assert_eq!(flagged, vec![36, 37, 38, 39]);
    }

    #[test]
    fn test_without_market_data_abstains() {
        let series = [1.0; 5];
        let det = VolatilityDetector::new(10, 0.9);
        assert_eq!(det.detect(&DetectionInput::new(&series)).unwrap(), None);
    }
}

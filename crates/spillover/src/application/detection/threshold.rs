//! Threshold Detector
//!
//! Flags sustained excursions of the spillover index above high quantiles.

use super::protocol::{DetectionHeuristic, DetectionInput};
use crate::domain::{DetectionMethod, flagged_runs};
use agora_core::{Result, stats};
use serde::{Deserialize, Serialize};

/// Run above one quantile cut-point that lasted long enough to count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdEpisode {
    pub quantile: f64,
    pub cutoff: f64,
    /// First period (inclusive)
    pub start: usize,
    /// Last period (inclusive)
    pub end: usize,
}

impl ThresholdEpisode {
    pub fn duration(&self) -> usize {
        self.end - self.start + 1
    }
}

#[derive(Debug, Clone)]
pub struct ThresholdDetector {
    quantiles: Vec<f64>,
    min_duration: usize,
}

impl ThresholdDetector {
    pub fn new(quantiles: Vec<f64>, min_duration: usize) -> Self {
        Self {
            quantiles,
            min_duration: min_duration.max(1),
        }
    }

    /// Surviving sub-episodes at every cut-point
    pub fn sub_episodes(&self, series: &[f64]) -> Vec<ThresholdEpisode> {
        let mut episodes = Vec::new();

        for &q in &self.quantiles {
            let Some(cutoff) = stats::quantile(series, q) else {
                continue;
            };
            let above: Vec<bool> = series.iter().map(|v| *v > cutoff).collect();

            episodes.extend(
                flagged_runs(&above)
                    .into_iter()
                    .filter(|(s, e)| e - s + 1 >= self.min_duration)
                    .map(|(start, end)| ThresholdEpisode {
                        quantile: q,
                        cutoff,
                        start,
                        end,
                    }),
            );
        }

        episodes
    }
}

impl DetectionHeuristic for ThresholdDetector {
    fn detect(&self, input: &DetectionInput<'_>) -> Result<Option<Vec<bool>>> {
        let mut flags = vec![false; input.len()];
        for episode in self.sub_episodes(input.spillover) {
            for flag in &mut flags[episode.start..=episode.end] {
                *flag = true;
            }
        }
        Ok(Some(flags))
    }

    fn method(&self) -> DetectionMethod {
        DetectionMethod::Threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> ThresholdDetector {
        ThresholdDetector::new(vec![0.75, 0.85, 0.90, 0.95], 3)
    }

    #[test]
    fn test_short_excursions_discarded() {
        let mut series = vec![1.0; 30];
        // Two-period blip, then a four-period run
        series[5] = 5.0;
        series[6] = 5.0;
        for v in &mut series[20..24] {
            *v = 4.0;
        }

        let flags = detector()
            .detect(&DetectionInput::new(&series))
            .unwrap()
            .unwrap();
        let flagged: Vec<usize> = (0..30).filter(|t| flags[*t]).collect();
        assert_eq!(flagged, vec![20, 21, 22, 23]);
    }

    #[test]
    fn test_sub_episodes_per_quantile() {
        let mut series: Vec<f64> = (0..20).map(|t| t as f64 * 0.01).collect();
        for v in &mut series[10..15] {
            *v = 10.0;
        }

        let episodes = detector().sub_episodes(&series);
        // Only the q75 cut-point falls below the plateau
        assert!(episodes.iter().any(|e| e.quantile == 0.75 && e.start == 10 && e.end == 14));
        assert!(episodes.iter().all(|e| e.duration() >= 3));
    }

    #[test]
    fn test_flat_series_flags_nothing() {
        let series = vec![2.0; 10];
        let flags = detector()
            .detect(&DetectionInput::new(&series))
            .unwrap()
            .unwrap();
        assert!(flags.iter().all(|f| !f));
    }
}

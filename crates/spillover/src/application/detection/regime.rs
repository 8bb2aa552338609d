//! Regime Detector
//!
//! Mean-shift changepoints by binary segmentation, with a moving-average
//! crossover fallback for short series.

use super::protocol::{DetectionHeuristic, DetectionInput};
use crate::domain::DetectionMethod;
use agora_core::{Result, stats};
use log::debug;
use serde::{Deserialize, Serialize};

/// How the regime detector segments the series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegimeMethod {
    BinarySegmentation,
    MovingAverage,
}

#[derive(Debug, Clone)]
pub struct RegimeDetector {
    method: RegimeMethod,
    min_segment: usize,
    penalty_factor: f64,
    short_window: usize,
    long_window: usize,
}

impl RegimeDetector {
    /// Series shorter than this use the moving-average fallback
    pub const MIN_SEGMENTATION_LENGTH: usize = 10;

    pub fn new(
        method: RegimeMethod,
        min_segment: usize,
        penalty_factor: f64,
        short_window: usize,
        long_window: usize,
    ) -> Self {
        Self {
            method,
            min_segment: min_segment.max(1),
            penalty_factor,
            short_window: short_window.max(1),
            long_window: long_window.max(1),
        }
    }

    /// Method actually used for a series of length `n`
    pub fn effective_method(&self, n: usize) -> RegimeMethod {
        if n < Self::MIN_SEGMENTATION_LENGTH.max(2 * self.min_segment) {
            RegimeMethod::MovingAverage
        } else {
            self.method
        }
    }

    /// Flag segments between changepoints whose mean exceeds the series median
    fn segment_flags(&self, series: &[f64]) -> Vec<bool> {
        let n = series.len();
        let Some(median) = stats::median(series) else {
            return Vec::new();
        };

        let variance = stats::variance(series).unwrap_or(0.0);
        let penalty = self.penalty_factor * variance * (n as f64).ln();
        let cps = changepoints(series, self.min_segment, penalty);
        debug!("Regime changepoints: {:?}", cps);

        let mut flags = vec![false; n];
        let mut bounds = Vec::with_capacity(cps.len() + 2);
        bounds.push(0);
        bounds.extend(cps);
        bounds.push(n);

        for pair in bounds.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if stats::mean(&series[a..b]).is_some_and(|m| m > median) {
                for flag in &mut flags[a..b] {
                    *flag = true;
                }
            }
        }
        flags
    }

    /// Short moving average above long moving average (both expanding at the start)
    fn crossover_flags(&self, series: &[f64]) -> Vec<bool> {
        let short = trailing_mean(series, self.short_window);
        let long = trailing_mean(series, self.long_window);
        short.iter().zip(&long).map(|(s, l)| s > l).collect()
    }
}

impl DetectionHeuristic for RegimeDetector {
    fn detect(&self, input: &DetectionInput<'_>) -> Result<Option<Vec<bool>>> {
        let flags = match self.effective_method(input.len()) {
            RegimeMethod::BinarySegmentation => self.segment_flags(input.spillover),
            RegimeMethod::MovingAverage => self.crossover_flags(input.spillover),
        };
        Ok(Some(flags))
    }

    fn method(&self) -> DetectionMethod {
        DetectionMethod::Regime
    }
}

fn trailing_mean(series: &[f64], window: usize) -> Vec<f64> {
    (0..series.len())
        .map(|t| {
            let from = (t + 1).saturating_sub(window);
            stats::mean(&series[from..=t]).unwrap_or(0.0)
        })
        .collect()
}

/// Least-squares cost of fitting one mean to `[a, b)`
struct SegmentCost {
    sum: Vec<f64>,
    sum_sq: Vec<f64>,
}

impl SegmentCost {
    fn new(series: &[f64]) -> Self {
        let mut sum = Vec::with_capacity(series.len() + 1);
        let mut sum_sq = Vec::with_capacity(series.len() + 1);
        sum.push(0.0);
        sum_sq.push(0.0);
        for x in series {
            sum.push(sum[sum.len() - 1] + x);
            sum_sq.push(sum_sq[sum_sq.len() - 1] + x * x);
        }
        Self { sum, sum_sq }
    }

    fn cost(&self, a: usize, b: usize) -> f64 {
        let len = (b - a) as f64;
        let s = self.sum[b] - self.sum[a];
        let s2 = self.sum_sq[b] - self.sum_sq[a];
        (s2 - s * s / len).max(0.0)
    }
}

/// Binary segmentation on the mean
///
/// A split is accepted when it lowers the least-squares cost by more than
/// `penalty`; both sides must hold at least `min_segment` points. Returns
/// sorted indices at which a new segment starts.
pub fn changepoints(series: &[f64], min_segment: usize, penalty: f64) -> Vec<usize> {
    let n = series.len();
    let min_segment = min_segment.max(1);
    if n < 2 * min_segment {
        return Vec::new();
    }

    let cost = SegmentCost::new(series);
    let mut found = Vec::new();
    let mut pending = vec![(0, n)];

    while let Some((a, b)) = pending.pop() {
        if b - a < 2 * min_segment {
            continue;
        }
        let whole = cost.cost(a, b);

        let best = (a + min_segment..=b - min_segment)
            .map(|s| (s, cost.cost(a, s) + cost.cost(s, b)))
            .min_by(|x, y| x.1.total_cmp(&y.1));

        if let Some((split, split_cost)) = best {
            if whole - split_cost > penalty {
                found.push(split);
                pending.push((a, split));
                pending.push((split, b));
            }
        }
    }

    found.sort_unstable();
    found
}

//! Consensus Contagion Detector
//!
//! Runs the four heuristics, counts per-period votes and groups consensus
//! periods into episodes.

use super::correlation::CorrelationDetector;
use super::protocol::{DetectionHeuristic, DetectionInput};
use super::regime::{RegimeDetector, RegimeMethod};
use super::threshold::{ThresholdDetector, ThresholdEpisode};
use super::volatility::VolatilityDetector;
use crate::domain::{ContagionEpisode, DetectionMethod, Severity, flagged_runs};
use agora_core::{AgoraError, Result, stats};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Configuration for contagion detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContagionConfig {
    /// Cut-points for the threshold detector
    pub threshold_quantiles: Vec<f64>,
    /// Shortest threshold sub-episode that counts
    pub min_duration: usize,
    pub regime_method: RegimeMethod,
    /// Minimum segment length for binary segmentation
    pub min_segment: usize,
    /// Multiplier on the variance * ln(n) changepoint penalty
    pub penalty_factor: f64,
    pub ma_short_window: usize,
    pub ma_long_window: usize,
    pub correlation_quantile: f64,
    pub volatility_window: usize,
    pub volatility_quantile: f64,
    /// Votes needed for a consensus period
    pub min_votes: usize,
    pub moderate_quantile: f64,
    pub severe_quantile: f64,
}

impl Default for ContagionConfig {
    fn default() -> Self {
        Self {
            threshold_quantiles: vec![0.75, 0.85, 0.90, 0.95],
            min_duration: 3,
            regime_method: RegimeMethod::BinarySegmentation,
            min_segment: 2,
            penalty_factor: 1.0,
            ma_short_window: 5,
            ma_long_window: 20,
            correlation_quantile: 0.85,
            volatility_window: 10,
            volatility_quantile: 0.90,
            min_votes: 2,
            moderate_quantile: 0.85,
            severe_quantile: 0.95,
        }
    }
}

impl ContagionConfig {
    pub fn validate(&self) -> Result<()> {
        let quantiles = self.threshold_quantiles.iter().copied().chain([
            self.correlation_quantile,
            self.volatility_quantile,
            self.moderate_quantile,
            self.severe_quantile,
        ]);
        for q in quantiles {
            if !(0.0..=1.0).contains(&q) {
                return Err(AgoraError::configuration(format!(
                    "quantile must be in [0, 1], got {}",
                    q
                )));
            }
        }
        if self.threshold_quantiles.is_empty() {
            return Err(AgoraError::configuration("no threshold quantiles"));
        }
        if self.min_votes == 0 || self.min_votes > DetectionMethod::ALL.len() {
            return Err(AgoraError::configuration(format!(
                "min_votes must be in 1..={}, got {}",
                DetectionMethod::ALL.len(),
                self.min_votes
            )));
        }
        if self.min_duration == 0 || self.min_segment == 0 {
            return Err(AgoraError::configuration(
                "min_duration and min_segment must be positive",
            ));
        }
        if self.ma_short_window == 0
            || self.ma_long_window < self.ma_short_window
            || self.volatility_window == 0
        {
            return Err(AgoraError::configuration(
                "moving-average and volatility windows must be positive, short <= long",
            ));
        }
        if !(self.penalty_factor.is_finite() && self.penalty_factor >= 0.0) {
            return Err(AgoraError::configuration("penalty_factor must be non-negative"));
        }
        Ok(())
    }
}

/// One heuristic's output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodFlags {
    pub method: DetectionMethod,
    pub flags: Vec<bool>,
    pub flagged_periods: usize,
    /// Inclusive runs of flagged periods
    pub intervals: Vec<(usize, usize)>,
}

impl MethodFlags {
    fn new(method: DetectionMethod, flags: Vec<bool>) -> Self {
        Self {
            method,
            flagged_periods: flags.iter().filter(|f| **f).count(),
            intervals: flagged_runs(&flags),
            flags,
        }
    }
}

/// Full detection output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContagionReport {
    pub n_periods: usize,
    pub min_votes: usize,
    /// Heuristics that ran (absent inputs skip a heuristic)
    pub methods: Vec<MethodFlags>,
    pub threshold_episodes: Vec<ThresholdEpisode>,
    /// Number of heuristics flagging each period
    pub votes: Vec<usize>,
    pub episodes: Vec<ContagionEpisode>,
    pub moderate_cutoff: f64,
    pub severe_cutoff: f64,
}

impl ContagionReport {
    /// Periods flagged by at least `k` heuristics
    pub fn periods_with_votes(&self, k: usize) -> Vec<usize> {
        self.votes
            .iter()
            .enumerate()
            .filter(|(_, v)| **v >= k)
            .map(|(t, _)| t)
            .collect()
    }

    pub fn consensus_periods(&self) -> Vec<usize> {
        self.periods_with_votes(self.min_votes)
    }

    /// Share of periods inside a consensus episode
    pub fn contagion_fraction(&self) -> f64 {
        if self.n_periods == 0 {
            return 0.0;
        }
        let in_episodes: usize = self.episodes.iter().map(|e| e.duration).sum();
        in_episodes as f64 / self.n_periods as f64
    }

    pub fn method(&self, method: DetectionMethod) -> Option<&MethodFlags> {
        self.methods.iter().find(|m| m.method == method)
    }
}

/// Fuses the four named heuristics by per-period vote
#[derive(Debug, Clone)]
pub struct ContagionDetector {
    config: ContagionConfig,
    threshold: ThresholdDetector,
    regime: RegimeDetector,
    correlation: CorrelationDetector,
    volatility: VolatilityDetector,
}

impl ContagionDetector {
    pub fn new(config: ContagionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            threshold: ThresholdDetector::new(
                config.threshold_quantiles.clone(),
                config.min_duration,
            ),
            regime: RegimeDetector::new(
                config.regime_method,
                config.min_segment,
                config.penalty_factor,
                config.ma_short_window,
                config.ma_long_window,
            ),
            correlation: CorrelationDetector::new(config.correlation_quantile),
            volatility: VolatilityDetector::new(
                config.volatility_window,
                config.volatility_quantile,
            ),
            config,
        })
    }

    pub fn config(&self) -> &ContagionConfig {
        &self.config
    }

    /// Detect contagion episodes in a spillover series
    pub fn detect(&self, input: &DetectionInput<'_>) -> Result<ContagionReport> {
        validate_input(input)?;
        let n = input.len();

        let heuristics: [&dyn DetectionHeuristic; 4] = [
            &self.threshold,
            &self.regime,
            &self.correlation,
            &self.volatility,
        ];

        let mut methods = Vec::with_capacity(heuristics.len());
        let mut votes = vec![0usize; n];
        for heuristic in heuristics {
            let Some(flags) = heuristic.detect(input)? else {
                debug!("{} detector skipped: input not provided", heuristic.name());
                continue;
            };
            if flags.len() != n {
                return Err(AgoraError::data_shape(format!(
                    "{} detector returned {} flags for {} periods",
                    heuristic.name(),
                    flags.len(),
                    n
                )));
            }
            for (vote, flag) in votes.iter_mut().zip(&flags) {
                *vote += usize::from(*flag);
            }
            let outcome = MethodFlags::new(heuristic.method(), flags);
            debug!(
                "{} detector flagged {} periods in {} runs",
                heuristic.name(),
                outcome.flagged_periods,
                outcome.intervals.len()
            );
            methods.push(outcome);
        }

        let moderate_cutoff =
            stats::quantile(input.spillover, self.config.moderate_quantile).unwrap_or(0.0);
        let severe_cutoff =
            stats::quantile(input.spillover, self.config.severe_quantile).unwrap_or(0.0);

        let consensus: Vec<bool> = votes.iter().map(|v| *v >= self.config.min_votes).collect();
        let episodes = flagged_runs(&consensus)
            .into_iter()
            .map(|(start, end)| {
                let slice = &input.spillover[start..=end];
                let peak = slice.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                ContagionEpisode {
                    start,
                    end,
                    duration: end - start + 1,
                    peak_spillover: peak,
                    average_spillover: stats::mean(slice).unwrap_or(0.0),
                    severity: Severity::classify(peak, moderate_cutoff, severe_cutoff),
                    methods: methods
                        .iter()
                        .filter(|m| m.flags[start..=end].iter().any(|f| *f))
                        .map(|m| m.method)
                        .collect(),
                }
            })
            .collect::<Vec<_>>();

        info!(
            "Contagion detection: {} periods, {} heuristics, {} consensus episodes",
            n,
            methods.len(),
            episodes.len()
        );

        Ok(ContagionReport {
            n_periods: n,
            min_votes: self.config.min_votes,
            threshold_episodes: self.threshold.sub_episodes(input.spillover),
            methods,
            votes,
            episodes,
            moderate_cutoff,
            severe_cutoff,
        })
    }
}

fn validate_input(input: &DetectionInput<'_>) -> Result<()> {
    let n = input.len();
    if n == 0 {
        return Err(AgoraError::configuration("spillover series is empty"));
    }
    if input.spillover.iter().any(|v| !v.is_finite()) {
        return Err(AgoraError::data_shape("spillover series contains NaN or infinite values"));
    }
    if let Some(matrices) = input.matrices {
        if matrices.len() != n {
            return Err(AgoraError::data_shape(format!(
                "{} matrices for {} spillover periods",
                matrices.len(),
                n
            )));
        }
    }
    if let Some(returns) = input.market_returns {
        if returns.len() != n {
            return Err(AgoraError::data_shape(format!(
                "{} market returns for {} spillover periods",
                returns.len(),
                n
            )));
        }
        if returns.iter().any(|r| !r.is_finite()) {
            return Err(AgoraError::data_shape("market returns contain NaN or infinite values"));
        }
    }
    Ok(())
}

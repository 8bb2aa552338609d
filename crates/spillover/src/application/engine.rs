//! Spillover Engine
//!
//! Rolling-window correlation networks over asset log-returns. Each window is
//! computed independently and written by index.

use crate::domain::{NetworkMetrics, SpilloverWindow};
use agora_core::series::validate_matrix;
use agora_core::{AgoraError, Result, ReturnSeries, parallel, stats};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Configuration for the rolling spillover analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpilloverConfig {
    /// Returns per window (>= 3)
    pub window_size: usize,
    /// Two-sided p-value cut-off for keeping a link, in (0, 1)
    pub significance_level: f64,
    /// Lead-lag in periods; 0 gives the contemporaneous (symmetric) matrix
    pub lag: usize,
    /// Compute windows on the rayon pool (needs the `parallel` feature)
    pub parallel: bool,
}

impl Default for SpilloverConfig {
    fn default() -> Self {
        Self {
            window_size: 20,
            significance_level: 0.05,
            lag: 0,
            parallel: true,
        }
    }
}

impl SpilloverConfig {
    /// Observations per correlation estimate
    pub fn effective_sample(&self) -> usize {
        self.window_size.saturating_sub(self.lag)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size < 3 {
            return Err(AgoraError::configuration(format!(
                "window_size must be >= 3, got {}",
                self.window_size
            )));
        }
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(AgoraError::configuration(format!(
                "significance_level must be in (0, 1), got {}",
                self.significance_level
            )));
        }
        if self.lag >= self.window_size || self.effective_sample() < 3 {
            return Err(AgoraError::configuration(format!(
                "lag {} leaves fewer than 3 observations in a window of {}",
                self.lag, self.window_size
            )));
        }
        Ok(())
    }
}

/// Descriptive statistics of a spillover run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpilloverSummary {
    pub n_windows: usize,
    pub mean_spillover: f64,
    pub max_spillover: f64,
    /// Window index of the maximum
    pub peak_window: usize,
    pub degenerate_windows: usize,
    /// Average net spillover per asset; positive means net transmitter
    pub average_net: Vec<f64>,
}

/// Per-window spillover results, aligned by window index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpilloverResult {
    pub window_size: usize,
    pub lag: usize,
    pub n_assets: usize,
    pub windows: Vec<SpilloverWindow>,
}

impl SpilloverResult {
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn total_spillover(&self) -> Vec<f64> {
        self.windows.iter().map(|w| w.total_spillover).collect()
    }

    /// Average off-diagonal entry per window
    pub fn average_pairwise(&self) -> Vec<f64> {
        self.windows.iter().map(|w| w.average_pairwise()).collect()
    }

    pub fn to_others(&self) -> Vec<Vec<f64>> {
        self.windows.iter().map(|w| w.to_others.clone()).collect()
    }

    pub fn from_others(&self) -> Vec<Vec<f64>> {
        self.windows.iter().map(|w| w.from_others.clone()).collect()
    }

    pub fn net(&self) -> Vec<Vec<f64>> {
        self.windows.iter().map(|w| w.net.clone()).collect()
    }

    pub fn metrics(&self) -> Vec<NetworkMetrics> {
        self.windows.iter().map(|w| w.metrics).collect()
    }

    pub fn matrices(&self) -> Vec<Vec<Vec<f64>>> {
        self.windows.iter().map(|w| w.matrix.clone()).collect()
    }

    /// Price period at which each window ends
    pub fn window_ends(&self) -> Vec<usize> {
        self.windows.iter().map(|w| w.end).collect()
    }

    pub fn degenerate_windows(&self) -> Vec<usize> {
        self.windows
            .iter()
            .filter(|w| w.degenerate)
            .map(|w| w.index)
            .collect()
    }

    pub fn summary(&self) -> SpilloverSummary {
        let totals = self.total_spillover();
        let (peak_window, max_spillover) = totals
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |(bi, bv), (i, v)| {
                if *v > bv { (i, *v) } else { (bi, bv) }
            });

        let n = self.windows.len().max(1) as f64;
        let average_net = (0..self.n_assets)
            .map(|a| self.windows.iter().map(|w| w.net[a]).sum::<f64>() / n)
            .collect();

        SpilloverSummary {
            n_windows: self.windows.len(),
            mean_spillover: stats::mean(&totals).unwrap_or(0.0),
            max_spillover: if totals.is_empty() { 0.0 } else { max_spillover },
            peak_window,
            degenerate_windows: self.windows.iter().filter(|w| w.degenerate).count(),
            average_net,
        }
    }
}

/// Rolling-window spillover network estimator
#[derive(Debug, Clone)]
pub struct SpilloverEngine {
    config: SpilloverConfig,
}

impl SpilloverEngine {
    pub fn new(config: SpilloverConfig) -> Result<Self> {
        config.validate()?;
        if config.parallel && !parallel::is_available() {
            warn!("Parallel windows requested but built without the `parallel` feature");
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &SpilloverConfig {
        &self.config
    }

    /// Analyze a price matrix (periods x assets); prices must be positive
    pub fn analyze_prices(&self, prices: &[Vec<f64>]) -> Result<SpilloverResult> {
        let n_assets = validate_matrix(prices, "prices")?;
        let columns = (0..n_assets)
            .map(|a| {
                let path: Vec<f64> = prices.iter().map(|row| row[a]).collect();
                stats::log_returns(&path)
            })
            .collect::<Result<Vec<_>>>()?;
        self.analyze_columns(&columns)
    }

    /// Analyze a return series directly
    pub fn analyze_returns(&self, returns: &ReturnSeries) -> Result<SpilloverResult> {
        let columns: Vec<Vec<f64>> = (0..returns.n_assets()).map(|a| returns.column(a)).collect();
        self.analyze_columns(&columns)
    }

    fn analyze_columns(&self, columns: &[Vec<f64>]) -> Result<SpilloverResult> {
        let n_assets = columns.len();
        let n_returns = columns.first().map_or(0, |c| c.len());
        let w = self.config.window_size;

        if n_assets == 0 {
            return Err(AgoraError::data_shape("no assets to analyze"));
        }
        if w > n_returns {
            return Err(AgoraError::configuration(format!(
                "window_size {} exceeds the {} available returns",
                w, n_returns
            )));
        }

        let n_windows = n_returns - w + 1;
        info!(
            "Spillover analysis: {} assets, {} returns, {} windows (w={}, lag={}, alpha={})",
            n_assets, n_returns, n_windows, w, self.config.lag, self.config.significance_level
        );

        let windows = parallel::map_indexed(
            n_windows,
            |k| self.window(columns, k),
            !self.config.parallel,
        )
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

        let result = SpilloverResult {
            window_size: w,
            lag: self.config.lag,
            n_assets,
            windows,
        };

        let degenerate = result.degenerate_windows();
        if !degenerate.is_empty() {
            warn!(
                "{} of {} windows degenerate (zero spillover)",
                degenerate.len(),
                n_windows
            );
        }
        debug!("Spillover summary: {:?}", result.summary());

        Ok(result)
    }

    /// Window k: returns k..k+w, ending at price period k+w
    fn window(&self, columns: &[Vec<f64>], k: usize) -> Result<SpilloverWindow> {
        let n = columns.len();
        let w = self.config.window_size;
        let lag = self.config.lag;
        let n_eff = self.config.effective_sample();
        let end = k + w;

        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in 0..n {
                if i == j || (lag == 0 && j < i) {
                    continue;
                }

                // Asset j leads asset i by `lag` periods
                let leader = &columns[j][k..end - lag];
                let follower = &columns[i][k + lag..end];

                let r = match stats::pearson(leader, follower) {
                    Ok(r) => r,
                    Err(e) if e.is_recoverable() => {
                        warn!("Window {} (ends {}): {}; zero spillover", k, end, e);
                        return Ok(SpilloverWindow::degenerate(k, k, end, n));
                    }
                    Err(e) => return Err(e),
                };

                let p = stats::correlation_p_value(r, n_eff)?;
                let weight = if p <= self.config.significance_level {
                    r.abs()
                } else {
                    0.0
                };

                matrix[i][j] = weight;
                if lag == 0 {
                    matrix[j][i] = weight;
                }
            }
        }

        Ok(SpilloverWindow::from_matrix(k, k, end, matrix))
    }
}

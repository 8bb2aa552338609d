//! Market State
//!
//! Per-period market record and the read-only signal bundle handed to agents.

use agora_core::Regime;
use serde::{Deserialize, Serialize};

/// Market record for one period (append-only once written)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketState {
    /// Period index (0 = initial state)
    pub period: usize,
    /// Price index per asset
    pub prices: Vec<f64>,
    /// Traded units per asset
    pub volumes: Vec<f64>,
    /// Regime in force during the period
    pub regime: Regime,
    /// Market sentiment in [0.1, 0.9]
    pub sentiment: f64,
}

impl MarketState {
    /// Initial state: every asset priced at `initial_price`, no volume
    pub fn initial(n_assets: usize, initial_price: f64, sentiment: f64) -> Self {
        Self {
            period: 0,
            prices: vec![initial_price; n_assets],
            volumes: vec![0.0; n_assets],
            regime: Regime::Normal,
            sentiment,
        }
    }

    pub fn n_assets(&self) -> usize {
        self.prices.len()
    }

    /// Equal-weighted average price index
    pub fn mean_price(&self) -> f64 {
        if self.prices.is_empty() {
            return 0.0;
        }
        self.prices.iter().sum::<f64>() / self.prices.len() as f64
    }

    pub fn total_volume(&self) -> f64 {
        self.volumes.iter().sum()
    }
}

/// Signal bundle shared read-only by every agent during one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSignals {
    /// Mean relative price change over the momentum window, per asset
    pub momentum: Vec<f64>,
    /// Relative price dispersion over the volatility window, per asset
    pub volatility: Vec<f64>,
    pub sentiment: f64,
    pub regime: Regime,
    /// Latest price per asset (decision and execution price)
    pub last_prices: Vec<f64>,
}

impl MarketSignals {
    pub fn n_assets(&self) -> usize {
        self.last_prices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = MarketState::initial(3, 100.0, 0.5);
        assert_eq!(state.period, 0);
        assert_eq!(state.prices, vec![100.0; 3]);
        assert_eq!(state.total_volume(), 0.0);
        assert_eq!(state.mean_price(), 100.0);
        assert_eq!(state.regime, Regime::Normal);
    }
}

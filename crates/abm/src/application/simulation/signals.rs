//! Market signal extraction from the price history

use super::config::SimulationConfig;
use crate::domain::MarketSignals;
use agora_core::{Regime, stats};

/// Build the signal bundle from prices observed so far (`history[0]` is the initial state)
pub(crate) fn market_signals(
    history: &[Vec<f64>],
    sentiment: f64,
    regime: Regime,
    config: &SimulationConfig,
) -> MarketSignals {
    let last_prices = history.last().cloned().unwrap_or_default();
    let n_assets = last_prices.len();

    let momentum = (0..n_assets)
        .map(|a| momentum(history, a, config.momentum_window))
        .collect();
    let volatility = (0..n_assets)
        .map(|a| {
            relative_volatility(history, a, config.volatility_window)
                .unwrap_or(config.default_volatility)
        })
        .collect();

    MarketSignals {
        momentum,
        volatility,
        sentiment,
        regime,
        last_prices,
    }
}

/// Mean one-period relative change over the last `window` periods, 0 without enough history
fn momentum(history: &[Vec<f64>], asset: usize, window: usize) -> f64 {
    if history.len() <= window {
        return 0.0;
    }

    let tail = &history[history.len() - window - 1..];
    let changes: Vec<f64> = tail
        .windows(2)
        .filter_map(|pair| stats::simple_return(pair[0][asset], pair[1][asset]))
        .collect();

    stats::mean(&changes).unwrap_or(0.0)
}

/// Std of the last `window` prices relative to the latest price
fn relative_volatility(history: &[Vec<f64>], asset: usize, window: usize) -> Option<f64> {
    if history.len() <= window {
        return None;
    }

    let prices: Vec<f64> = history[history.len() - window..]
        .iter()
        .map(|row| row[asset])
        .collect();
    let last = *prices.last()?;
    if last <= 0.0 {
        return None;
    }
    Some(stats::std_dev(&prices)? / last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn history(prices: &[f64]) -> Vec<Vec<f64>> {
        prices.iter().map(|p| vec![*p]).collect()
    }

    #[test]
    fn test_defaults_without_history() {
        let config = SimulationConfig::default();
        let signals = market_signals(&history(&[100.0, 101.0]), 0.5, Regime::Normal, &config);

        assert_eq!(signals.momentum, vec![0.0]);
        assert_eq!(signals.volatility, vec![config.default_volatility]);
        assert_eq!(signals.last_prices, vec![101.0]);
    }

    #[test]
    fn test_momentum_of_steady_growth() {
        // 1% growth every period for 12 periods
        let prices: Vec<f64> = (0..12).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        let config = SimulationConfig::default();
        let signals = market_signals(&history(&prices), 0.5, Regime::Normal, &config);

        assert_relative_eq!(signals.momentum[0], 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_prices_have_zero_volatility() {
        let config = SimulationConfig::default();
        let signals = market_signals(&history(&[100.0; 8]), 0.5, Regime::Normal, &config);
        assert_relative_eq!(signals.volatility[0], 0.0);
    }
}

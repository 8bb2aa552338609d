//! Simulation Configuration

use agora_core::{AgoraError, Result};
use serde::{Deserialize, Serialize};

/// Regime switching probabilities and sentiment shocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeConfig {
    /// Per-period probability of entering a crisis
    pub crisis_probability: f64,
    /// Per-period probability of leaving a crisis
    pub recovery_probability: f64,
    /// Per-period probability of switching between low and normal
    pub switch_probability: f64,
    /// Sentiment drop when a crisis starts
    pub crisis_sentiment_drop: f64,
    /// Half-width of the uniform sentiment shock on a low/normal switch
    pub switch_sentiment_shock: f64,
    /// Sentiment clamp range
    pub sentiment_bounds: (f64, f64),
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            crisis_probability: 0.02,
            recovery_probability: 0.1,
            switch_probability: 0.05,
            crisis_sentiment_drop: 0.2,
            switch_sentiment_shock: 0.1,
            sentiment_bounds: (0.1, 0.9),
        }
    }
}

impl RegimeConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, p) in [
            ("crisis_probability", self.crisis_probability),
            ("recovery_probability", self.recovery_probability),
            ("switch_probability", self.switch_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(AgoraError::configuration(format!(
                    "{} must be in [0, 1], got {}",
                    name, p
                )));
            }
        }
        let (lo, hi) = self.sentiment_bounds;
        if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo > hi {
            return Err(AgoraError::configuration(format!(
                "invalid sentiment bounds ({}, {})",
                lo, hi
            )));
        }
        if self.crisis_sentiment_drop < 0.0 || self.switch_sentiment_shock < 0.0 {
            return Err(AgoraError::configuration(
                "sentiment shocks must be non-negative",
            ));
        }
        Ok(())
    }
}

/// Configuration for the market simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of periods to simulate (> 0)
    pub n_periods: usize,
    /// Diffuse sentiment over the information layer when a network is given
    pub network_effects: bool,
    /// Run per-agent phases on the rayon pool (needs the `parallel` feature)
    pub parallel: bool,
    /// Starting price of every asset
    pub initial_price: f64,
    /// Starting market sentiment
    pub initial_sentiment: f64,
    /// Price change per unit of aggregate demand
    pub price_impact: f64,
    /// Std of the idiosyncratic noise added to base returns
    pub return_noise_std: f64,
    /// Lookback for the momentum signal (periods)
    pub momentum_window: usize,
    /// Lookback for the volatility signal (prices)
    pub volatility_window: usize,
    /// Volatility reported before enough history exists
    pub default_volatility: f64,
    /// Fundamentalists' anchor return, in percent per period
    pub fundamental_return: f64,
    /// Std of perceived momentum noise at zero noise tolerance (percent units)
    pub momentum_noise_std: f64,
    /// Std of perceived sentiment noise at zero noise tolerance
    pub sentiment_noise_std: f64,
    /// Std of the noise trader's raw signal
    pub noise_trader_std: f64,
    /// Weight of neighbours' sentiment in the blended signal
    pub social_weight: f64,
    pub regime: RegimeConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            n_periods: 250,
            network_effects: true,
            parallel: true,
            initial_price: 100.0,
            initial_sentiment: 0.5,
            price_impact: 1e-4,
            return_noise_std: 0.001,
            momentum_window: 10,
            volatility_window: 5,
            default_volatility: 0.1,
            fundamental_return: 0.05,
            momentum_noise_std: 1.0,
            sentiment_noise_std: 0.1,
            noise_trader_std: 0.5,
            social_weight: 0.3,
            regime: RegimeConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.n_periods == 0 {
            return Err(AgoraError::configuration("n_periods must be positive"));
        }
        if !(self.initial_price.is_finite() && self.initial_price > 0.0) {
            return Err(AgoraError::configuration(format!(
                "initial_price must be positive, got {}",
                self.initial_price
            )));
        }
        if self.momentum_window == 0 || self.volatility_window < 2 {
            return Err(AgoraError::configuration(
                "momentum_window must be >= 1 and volatility_window >= 2",
            ));
        }
        if !(0.0..=1.0).contains(&self.social_weight) {
            return Err(AgoraError::configuration(format!(
                "social_weight must be in [0, 1], got {}",
                self.social_weight
            )));
        }
        for (name, value) in [
            ("price_impact", self.price_impact),
            ("return_noise_std", self.return_noise_std),
            ("default_volatility", self.default_volatility),
            ("momentum_noise_std", self.momentum_noise_std),
            ("sentiment_noise_std", self.sentiment_noise_std),
            ("noise_trader_std", self.noise_trader_std),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(AgoraError::configuration(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        self.regime.validate()
    }
}

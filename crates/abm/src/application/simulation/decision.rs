//! Agent Decisions
//!
//! Split into a random perception step, drawn from the agent's own stream,
//! and a pure decision rule mapping what the agent perceived to a target
//! position.

use super::config::SimulationConfig;
use crate::domain::{Agent, AgentType, MarketSignals};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// What one agent observed this period
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Perception {
    /// Noisy momentum per asset, in percent
    pub momentum: Vec<f64>,
    /// Noisy sentiment (before social blending)
    pub sentiment: f64,
    /// Raw noise-trader signal per asset (empty for other types)
    pub noise_signal: Vec<f64>,
    /// Whether the agent trades this period
    pub trades: bool,
}

/// Draw the agent's noisy view of the market from its own seeded stream
pub(crate) fn perceive(
    agent: &Agent,
    signals: &MarketSignals,
    config: &SimulationConfig,
    seed: u64,
) -> Perception {
    let mut rng = StdRng::seed_from_u64(seed);
    let blur = 1.0 - agent.params().noise_tolerance();

    let momentum = signals
        .momentum
        .iter()
        .map(|m| 100.0 * m + gaussian(&mut rng) * blur * config.momentum_noise_std)
        .collect();

    let sentiment = (signals.sentiment + gaussian(&mut rng) * blur * config.sentiment_noise_std)
        .clamp(0.0, 1.0);

    let noise_signal = if agent.agent_type() == AgentType::Noise {
        (0..signals.n_assets())
            .map(|_| gaussian(&mut rng) * config.noise_trader_std)
            .collect()
    } else {
        Vec::new()
    };

    let trades = rng.r#gen::<f64>() < agent.params().trading_frequency();

    Perception {
        momentum,
        sentiment,
        noise_signal,
        trades,
    }
}

fn gaussian(rng: &mut StdRng) -> f64 {
    rng.sample::<f64, _>(StandardNormal)
}

/// Blend own sentiment with the influence-weighted mean of neighbours' sentiment
///
/// Without neighbours (or with zero total influence) the own signal is kept.
pub(crate) fn blend_sentiment(
    own: f64,
    neighbors: &[usize],
    sentiments: &[f64],
    influence: &[f64],
    social_weight: f64,
) -> f64 {
    let mut weighted = 0.0;
    let mut total = 0.0;
    for &n in neighbors {
        weighted += influence[n] * sentiments[n];
        total += influence[n];
    }
    if total <= 0.0 {
        return own;
    }
    (1.0 - social_weight) * own + social_weight * (weighted / total)
}

/// Type-specific raw signal for one asset, before clamping
///
/// `momentum` is in percent; `sentiment` in [0, 1].
pub fn raw_signal(
    agent_type: AgentType,
    trend_sensitivity: f64,
    momentum: f64,
    sentiment: f64,
    volatility: f64,
    noise: f64,
    fundamental_return: f64,
) -> f64 {
    let tilt = 2.0 * (sentiment - 0.5);
    match agent_type {
        AgentType::Momentum => trend_sensitivity * momentum,
        AgentType::Contrarian => -trend_sensitivity * momentum,
        AgentType::Fundamentalist => trend_sensitivity * (fundamental_return - momentum),
        AgentType::Noise => noise,
        AgentType::Herding => trend_sensitivity * tilt,
        AgentType::Sophisticated => {
            trend_sensitivity * (0.5 * momentum + 0.3 * tilt) - 0.2 * volatility * 10.0
        }
    }
}

/// Target position per asset for a trading agent
///
/// Pure in its inputs: the perception carries all the randomness.
pub(crate) fn target_position(
    agent: &Agent,
    perception: &Perception,
    sentiment: f64,
    signals: &MarketSignals,
    fundamental_return: f64,
) -> Vec<f64> {
    let n_assets = signals.n_assets();
    let wealth = agent.current_wealth();
    let params = agent.params();

    (0..n_assets)
        .map(|a| {
            let price = signals.last_prices[a];
            if wealth <= 0.0 || price <= 0.0 {
                return 0.0;
            }
            let signal = raw_signal(
                agent.agent_type(),
                params.trend_sensitivity(),
                perception.momentum[a],
                sentiment,
                signals.volatility[a],
                perception.noise_signal.get(a).copied().unwrap_or(0.0),
                fundamental_return,
            );
            let cap = wealth * params.risk_tolerance() / n_assets as f64 / price;
            signal.clamp(-1.0, 1.0) * cap
        })
        .collect()
}

/// Scale a book down so its gross exposure at `prices` is at most `limit`
fn within_leverage(mut position: Vec<f64>, prices: &[f64], limit: f64) -> Vec<f64> {
    let gross: f64 = position.iter().zip(prices).map(|(q, p)| q.abs() * p).sum();
    if gross > limit {
        let scale = limit.max(0.0) / gross;
        for q in &mut position {
            *q *= scale;
        }
    }
    position
}

/// Next position: the target if the agent trades, else the held book
///
/// Either way the book is cut back to `leverage_limit × current_wealth` gross
/// exposure at the last prices. A fresh target is already within
/// `risk_tolerance × current_wealth`, so only a held book that lost value
/// can be cut.
pub(crate) fn next_position(
    agent: &Agent,
    perception: &Perception,
    sentiment: f64,
    signals: &MarketSignals,
    config: &SimulationConfig,
) -> Vec<f64> {
    let position = if perception.trades {
        target_position(
            agent,
            perception,
            sentiment,
            signals,
            config.fundamental_return,
        )
    } else {
        agent.position().to_vec()
    };
    let limit = agent.leverage_limit() * agent.current_wealth();
    within_leverage(position, &signals.last_prices, limit)
}

//! Behavioral Agent Types
//!
//! Each trader belongs to one of six behavioral types. The type fixes a base
//! parameter template and selects the decision rule used every period.
//!
//! - **Momentum**: bets on trend continuation (amplifies trends)
//! - **Contrarian**: bets against the recent trend (dampens trends)
//! - **Fundamentalist**: reverts toward a long-run expected return
//! - **Noise**: trades at random, ignoring signals
//! - **Herding**: follows market sentiment
//! - **Sophisticated**: blends momentum and sentiment, penalised by volatility

use serde::{Deserialize, Serialize};

/// Behavioral type of a trading agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    Momentum,
    Contrarian,
    Fundamentalist,
    Noise,
    Herding,
    Sophisticated,
}

impl AgentType {
    /// All types, in the order used by the categorical type draw
    pub const ALL: [AgentType; 6] = [
        AgentType::Momentum,
        AgentType::Contrarian,
        AgentType::Fundamentalist,
        AgentType::Noise,
        AgentType::Herding,
        AgentType::Sophisticated,
    ];

    /// Probability of drawing this type when building a population
    pub fn probability(&self) -> f64 {
        match self {
            AgentType::Momentum => 0.20,
            AgentType::Contrarian => 0.15,
            AgentType::Fundamentalist => 0.20,
            AgentType::Noise => 0.15,
            AgentType::Herding => 0.15,
            AgentType::Sophisticated => 0.15,
        }
    }

    /// Base parameter template before heterogeneity is applied
    pub fn template(&self) -> BehaviorTemplate {
        match self {
            AgentType::Momentum => BehaviorTemplate {
                risk_tolerance: 0.6,
                trading_frequency: 0.7,
                memory_length: 20,
                trend_sensitivity: 0.8,
                noise_tolerance: 0.5,
                transaction_cost_rate: 0.001,
                leverage_limit: 2.0,
            },
            AgentType::Contrarian => BehaviorTemplate {
                risk_tolerance: 0.5,
                trading_frequency: 0.5,
                memory_length: 30,
                trend_sensitivity: 0.7,
                noise_tolerance: 0.6,
                transaction_cost_rate: 0.001,
                leverage_limit: 1.5,
            },
            AgentType::Fundamentalist => BehaviorTemplate {
                risk_tolerance: 0.4,
                trading_frequency: 0.3,
                memory_length: 60,
                trend_sensitivity: 0.5,
                noise_tolerance: 0.8,
                transaction_cost_rate: 0.0008,
                leverage_limit: 1.0,
            },
            AgentType::Noise => BehaviorTemplate {
                risk_tolerance: 0.5,
                trading_frequency: 0.9,
                memory_length: 5,
                trend_sensitivity: 0.0,
                noise_tolerance: 0.1,
                transaction_cost_rate: 0.002,
                leverage_limit: 1.0,
            },
            AgentType::Herding => BehaviorTemplate {
                risk_tolerance: 0.6,
                trading_frequency: 0.8,
                memory_length: 10,
                trend_sensitivity: 0.6,
                noise_tolerance: 0.3,
                transaction_cost_rate: 0.0015,
                leverage_limit: 1.5,
            },
            AgentType::Sophisticated => BehaviorTemplate {
                risk_tolerance: 0.5,
                trading_frequency: 0.6,
                memory_length: 40,
                trend_sensitivity: 0.5,
                noise_tolerance: 0.9,
                transaction_cost_rate: 0.0005,
                leverage_limit: 3.0,
            },
        }
    }

    /// How much private information the type processes (0 = none, 1 = most)
    ///
    /// Drives the information-layer similarity.
    pub fn sophistication(&self) -> f64 {
        match self {
            AgentType::Sophisticated => 1.0,
            AgentType::Fundamentalist => 0.7,
            AgentType::Momentum | AgentType::Contrarian => 0.4,
            AgentType::Herding => 0.2,
            AgentType::Noise => 0.0,
        }
    }

    /// Position of the type in [`AgentType::ALL`]
    pub fn index(&self) -> usize {
        match self {
            AgentType::Momentum => 0,
            AgentType::Contrarian => 1,
            AgentType::Fundamentalist => 2,
            AgentType::Noise => 3,
            AgentType::Herding => 4,
            AgentType::Sophisticated => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AgentType::Momentum => "momentum",
            AgentType::Contrarian => "contrarian",
            AgentType::Fundamentalist => "fundamentalist",
            AgentType::Noise => "noise",
            AgentType::Herding => "herding",
            AgentType::Sophisticated => "sophisticated",
        }
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for AgentType {
    type Err = agora_core::AgoraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentType::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| agora_core::AgoraError::configuration(format!("unknown agent type: {}", s)))
    }
}

/// Base behavioral parameters of an agent type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehaviorTemplate {
    pub risk_tolerance: f64,
    pub trading_frequency: f64,
    pub memory_length: usize,
    pub trend_sensitivity: f64,
    pub noise_tolerance: f64,
    /// Cost per unit of traded notional
    pub transaction_cost_rate: f64,
    /// Maximum gross exposure as a multiple of wealth
    pub leverage_limit: f64,
}

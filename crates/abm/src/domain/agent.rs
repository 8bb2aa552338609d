//! Trading Agent
//!
//! Fixed-schema agent record. Behavioral parameters are clamped once at
//! construction and never change; wealth, positions and reputation are the
//! only fields the simulation mutates.

use super::behavior::{AgentType, BehaviorTemplate};
use serde::{Deserialize, Serialize};

/// Unique identifier for an agent (its index in the population)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub usize);

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "agent-{}", self.0)
    }
}

/// Range-validated behavioral parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehaviorParams {
    risk_tolerance: f64,
    trading_frequency: f64,
    trend_sensitivity: f64,
    noise_tolerance: f64,
    memory_length: usize,
}

impl BehaviorParams {
    pub const RISK_TOLERANCE_RANGE: (f64, f64) = (0.1, 1.0);
    pub const TRADING_FREQUENCY_RANGE: (f64, f64) = (0.1, 1.0);
    pub const TREND_SENSITIVITY_RANGE: (f64, f64) = (-1.0, 1.0);
    pub const NOISE_TOLERANCE_RANGE: (f64, f64) = (0.1, 1.0);
    pub const MIN_MEMORY_LENGTH: usize = 5;

    /// Build parameters, clamping every field into its valid range
    pub fn clamped(
        risk_tolerance: f64,
        trading_frequency: f64,
        trend_sensitivity: f64,
        noise_tolerance: f64,
        memory_length: usize,
    ) -> Self {
        Self {
            risk_tolerance: clamp_range(risk_tolerance, Self::RISK_TOLERANCE_RANGE),
            trading_frequency: clamp_range(trading_frequency, Self::TRADING_FREQUENCY_RANGE),
            trend_sensitivity: clamp_range(trend_sensitivity, Self::TREND_SENSITIVITY_RANGE),
            noise_tolerance: clamp_range(noise_tolerance, Self::NOISE_TOLERANCE_RANGE),
            memory_length: memory_length.max(Self::MIN_MEMORY_LENGTH),
        }
    }

    /// Apply one shared heterogeneity multiplier to every template parameter
    ///
    /// The same multiplier scales all five parameters, so a "bold" agent is
    /// bold across the board.
    pub fn from_template(template: &BehaviorTemplate, multiplier: f64) -> Self {
        Self::clamped(
            template.risk_tolerance * multiplier,
            template.trading_frequency * multiplier,
            template.trend_sensitivity * multiplier,
            template.noise_tolerance * multiplier,
            (template.memory_length as f64 * multiplier).round() as usize,
        )
    }

    pub fn risk_tolerance(&self) -> f64 {
        self.risk_tolerance
    }

    pub fn trading_frequency(&self) -> f64 {
        self.trading_frequency
    }

    pub fn trend_sensitivity(&self) -> f64 {
        self.trend_sensitivity
    }

    pub fn noise_tolerance(&self) -> f64 {
        self.noise_tolerance
    }

    pub fn memory_length(&self) -> usize {
        self.memory_length
    }

    /// Check every field is inside its declared range
    pub fn is_within_bounds(&self) -> bool {
        in_range(self.risk_tolerance, Self::RISK_TOLERANCE_RANGE)
            && in_range(self.trading_frequency, Self::TRADING_FREQUENCY_RANGE)
            && in_range(self.trend_sensitivity, Self::TREND_SENSITIVITY_RANGE)
            && in_range(self.noise_tolerance, Self::NOISE_TOLERANCE_RANGE)
            && self.memory_length >= Self::MIN_MEMORY_LENGTH
    }
}

fn clamp_range(value: f64, (lo, hi): (f64, f64)) -> f64 {
    if value.is_nan() { lo } else { value.clamp(lo, hi) }
}

fn in_range(value: f64, (lo, hi): (f64, f64)) -> bool {
    value >= lo && value <= hi
}

/// A trading agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    agent_type: AgentType,
    params: BehaviorParams,
    transaction_cost_rate: f64,
    leverage_limit: f64,
    social_influence: f64,
    reputation: f64,
    initial_wealth: f64,
    current_wealth: f64,
    /// Signed holdings per asset (units)
    position: Vec<f64>,
}

impl Agent {
    pub const INITIAL_REPUTATION: f64 = 0.5;

    /// Create an agent with flat positions in `n_assets` assets
    pub fn new(
        id: AgentId,
        agent_type: AgentType,
        params: BehaviorParams,
        wealth: f64,
        n_assets: usize,
        social_influence: f64,
    ) -> Self {
        let template = agent_type.template();
        Self {
            id,
            agent_type,
            params,
            transaction_cost_rate: template.transaction_cost_rate.max(0.0),
            leverage_limit: template.leverage_limit.max(1.0),
            social_influence: social_influence.clamp(0.0, 1.0),
            reputation: Self::INITIAL_REPUTATION,
            initial_wealth: wealth,
            current_wealth: wealth,
            position: vec![0.0; n_assets],
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn agent_type(&self) -> AgentType {
        self.agent_type
    }

    pub fn params(&self) -> &BehaviorParams {
        &self.params
    }

    pub fn transaction_cost_rate(&self) -> f64 {
        self.transaction_cost_rate
    }

    pub fn leverage_limit(&self) -> f64 {
        self.leverage_limit
    }

    pub fn social_influence(&self) -> f64 {
        self.social_influence
    }

    pub fn reputation(&self) -> f64 {
        self.reputation
    }

    pub fn initial_wealth(&self) -> f64 {
        self.initial_wealth
    }

    pub fn current_wealth(&self) -> f64 {
        self.current_wealth
    }

    pub fn position(&self) -> &[f64] {
        &self.position
    }

    pub fn n_assets(&self) -> usize {
        self.position.len()
    }

    /// Return on initial wealth
    pub fn total_return(&self) -> f64 {
        if self.initial_wealth == 0.0 {
            return 0.0;
        }
        (self.current_wealth - self.initial_wealth) / self.initial_wealth
    }

    /// Settle one period: trade at `old_prices` into `new_position`, then mark at `new_prices`
    ///
    /// Returns the transaction costs paid.
    pub(crate) fn settle(
        &mut self,
        new_position: &[f64],
        old_prices: &[f64],
        new_prices: &[f64],
    ) -> f64 {
        let mut pnl = 0.0;
        let mut costs = 0.0;

        for a in 0..self.position.len() {
            let change = new_position[a] - self.position[a];
            costs += change.abs() * self.transaction_cost_rate * old_prices[a];
            pnl += new_position[a] * (new_prices[a] - old_prices[a]);
        }

        let previous = self.current_wealth;
        self.position.copy_from_slice(new_position);
        self.current_wealth = previous + pnl - costs;

        let won = if self.current_wealth > previous { 1.0 } else { 0.0 };
        self.reputation = (0.9 * self.reputation + 0.1 * won).clamp(0.0, 1.0);

        costs
    }
}

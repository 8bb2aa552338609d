//! Pairwise agent similarity scores, all in [0, 1]

use crate::domain::Agent;

/// 1 - |a - b| / max(a, b) for non-negative magnitudes
fn ratio_similarity(a: f64, b: f64) -> f64 {
    let a = a.max(0.0);
    let b = b.max(0.0);
    let hi = a.max(b);
    if hi <= 0.0 {
        return 1.0;
    }
    (1.0 - (a - b).abs() / hi).clamp(0.0, 1.0)
}

/// 1 - |a - b| for values already on a unit scale
fn unit_similarity(a: f64, b: f64) -> f64 {
    (1.0 - (a - b).abs()).clamp(0.0, 1.0)
}

/// Same type, comparable wealth, comparable risk appetite
pub(super) fn trading(a: &Agent, b: &Agent) -> f64 {
    let same_type = if a.agent_type() == b.agent_type() { 1.0 } else { 0.0 };
    0.5 * same_type
        + 0.25 * ratio_similarity(a.initial_wealth(), b.initial_wealth())
        + 0.25 * unit_similarity(a.params().risk_tolerance(), b.params().risk_tolerance())
}

/// Comparable sophistication and memory horizon
pub(super) fn information(a: &Agent, b: &Agent) -> f64 {
    0.5 * unit_similarity(
        a.agent_type().sophistication(),
        b.agent_type().sophistication(),
    ) + 0.5
        * ratio_similarity(
            a.params().memory_length() as f64,
            b.params().memory_length() as f64,
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AgentId, AgentType, BehaviorParams};
    use approx::assert_relative_eq;

    fn agent(agent_type: AgentType, wealth: f64) -> Agent {
        let params = BehaviorParams::from_template(&agent_type.template(), 1.0);
        Agent::new(AgentId(0), agent_type, params, wealth, 1, 0.5)
    }

    #[test]
    fn test_identical_agents_fully_similar() {
        let a = agent(AgentType::Momentum, 10_000.0);
        let b = agent(AgentType::Momentum, 10_000.0);
        assert_relative_eq!(trading(&a, &b), 1.0);
        assert_relative_eq!(information(&a, &b), 1.0);
    }

    #[test]
    fn test_trading_similarity_components() {
        // Different type, half the wealth, risk 0.6 vs 0.4
        let a = agent(AgentType::Momentum, 10_000.0);
        let b = agent(AgentType::Fundamentalist, 5_000.0);
        assert_relative_eq!(trading(&a, &b), 0.25 * 0.5 + 0.25 * 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_information_similarity_noise_vs_sophisticated() {
        // Sophistication 0.0 vs 1.0, memory 5 vs 40
        let a = agent(AgentType::Noise, 1.0);
        let b = agent(AgentType::Sophisticated, 1.0);
        assert_relative_eq!(information(&a, &b), 0.5 * (5.0 / 40.0), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_wealth_pair() {
        assert_relative_eq!(ratio_similarity(0.0, 0.0), 1.0);
        assert_relative_eq!(ratio_similarity(0.0, 10.0), 0.0);
    }
}

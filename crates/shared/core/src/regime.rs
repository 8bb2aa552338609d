//! Market Regime Types
//!
//! Discrete volatility states governing return scaling and sentiment dynamics.

use serde::{Deserialize, Serialize};

/// Market regime classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Regime {
    /// Calm market, damped returns
    Low,
    /// Normal market conditions
    Normal,
    /// Extreme conditions, amplified returns
    Crisis,
}

impl Regime {
    /// Multiplier applied to external base returns in this regime
    pub fn return_multiplier(&self) -> f64 {
        match self {
            Regime::Low => 0.8,
            Regime::Normal => 1.0,
            Regime::Crisis => 2.5,
        }
    }

    /// Numeric label (1 = low, 2 = normal, 3 = crisis)
    pub fn code(&self) -> u8 {
        match self {
            Regime::Low => 1,
            Regime::Normal => 2,
            Regime::Crisis => 3,
        }
    }

    pub fn is_crisis(&self) -> bool {
        matches!(self, Regime::Crisis)
    }
}

impl Default for Regime {
    fn default() -> Self {
        Regime::Normal
    }
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Regime::Low => "low",
            Regime::Normal => "normal",
            Regime::Crisis => "crisis",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipliers_ordered_by_severity() {
        assert!(Regime::Low.return_multiplier() < Regime::Normal.return_multiplier());
        assert!(Regime::Normal.return_multiplier() < Regime::Crisis.return_multiplier());
    }

    #[test]
    fn test_codes() {
        assert_eq!(Regime::Low.code(), 1);
        assert_eq!(Regime::Normal.code(), 2);
        assert_eq!(Regime::Crisis.code(), 3);
        assert_eq!(Regime::default(), Regime::Normal);
    }
}

//! Regime and sentiment dynamics

use super::config::RegimeConfig;
use agora_core::Regime;
use log::debug;
use rand::Rng;

/// Markov regime process carrying market sentiment
#[derive(Debug, Clone)]
pub(crate) struct RegimeProcess {
    config: RegimeConfig,
    regime: Regime,
    sentiment: f64,
}

impl RegimeProcess {
    pub(crate) fn new(config: RegimeConfig, initial_sentiment: f64) -> Self {
        let (lo, hi) = config.sentiment_bounds;
        Self {
            config,
            regime: Regime::Normal,
            sentiment: initial_sentiment.clamp(lo, hi),
        }
    }

    pub(crate) fn sentiment(&self) -> f64 {
        self.sentiment
    }

    /// Advance one period
    ///
    /// Crisis only exits to normal; outside a crisis the crisis check comes
    /// first, then the low/normal switch.
    pub(crate) fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Regime {
        let before = self.regime;
        let u = rng.r#gen::<f64>();

        match self.regime {
            Regime::Crisis => {
                if u < self.config.recovery_probability {
                    self.regime = Regime::Normal;
                }
            }
            Regime::Low | Regime::Normal => {
                if u < self.config.crisis_probability {
                    self.regime = Regime::Crisis;
                    self.sentiment -= self.config.crisis_sentiment_drop;
                } else if rng.r#gen::<f64>() < self.config.switch_probability {
                    self.regime = match self.regime {
                        Regime::Low => Regime::Normal,
                        _ => Regime::Low,
                    };
                    let shock = self.config.switch_sentiment_shock;
                    if shock > 0.0 {
                        self.sentiment += rng.gen_range(-shock..=shock);
                    }
                }
            }
        }

        let (lo, hi) = self.config.sentiment_bounds;
        self.sentiment = self.sentiment.clamp(lo, hi);

        if self.regime != before {
            debug!(
                "Regime {} -> {} (sentiment {:.3})",
                before, self.regime, self.sentiment
            );
        }
        self.regime
    }
}

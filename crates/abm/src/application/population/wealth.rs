//! Initial Wealth Distributions

use agora_core::{AgoraError, Result};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Shape of the initial wealth distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WealthDistribution {
    /// Everyone starts with the base wealth
    Equal,
    /// N(base, 0.3 * base), floored at 10% of base
    Normal,
    /// Pareto with shape 1.5 and mean equal to base, floored at 100
    Pareto,
}

impl WealthDistribution {
    pub const PARETO_SHAPE: f64 = 1.5;
    pub const PARETO_FLOOR: f64 = 100.0;
    pub const NORMAL_REL_STD: f64 = 0.3;
    pub const NORMAL_REL_FLOOR: f64 = 0.1;

    /// Build the sampler for a given base wealth
    pub(crate) fn sampler(&self, base_wealth: f64) -> Result<WealthSampler> {
        if !(base_wealth.is_finite() && base_wealth > 0.0) {
            return Err(AgoraError::configuration(format!(
                "base wealth must be positive, got {}",
                base_wealth
            )));
        }

        Ok(match self {
            WealthDistribution::Equal => WealthSampler::Equal(base_wealth),
            WealthDistribution::Normal => {
                let normal = Normal::new(base_wealth, Self::NORMAL_REL_STD * base_wealth)
                    .map_err(|e| AgoraError::configuration(format!("normal wealth: {}", e)))?;
                WealthSampler::Normal {
                    normal,
                    floor: Self::NORMAL_REL_FLOOR * base_wealth,
                }
            }
            WealthDistribution::Pareto => {
                let shape = Self::PARETO_SHAPE;
                WealthSampler::Pareto {
                    scale: base_wealth * (shape - 1.0) / shape,
                    shape,
                    floor: Self::PARETO_FLOOR,
                }
            }
        })
    }
}

impl std::str::FromStr for WealthDistribution {
    type Err = AgoraError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "equal" => Ok(WealthDistribution::Equal),
            "normal" => Ok(WealthDistribution::Normal),
            "pareto" => Ok(WealthDistribution::Pareto),
            other => Err(AgoraError::configuration(format!(
                "unknown wealth distribution: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for WealthDistribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WealthDistribution::Equal => "equal",
            WealthDistribution::Normal => "normal",
            WealthDistribution::Pareto => "pareto",
        };
        write!(f, "{}", name)
    }
}

/// Ready-to-draw wealth sampler
#[derive(Debug, Clone)]
pub(crate) enum WealthSampler {
    Equal(f64),
    Normal { normal: Normal<f64>, floor: f64 },
    Pareto { scale: f64, shape: f64, floor: f64 },
}

impl WealthSampler {
    pub(crate) fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            WealthSampler::Equal(w) => *w,
            WealthSampler::Normal { normal, floor } => normal.sample(rng).max(*floor),
            WealthSampler::Pareto {
                scale,
                shape,
                floor,
            } => {
                // Inverse CDF: x = scale / u^(1/shape), u in (0, 1]
                let u = 1.0 - rng.r#gen::<f64>();
                (scale / u.powf(1.0 / shape)).max(*floor)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::stats;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn draw(dist: WealthDistribution, n: usize) -> Vec<f64> {
        let sampler = dist.sampler(10_000.0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        (0..n).map(|_| sampler.sample(&mut rng)).collect()
    }

    #[test]
    fn test_equal_is_constant() {
        let wealth = draw(WealthDistribution::Equal, 50);
        assert!(wealth.iter().all(|w| *w == 10_000.0));
    }

    #[test]
    fn test_normal_respects_floor() {
        let wealth = draw(WealthDistribution::Normal, 5_000);
        assert!(wealth.iter().all(|w| *w >= 1_000.0));
        let mean = stats::mean(&wealth).unwrap();
        assert!((mean - 10_000.0).abs() < 300.0, "mean = {}", mean);
    }

    #[test]
    fn test_pareto_is_right_skewed() {
        let wealth = draw(WealthDistribution::Pareto, 5_000);
        assert!(wealth.iter().all(|w| *w >= WealthDistribution::PARETO_FLOOR));

        let mean = stats::mean(&wealth).unwrap();
        let median = stats::median(&wealth).unwrap();
        assert!(mean > median, "mean {} should exceed median {}", mean, median);
        assert!(stats::gini(&wealth) > 0.2);
    }

    #[test]
    fn test_parse_unknown_distribution() {
        let err = "lognormal".parse::<WealthDistribution>().unwrap_err();
        assert!(matches!(err, AgoraError::Configuration(_)));
        assert_eq!(
            "Pareto".parse::<WealthDistribution>().unwrap(),
            WealthDistribution::Pareto
        );
    }

    #[test]
    fn test_rejects_non_positive_base() {
        assert!(WealthDistribution::Equal.sampler(0.0).is_err());
        assert!(WealthDistribution::Normal.sampler(f64::NAN).is_err());
    }
}

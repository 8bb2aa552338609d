//! Contagion Detection
//!
//! Four independent heuristics over a spillover series, fused by vote.

mod correlation;
mod detector;
mod protocol;
mod regime;
mod threshold;
mod volatility;

pub use correlation::{CorrelationDetector, average_pairwise};
pub use detector::{ContagionConfig, ContagionDetector, ContagionReport, MethodFlags};
pub use protocol::{DetectionHeuristic, DetectionInput};
pub use regime::{RegimeDetector, RegimeMethod, changepoints};
pub use threshold::{ThresholdDetector, ThresholdEpisode};
pub use volatility::VolatilityDetector;

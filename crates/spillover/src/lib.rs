//! Spillover and contagion analysis
//!
//! Rolling correlation networks over asset returns give a per-window
//! spillover index; four detection heuristics vote on which periods belong
//! to a contagion episode.

pub mod application;
pub mod domain;

// Re-export key types at crate root
pub use application::detection::{
    ContagionConfig, ContagionDetector, ContagionReport, DetectionHeuristic, DetectionInput,
    MethodFlags, RegimeMethod,
};
pub use application::{SpilloverConfig, SpilloverEngine, SpilloverResult, SpilloverSummary};
pub use domain::{ContagionEpisode, DetectionMethod, NetworkMetrics, Severity, SpilloverWindow};

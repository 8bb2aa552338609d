//! Domain layer: Spillover windows, network topology and contagion episodes

mod episode;
pub mod topology;
mod window;

pub use episode::{ContagionEpisode, DetectionMethod, Severity, flagged_runs};
pub use topology::NetworkMetrics;
pub use window::SpilloverWindow;

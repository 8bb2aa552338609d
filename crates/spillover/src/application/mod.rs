pub mod detection;
mod engine;

pub use engine::{SpilloverConfig, SpilloverEngine, SpilloverResult, SpilloverSummary};

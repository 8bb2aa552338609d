//! Agora Runner - End-to-end contagion pipeline
//!
//! Orchestrates the full workflow from a single JSON configuration:
//!
//! - **Config**: Pipeline configuration loading and validation
//! - **Pipeline**: Population, networks, simulation, spillover and detection
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────┐      ┌──────────────────┐
//!   │ Population       │─────▶│ Multilayer       │
//!   │ Factory          │      │ Network Builder  │
//!   └────────┬─────────┘      └────────┬─────────┘
//!            │ agents                  │ information layer
//!            ▼                         ▼
//!   ┌─────────────────────────────────────────────┐
//!   │              Market Simulator               │◀── external returns
//!   └──────────────────────┬──────────────────────┘
//!                          │ simulated prices
//!                          ▼
//!               ┌───────────────────────┐
//!               │   Spillover Engine    │
//!               └───────────┬───────────┘
//!                           │ index, matrices, market returns
//!                           ▼
//!               ┌───────────────────────┐
//!               │  Contagion Detector   │
//!               └───────────────────────┘
//! ```

pub mod config;
pub mod pipeline;

// Re-export main types
pub use config::{
    PipelineConfig, PipelineError, load_config, load_config_from_str, load_default_config,
};
pub use pipeline::{ContagionPipeline, NetworkReport, PipelineReport};

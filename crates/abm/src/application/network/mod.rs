//! Network Construction
//!
//! Similarity-driven random graphs (trading, information) and a small-world
//! social graph over the agents of one population.

mod builder;
mod similarity;

pub use builder::{MultilayerNetworkBuilder, NetworkConfig};

//! Encoder application layer: training tiers and the degrade chain

mod chain;
mod feature_only;
mod full_graph;
mod sampled;
mod strategy;

pub use chain::DegradeChain;
pub use feature_only::FeatureOnlyStrategy;
pub use full_graph::FullGraphStrategy;
pub use sampled::SampledSubgraphStrategy;
pub use strategy::{estimate_step_mb, EncoderStrategy};

pub use crate::features::encoder::domain::{TrainError, TrainResult};

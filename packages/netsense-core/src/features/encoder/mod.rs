//! Graph Encoder Trainer
//!
//! Self-supervised node embeddings: Deep Graph Infomax over GIN layers,
//! trained with candle and degraded tier by tier when resources run out.
//!
//! ```text
//! (NetlistGraph, FeatureTable) ──▶ EncoderInput ──▶ DegradeChain ──▶ Embeddings
//!                                                    ├─ FullGraphStrategy
//!                                                    ├─ SampledSubgraphStrategy
//!                                                    └─ FeatureOnlyStrategy
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{
    DegradeChain, EncoderStrategy, FeatureOnlyStrategy, FullGraphStrategy,
    SampledSubgraphStrategy, TrainError, TrainResult,
};
pub use domain::{Embeddings, EncoderInput};

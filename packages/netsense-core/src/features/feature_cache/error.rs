//! Error types for the feature cache
//!
//! None of these escape [`FeatureCache::load`](super::FeatureCache::load) or
//! [`FeatureCache::store`](super::FeatureCache::store); they are logged and
//! turned into a miss.

use thiserror::Error;

use crate::features::netlist_graph::GraphError;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache corrupted: {0}")]
    Corrupted(String),

    #[error("Cache version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid cached graph: {0}")]
    Graph(#[from] GraphError),

    #[error("Cache not found")]
    NotFound,
}

pub type CacheResult<T> = Result<T, CacheError>;

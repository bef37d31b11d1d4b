//! Shared utilities used across features

pub mod normalize;

pub use normalize::{l2_normalize, minmax_norm, unit_interval};

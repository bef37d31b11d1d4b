//! Structural feature domain model

pub mod feature_set;

pub use feature_set::{
    FeatureTable, RawMetrics, StructuralFeature, FEATURE_COUNT, INVERSE_DISTANCE_EPSILON,
};

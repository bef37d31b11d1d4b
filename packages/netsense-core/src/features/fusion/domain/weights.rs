//! Fusion weights

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allowed drift of the weight sum from 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error, PartialEq)]
pub enum WeightsError {
    #[error("fusion weights must sum to 1.0, got {0}")]
    Sum(f64),

    #[error("fusion weight '{field}' must be a finite non-negative number, got {value}")]
    Invalid { field: &'static str, value: f64 },
}

/// Linear combination applied to the five fused signals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FusionWeights {
    pub centrality: f64,
    pub proximity: f64,
    pub reconvergence: f64,
    pub sequential_adjacency: f64,
    pub embedding_similarity: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            centrality: 0.25,
            proximity: 0.25,
            reconvergence: 0.20,
            sequential_adjacency: 0.15,
            embedding_similarity: 0.15,
        }
    }
}

impl FusionWeights {
    fn fields(&self) -> [(&'static str, f64); 5] {
        [
            ("centrality", self.centrality),
            ("proximity", self.proximity),
            ("reconvergence", self.reconvergence),
            ("sequential_adjacency", self.sequential_adjacency),
            ("embedding_similarity", self.embedding_similarity),
        ]
    }

    pub fn sum(&self) -> f64 {
        self.fields().iter().map(|(_, w)| w).sum()
    }

    pub fn validate(&self) -> Result<(), WeightsError> {
        for (field, value) in self.fields() {
            if !value.is_finite() || value < 0.0 {
                return Err(WeightsError::Invalid { field, value });
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightsError::Sum(sum));
        }
        Ok(())
    }
}

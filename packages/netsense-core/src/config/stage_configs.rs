//! Per-stage configuration blocks
//!
//! Each block carries its own defaults and a `validate()` that reports the
//! first out-of-range field.

use super::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Structural extraction
// ============================================================================

/// Structural feature extraction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Seed for betweenness pivot sampling
    pub seed: u64,

    /// PageRank damping factor (0.0..=1.0)
    pub pagerank_damping: f64,

    /// PageRank iteration cap
    pub pagerank_max_iterations: usize,

    /// PageRank L1 convergence tolerance
    pub pagerank_tolerance: f64,

    /// Eigenvector centrality iteration cap
    pub eigen_max_iterations: usize,

    /// Eigenvector centrality convergence tolerance
    pub eigen_tolerance: f64,

    /// Graphs at or above this node count use process workers
    pub small_scale_threshold: usize,

    /// Worker count (0 = adaptive)
    pub workers: usize,

    /// Available memory override in MB (None = probe the host)
    pub available_memory_mb: Option<u64>,

    /// Total memory override in MB (None = probe the host)
    pub total_memory_mb: Option<u64>,

    /// Program spawned for process workers (None = threads only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_program: Option<PathBuf>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            pagerank_damping: 0.85,
            pagerank_max_iterations: 100,
            pagerank_tolerance: 1e-9,
            eigen_max_iterations: 200,
            eigen_tolerance: 1e-6,
            small_scale_threshold: 50_000,
            workers: 0,
            available_memory_mb: None,
            total_memory_mb: None,
            worker_program: None,
        }
    }
}

impl ExtractionConfig {
    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=1.0).contains(&self.pagerank_damping) {
            return Err(ConfigError::range_with_hint(
                "pagerank_damping",
                self.pagerank_damping,
                0.0,
                1.0,
                "Damping is a probability",
            ));
        }

        if self.pagerank_max_iterations == 0 || self.eigen_max_iterations == 0 {
            return Err(ConfigError::Validation(
                "iteration caps must be at least 1".to_string(),
            ));
        }

        if self.workers > 1024 {
            return Err(ConfigError::range_with_hint(
                "workers",
                self.workers,
                0,
                1024,
                "Number of workers must be reasonable (0=auto)",
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Feature cache
// ============================================================================

/// Feature cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Read existing entries (stores always happen)
    pub enabled: bool,

    /// Directory holding cache records
    pub cache_dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_dir: PathBuf::from("./feature_cache"),
        }
    }
}

// ============================================================================
// Encoder training
// ============================================================================

/// Graph encoder training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Embedding width H (1..=4096)
    pub hidden: usize,

    /// Number of message-passing layers (1..=16)
    pub layers: usize,

    /// Dropout probability (0.0..0.95)
    pub dropout: f64,

    /// Full-batch epochs
    pub epochs: usize,

    /// Adam learning rate
    pub learning_rate: f64,

    /// Seed applied at the start of every training run
    pub seed: u64,

    /// Graphs at or above this node count start at the sampled tier
    pub sample_threshold: usize,

    /// Upper bound on nodes per sampled training step
    pub sample_batch_size: usize,

    /// Upper bound on nodes per inference chunk in the sampled tier
    pub inference_chunk: usize,

    /// Epoch cap for the feature-only tier
    pub feature_only_max_epochs: usize,

    /// Use CUDA when compiled in and present
    pub prefer_accelerator: bool,

    /// Optional memory budget in MB; tiers whose estimate exceeds it are skipped
    pub memory_budget_mb: Option<u64>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            hidden: 128,
            layers: 3,
            dropout: 0.2,
            epochs: 150,
            learning_rate: 1e-3,
            seed: 42,
            sample_threshold: 500_000,
            sample_batch_size: 50_000,
            inference_chunk: 100_000,
            feature_only_max_epochs: 50,
            prefer_accelerator: true,
            memory_budget_mb: None,
        }
    }
}

impl EncoderConfig {
    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.hidden < 1 || self.hidden > 4096 {
            return Err(ConfigError::range_with_hint(
                "hidden",
                self.hidden,
                1,
                4096,
                "Embedding width must be positive",
            ));
        }

        if self.layers < 1 || self.layers > 16 {
            return Err(ConfigError::range_with_hint(
                "layers",
                self.layers,
                1,
                16,
                "At least one message-passing layer is required",
            ));
        }

        if !(0.0..0.95).contains(&self.dropout) {
            return Err(ConfigError::range_with_hint(
                "dropout",
                self.dropout,
                0.0,
                0.95,
                "Dropout is a probability below 0.95",
            ));
        }

        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(ConfigError::range_with_hint(
                "learning_rate",
                self.learning_rate,
                "0 (exclusive)",
                1.0,
                "Learning rate must be positive",
            ));
        }

        if self.sample_batch_size == 0 || self.inference_chunk == 0 {
            return Err(ConfigError::Validation(
                "sample_batch_size and inference_chunk must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Compact configuration for tests and tiny graphs
    pub fn tiny() -> Self {
        Self {
            hidden: 16,
            layers: 2,
            epochs: 5,
            prefer_accelerator: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ExtractionConfig::default().validate().is_ok());
        assert!(EncoderConfig::default().validate().is_ok());
        assert!(EncoderConfig::tiny().validate().is_ok());
    }

    #[test]
    fn test_encoder_rejects_zero_layers() {
        let cfg = EncoderConfig {
            layers: 0,
            ..EncoderConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Range { .. })));
    }

    #[test]
    fn test_extraction_rejects_bad_damping() {
        let cfg = ExtractionConfig {
            pagerank_damping: 1.5,
            ..ExtractionConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}

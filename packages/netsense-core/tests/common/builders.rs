//! Test data builders

use netsense_core::config::{CacheConfig, EngineConfig};
use std::path::Path;

/// Builder for small, fast engine configurations
#[derive(Debug, Clone)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Tiny encoder, two thread workers, CPU only
    pub fn fast(cache_dir: &Path) -> Self {
        let mut config = EngineConfig {
            cache: CacheConfig {
                enabled: true,
                cache_dir: cache_dir.to_path_buf(),
            },
            ..Default::default()
        };
        config.encoder.hidden = 8;
        config.encoder.layers = 2;
        config.encoder.epochs = 3;
        config.encoder.prefer_accelerator = false;
        config.extraction.workers = 2;
        Self { config }
    }

    pub fn without_cache_reads(mut self) -> Self {
        self.config.cache.enabled = false;
        self
    }

    pub fn with_sample_threshold(mut self, threshold: usize) -> Self {
        self.config.encoder.sample_threshold = threshold;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.encoder.seed = seed;
        self.config.extraction.seed = seed;
        self
    }

    pub fn build(self) -> EngineConfig {
        self.config
    }
}

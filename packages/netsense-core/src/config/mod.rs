//! Engine configuration
//!
//! ```text
//! EngineConfig
//!   ├── extraction : ExtractionConfig  (PageRank/eigen caps, worker pool)
//!   ├── cache      : CacheConfig       (enabled, cache_dir)
//!   ├── encoder    : EncoderConfig     (GIN/DGI hyper-parameters, tiers)
//!   └── fusion     : FusionWeights     (five weights, sum = 1.0)
//! ```
//!
//! YAML files carry `version: 1` at the top; every section is optional.

pub mod engine_config;
pub mod error;
pub mod io;
pub mod stage_configs;

pub use engine_config::EngineConfig;
pub use error::{ConfigError, ConfigResult};
pub use stage_configs::{CacheConfig, EncoderConfig, ExtractionConfig};

//! Configuration I/O (YAML schema)
//!
//! Defines the on-disk schema. Loading and export live on `EngineConfig`.

use super::stage_configs::{CacheConfig, EncoderConfig, ExtractionConfig};
use crate::features::fusion::domain::FusionWeights;
use serde::{Deserialize, Serialize};

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1)
    pub version: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction: Option<ExtractionConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoder: Option<EncoderConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fusion: Option<FusionWeights>,
}

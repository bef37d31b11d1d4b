//! Engine configuration root

use super::error::{ConfigError, ConfigResult};
use super::io::ConfigFileV1;
use super::stage_configs::{CacheConfig, EncoderConfig, ExtractionConfig};
use crate::features::fusion::domain::FusionWeights;
use std::path::Path;
use tracing::debug;

/// Supported on-disk schema versions
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Full configuration of the scoring engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    pub extraction: ExtractionConfig,
    pub cache: CacheConfig,
    pub encoder: EncoderConfig,
    pub fusion: FusionWeights,
}

impl EngineConfig {
    /// Validate every section
    pub fn validate(&self) -> ConfigResult<()> {
        self.extraction.validate()?;
        self.encoder.validate()?;
        self.fusion
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        Ok(())
    }

    /// Load from YAML file (v1 schema). Missing sections keep their defaults.
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&content)?;
        debug!(path = %path.as_ref().display(), "loaded engine configuration");
        Ok(config)
    }

    /// Parse a YAML document (v1 schema)
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        if !SUPPORTED_VERSIONS.contains(&file.version) {
            return Err(ConfigError::UnsupportedVersion {
                found: file.version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let config = Self {
            extraction: file.extraction.unwrap_or_default(),
            cache: file.cache.unwrap_or_default(),
            encoder: file.encoder.unwrap_or_default(),
            fusion: file.fusion.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Export to YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: 1,
            extraction: Some(self.extraction.clone()),
            cache: Some(self.cache.clone()),
            encoder: Some(self.encoder.clone()),
            fusion: Some(self.fusion),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}

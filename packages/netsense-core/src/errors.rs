//! Error types for netsense-core
//!
//! Provides unified error handling across the crate. Feature modules keep
//! their own narrow error enums and convert into [`NetsenseError`] at the
//! pipeline boundary.

use thiserror::Error;

use crate::config::error::ConfigError;
use crate::features::encoder::application::TrainError;
use crate::features::fusion::FusionError;
use crate::features::netlist_graph::infrastructure::ParseError;

/// Main error type for netsense operations
#[derive(Debug, Error)]
pub enum NetsenseError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Netlist could not be parsed (fatal for that file only)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Structural feature extraction failed
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Every training tier failed, or a non-resource failure escaped the chain
    #[error("Training error: {0}")]
    Training(String),

    /// Pipeline error
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl NetsenseError {
    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        NetsenseError::Parse(msg.into())
    }

    /// Create an extraction error
    pub fn extraction(msg: impl Into<String>) -> Self {
        NetsenseError::Extraction(msg.into())
    }

    /// Create a pipeline error
    pub fn pipeline(msg: impl Into<String>) -> Self {
        NetsenseError::Pipeline(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        NetsenseError::Config(msg.into())
    }
}

impl From<ParseError> for NetsenseError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Io(e) => NetsenseError::Io(e),
            other => NetsenseError::Parse(other.to_string()),
        }
    }
}

impl From<TrainError> for NetsenseError {
    fn from(err: TrainError) -> Self {
        NetsenseError::Training(err.to_string())
    }
}

impl From<FusionError> for NetsenseError {
    fn from(err: FusionError) -> Self {
        NetsenseError::Pipeline(err.to_string())
    }
}

impl From<ConfigError> for NetsenseError {
    fn from(err: ConfigError) -> Self {
        NetsenseError::Config(err.to_string())
    }
}

/// Result type alias for netsense operations
pub type Result<T> = std::result::Result<T, NetsenseError>;

//! Training errors
//!
//! Only [`TrainError::ResourceExhausted`] lets the degrade chain move to the
//! next tier. Backend errors are classified by message.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrainError {
    #[error("resources exhausted: {0}")]
    ResourceExhausted(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("training failed: {0}")]
    Other(String),
}

pub type TrainResult<T> = Result<T, TrainError>;

const EXHAUSTION_MARKERS: &[&str] = &["out of memory", "memory", "alloc", "cuda"];

impl TrainError {
    /// Classify a backend message
    pub fn from_message(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        let lower = msg.to_lowercase();
        if EXHAUSTION_MARKERS.iter().any(|m| lower.contains(m)) {
            TrainError::ResourceExhausted(msg)
        } else {
            TrainError::Other(msg)
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, TrainError::ResourceExhausted(_))
    }
}

impl From<candle_core::Error> for TrainError {
    fn from(e: candle_core::Error) -> Self {
        TrainError::from_message(e.to_string())
    }
}

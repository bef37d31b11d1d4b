//! Encoder domain: input matrix, embeddings, errors

pub mod embeddings;
pub mod error;
pub mod input;

pub use embeddings::Embeddings;
pub use error::{TrainError, TrainResult};
pub use input::EncoderInput;

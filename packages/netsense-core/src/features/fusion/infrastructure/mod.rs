//! Fusion infrastructure: scorer and ranking writer

pub mod rank_writer;
pub mod scorer;

pub use rank_writer::{ranking_file_name, RankWriter};
pub use scorer::{FusionError, ScoreFusion};

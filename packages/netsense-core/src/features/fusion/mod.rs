//! Score Fusion
//!
//! Combines normalized structural signals with embedding similarity to the
//! output set, filters to rankable signals, and writes the ranking file.

pub mod domain;
pub mod infrastructure;

pub use domain::{FusionWeights, RankedSignal, Ranking, SignalFilter};
pub use infrastructure::{ranking_file_name, FusionError, RankWriter, ScoreFusion};

//! Fusion domain: weights, eligibility, ranking

pub mod eligibility;
pub mod ranking;
pub mod weights;

pub use eligibility::SignalFilter;
pub use ranking::{RankedSignal, Ranking};
pub use weights::{FusionWeights, WeightsError, WEIGHT_SUM_TOLERANCE};

//! Ranked output

use crate::features::netlist_graph::NodeId;

/// One ranked signal
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSignal {
    pub node: NodeId,
    pub name: String,
    pub score: f64,
}

/// Signals in descending score order, ties in node-id order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    signals: Vec<RankedSignal>,
}

impl Ranking {
    /// Sort candidates (given in node-id order) into a ranking
    pub fn from_candidates(mut signals: Vec<RankedSignal>) -> Self {
        signals.sort_by(|a, b| b.score.total_cmp(&a.score));
        Self { signals }
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn signals(&self) -> &[RankedSignal] {
        &self.signals
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedSignal> {
        self.signals.iter()
    }

    pub fn top(&self, k: usize) -> &[RankedSignal] {
        &self.signals[..k.min(self.signals.len())]
    }
}

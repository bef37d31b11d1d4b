//! Encoder input matrix
//!
//! `x = [one_hot(kind) | features]`, shape `N × (T + 12)` where `T` is the
//! number of distinct kinds in sorted order.

use std::collections::BTreeSet;

use crate::features::netlist_graph::{NetlistGraph, NodeId};
use crate::features::structural::{FeatureTable, FEATURE_COUNT};

/// Dense node matrix plus edge index, ready for any tier
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderInput {
    n_nodes: usize,
    dim: usize,
    /// Row-major `n_nodes × dim`
    x: Vec<f32>,
    edges: Vec<(NodeId, NodeId)>,
    kind_vocab: Vec<String>,
}

impl EncoderInput {
    pub fn from_graph(graph: &NetlistGraph, features: &FeatureTable) -> Self {
        let kind_vocab: Vec<String> = graph
            .kinds()
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let n = graph.node_count();
        let t = kind_vocab.len();
        let dim = t + FEATURE_COUNT;

        let mut x = vec![0.0f32; n * dim];
        for v in graph.node_ids() {
            let row = &mut x[v as usize * dim..(v as usize + 1) * dim];
            if let Ok(slot) = kind_vocab.binary_search_by(|k| k.as_str().cmp(graph.kind(v))) {
                row[slot] = 1.0;
            }
            if (v as usize) < features.len() {
                for (dst, &src) in row[t..].iter_mut().zip(features.row(v)) {
                    *dst = src as f32;
                }
            }
        }

        Self {
            n_nodes: n,
            dim,
            x,
            edges: graph.edges().to_vec(),
            kind_vocab,
        }
    }

    /// Assemble from raw parts; `x.len()` must be `n_nodes * dim`
    pub fn from_parts(
        n_nodes: usize,
        dim: usize,
        x: Vec<f32>,
        edges: Vec<(NodeId, NodeId)>,
    ) -> Option<Self> {
        if x.len() != n_nodes * dim || edges.iter().any(|&(s, d)| s as usize >= n_nodes || d as usize >= n_nodes) {
            return None;
        }
        Some(Self {
            n_nodes,
            dim,
            x,
            edges,
            kind_vocab: Vec::new(),
        })
    }

    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn x(&self) -> &[f32] {
        &self.x
    }

    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    pub fn kind_vocab(&self) -> &[String] {
        &self.kind_vocab
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::netlist_graph::{GraphBuilder, NodeAttrs};

    #[test]
    fn test_one_hot_follows_sorted_kinds() {
        let mut b = GraphBuilder::new();
        let a = b.add_or_merge("a", NodeAttrs::kind("wire"));
        let u = b.add_or_merge("u1", NodeAttrs::kind("AND2"));
        b.add_edge(a, u);
        let g = b.finish().unwrap();
        let mut row = [0.0; FEATURE_COUNT];
        row[0] = 0.5;
        let table = FeatureTable::new(vec![row, [1.0; FEATURE_COUNT]]);

        let input = EncoderInput::from_graph(&g, &table);
        assert_eq!(input.kind_vocab(), &["AND2".to_string(), "wire".to_string()]);
        assert_eq!(input.dim(), 2 + FEATURE_COUNT);

        let dim = input.dim();
        // "a" is a wire: one-hot slot 1, first feature 0.5
        assert_eq!(&input.x()[..3], &[0.0, 1.0, 0.5]);
        // "u1" is AND2: slot 0
        assert_eq!(&input.x()[dim..dim + 2], &[1.0, 0.0]);
        assert_eq!(input.edges(), &[(0, 1)]);
    }

    #[test]
    fn test_from_parts_rejects_bad_shapes() {
        assert!(EncoderInput::from_parts(2, 3, vec![0.0; 5], vec![]).is_none());
        assert!(EncoderInput::from_parts(2, 1, vec![0.0; 2], vec![(0, 2)]).is_none());
        assert!(EncoderInput::from_parts(2, 1, vec![0.0; 2], vec![(0, 1)]).is_some());
    }
}

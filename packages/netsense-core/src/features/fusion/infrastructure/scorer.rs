//! Score fusion
//!
//! ```text
//! centrality   = minmax(mean(pagerank, betweenness, eigen))
//! proximity    = minmax(0.5·dist_min_inv + 0.5·dist_avg_inv)
//! reconv       = minmax(reconv)
//! seq_adjacent = near_ff
//! embed_sim    = 0.5·(cos(h_i, centroid(outputs)) + 1), or 0 without outputs
//!
//! score = w · [centrality, proximity, reconv, seq_adjacent, embed_sim]
//! ```

use ahash::AHashSet;
use thiserror::Error;

use crate::features::encoder::Embeddings;
use crate::features::fusion::domain::{FusionWeights, RankedSignal, Ranking, SignalFilter};
use crate::features::netlist_graph::NetlistGraph;
use crate::features::structural::{FeatureTable, StructuralFeature as F};
use crate::shared::{l2_normalize, minmax_norm, unit_interval};

#[derive(Debug, Error, PartialEq)]
pub enum FusionError {
    #[error("{what} has {found} rows, graph has {expected} nodes")]
    RowMismatch {
        what: &'static str,
        found: usize,
        expected: usize,
    },
}

/// Fuses structural and learned signals into one ranking
pub struct ScoreFusion {
    weights: FusionWeights,
    filter: SignalFilter,
}

impl ScoreFusion {
    pub fn new(weights: FusionWeights) -> Self {
        Self {
            weights,
            filter: SignalFilter::new(),
        }
    }

    /// Fused score of every node, indexed by node id
    pub fn scores(
        &self,
        graph: &NetlistGraph,
        features: &FeatureTable,
        embeddings: &Embeddings,
    ) -> Result<Vec<f64>, FusionError> {
        let n = graph.node_count();
        if features.len() != n {
            return Err(FusionError::RowMismatch {
                what: "feature table",
                found: features.len(),
                expected: n,
            });
        }
        if embeddings.n_nodes() != n {
            return Err(FusionError::RowMismatch {
                what: "embeddings",
                found: embeddings.n_nodes(),
                expected: n,
            });
        }

        let similarity = output_similarity(graph, embeddings);

        let centrality = minmax_norm(
            &features
                .rows()
                .iter()
                .map(|r| {
                    (r[F::PageRank.index()] + r[F::Betweenness.index()] + r[F::Eigenvector.index()])
                        / 3.0
                })
                .collect::<Vec<_>>(),
        );
        let proximity = minmax_norm(
            &features
                .rows()
                .iter()
                .map(|r| 0.5 * r[F::DistMinInv.index()] + 0.5 * r[F::DistAvgInv.index()])
                .collect::<Vec<_>>(),
        );
        let reconvergence = minmax_norm(&features.column(F::Reconvergence));
        let sequential = features.column(F::NearFlipFlop);

        let w = &self.weights;
        Ok((0..n)
            .map(|i| {
                w.centrality * centrality[i]
                    + w.proximity * proximity[i]
                    + w.reconvergence * reconvergence[i]
                    + w.sequential_adjacency * sequential[i]
                    + w.embedding_similarity * similarity[i]
            })
            .collect())
    }

    /// Eligible signals sorted by descending score
    pub fn rank(
        &self,
        graph: &NetlistGraph,
        features: &FeatureTable,
        embeddings: &Embeddings,
    ) -> Result<Ranking, FusionError> {
        let scores = self.scores(graph, features, embeddings)?;

        let mut seen = AHashSet::new();
        let candidates = graph
            .node_ids()
            .filter(|&v| self.filter.is_eligible(graph.name(v), graph.kind(v)))
            .filter(|&v| seen.insert(graph.name(v)))
            .map(|v| RankedSignal {
                node: v,
                name: graph.name(v).to_string(),
                score: scores[v as usize],
            })
            .collect();

        Ok(Ranking::from_candidates(candidates))
    }
}

/// Cosine similarity of each node to the output centroid, mapped to [0,1]
fn output_similarity(graph: &NetlistGraph, embeddings: &Embeddings) -> Vec<f64> {
    let n = graph.node_count();
    let outputs = graph.output_ids();
    if outputs.is_empty() || embeddings.dim() == 0 {
        return vec![0.0; n];
    }

    let normalized: Vec<Vec<f32>> = embeddings
        .rows()
        .map(|row| {
            let mut row = row.to_vec();
            l2_normalize(&mut row);
            row
        })
        .collect();

    let mut centroid = vec![0.0f32; embeddings.dim()];
    for &o in &outputs {
        for (c, v) in centroid.iter_mut().zip(&normalized[o as usize]) {
            *c += v;
        }
    }
    for c in centroid.iter_mut() {
        *c /= outputs.len() as f32;
    }
    l2_normalize(&mut centroid);

    normalized
        .iter()
        .map(|row| {
            let cos: f64 = row
                .iter()
                .zip(&centroid)
                .map(|(a, b)| *a as f64 * *b as f64)
                .sum();
            unit_interval(cos)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::netlist_graph::{GraphBuilder, NodeAttrs};
    use crate::features::structural::FEATURE_COUNT;

    fn graph() -> NetlistGraph {
        let mut b = GraphBuilder::new();
        let a = b.add_or_merge("a_sig", NodeAttrs::kind("wire"));
        let u = b.add_or_merge("u1", NodeAttrs::kind("INV_X1"));
        let y = b.add_or_merge("y", NodeAttrs::kind("wire"));
        let c = b.add_or_merge("clk", NodeAttrs::kind("wire"));
        b.add_edge(a, u);
        b.add_edge(u, y);
        b.add_edge(c, u);
        b.mark_output(y);
        b.finish().unwrap()
    }

    fn uniform(n: usize, v: f64) -> FeatureTable {
        FeatureTable::new(vec![[v; FEATURE_COUNT]; n])
    }

    #[test]
    fn test_identical_inputs_score_identically() {
        let g = graph();
        let e = Embeddings::new(4, 2, vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0]).unwrap();
        let scores = ScoreFusion::new(FusionWeights::default())
            .scores(&g, &uniform(4, 0.3), &e)
            .unwrap();
        assert!(scores.windows(2).all(|w| (w[0] - w[1]).abs() < 1e-12));
    }

    #[test]
    fn test_flat_structure_leaves_flag_and_similarity() {
        let g = graph();
        let mut rows = vec![[0.0; FEATURE_COUNT]; 4];
        rows[0][F::NearFlipFlop.index()] = 1.0;
        // node 0 points the same way as the output (node 2)
        let e = Embeddings::new(4, 2, vec![1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0]).unwrap();

        let scores = ScoreFusion::new(FusionWeights::default())
            .scores(&g, &FeatureTable::new(rows), &e)
            .unwrap();
        assert!((scores[0] - (0.15 + 0.15)).abs() < 1e-9);
        // orthogonal to the centroid: similarity 0.5
        assert!((scores[1] - 0.15 * 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_no_outputs_zero_similarity() {
        let mut b = GraphBuilder::new();
        b.add_or_merge("a", NodeAttrs::kind("wire"));
        b.add_or_merge("b", NodeAttrs::kind("wire"));
        let g = b.finish().unwrap();
        let e = Embeddings::new(2, 1, vec![1.0, 1.0]).unwrap();
        assert_eq!(output_similarity(&g, &e), vec![0.0, 0.0]);
    }

    #[test]
    fn test_rank_filters_ineligible() {
        let g = graph();
        let e = Embeddings::new(4, 1, vec![1.0; 4]).unwrap();
        let ranking = ScoreFusion::new(FusionWeights::default())
            .rank(&g, &uniform(4, 0.5), &e)
            .unwrap();
        let names: Vec<&str> = ranking.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a_sig", "y"]);
    }

    #[test]
    fn test_row_mismatch_is_error() {
        let g = graph();
        let e = Embeddings::new(3, 1, vec![1.0; 3]).unwrap();
        let err = ScoreFusion::new(FusionWeights::default())
            .rank(&g, &uniform(4, 0.5), &e)
            .unwrap_err();
        assert!(matches!(err, FusionError::RowMismatch { what: "embeddings", .. }));
    }
}

//! Eigenvector centrality on the undirected simplification
//!
//! Edge direction is dropped, parallel edges and self-loops collapse, and
//! power iteration runs on `(A + I)`. The identity shift keeps the iteration
//! convergent on bipartite graphs, which instance/net netlists always are.
//! Non-convergence yields an all-zero vector.

use rayon::prelude::*;
use tracing::debug;

use crate::features::netlist_graph::{NetlistGraph, NodeId};

/// Eigenvector centrality solver
pub struct EigenvectorCentrality {
    max_iterations: usize,
    tolerance: f64,
}

impl EigenvectorCentrality {
    pub fn new(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
        }
    }

    /// L2-normalized centrality indexed by node id, or zeros on failure
    pub fn compute(&self, graph: &NetlistGraph) -> Vec<f64> {
        let n = graph.node_count();
        if n == 0 {
            return Vec::new();
        }

        let neighbours = undirected_neighbours(graph);
        let mut x = vec![1.0 / n as f64; n];

        for iteration in 0..self.max_iterations {
            let mut next: Vec<f64> = (0..n)
                .into_par_iter()
                .map(|v| x[v] + neighbours[v].iter().map(|&u| x[u as usize]).sum::<f64>())
                .collect();

            let norm = next.iter().map(|v| v * v).sum::<f64>().sqrt();
            if !(norm.is_finite() && norm > 0.0) {
                debug!("eigenvector centrality degenerated, emitting zeros");
                return vec![0.0; n];
            }
            for v in next.iter_mut() {
                *v /= norm;
            }

            let change: f64 = next.iter().zip(&x).map(|(a, b)| (a - b).abs()).sum();
            x = next;
            if change < n as f64 * self.tolerance {
                debug!("eigenvector centrality converged after {} iterations", iteration + 1);
                return x;
            }
        }

        debug!(
            max_iterations = self.max_iterations,
            "eigenvector centrality did not converge, emitting zeros"
        );
        vec![0.0; n]
    }
}

/// Sorted, deduplicated neighbour lists ignoring direction and self-loops
fn undirected_neighbours(graph: &NetlistGraph) -> Vec<Vec<NodeId>> {
    graph
        .node_ids()
        .map(|v| {
            let mut adj: Vec<NodeId> = graph
                .successors(v)
                .iter()
                .chain(graph.predecessors(v))
                .copied()
                .filter(|&u| u != v)
                .collect();
            adj.sort_unstable();
            adj.dedup();
            adj
        })
        .collect()
}

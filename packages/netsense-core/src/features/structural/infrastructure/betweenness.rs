//! Betweenness centrality (Brandes), exact or pivot-sampled
//!
//! Pivot count `k = min(200, max(10, N/10))`. When `k >= N` every node is a
//! source and the result is exact; otherwise `k` distinct pivots are drawn
//! with a seeded ChaCha RNG and the accumulated dependencies are scaled by
//! `N / k`. Scores are normalized by `(N-1)(N-2)` for directed graphs.
//!
//! Sources are processed in fixed-size chunks whose partial sums are added
//! in chunk order, so the result does not depend on the thread count.

use rand::seq::index::sample;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::collections::VecDeque;
use tracing::debug;

use crate::features::netlist_graph::{NetlistGraph, NodeId};

/// Sources handled by one parallel task
const SOURCE_CHUNK: usize = 16;

/// Pivot sample size for a graph with `n` nodes
pub fn pivot_count(n: usize) -> usize {
    (n / 10).max(10).min(200)
}

/// Betweenness estimator
pub struct BetweennessEstimator {
    seed: u64,
}

impl BetweennessEstimator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Compute normalized betweenness indexed by node id
    pub fn compute(&self, graph: &NetlistGraph) -> Vec<f64> {
        let n = graph.node_count();
        if n < 3 {
            return vec![0.0; n];
        }

        let k = pivot_count(n);
        let sources: Vec<NodeId> = if k >= n {
            graph.node_ids().collect()
        } else {
            let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
            let mut picked: Vec<NodeId> = sample(&mut rng, n, k)
                .into_iter()
                .map(|i| i as NodeId)
                .collect();
            picked.sort_unstable();
            picked
        };
        debug!(nodes = n, sources = sources.len(), exact = k >= n, "betweenness");

        let partials: Vec<Vec<f64>> = sources
            .par_chunks(SOURCE_CHUNK)
            .map(|chunk| {
                let mut state = BrandesState::new(n);
                let mut acc = vec![0.0; n];
                for &s in chunk {
                    state.accumulate(graph, s, &mut acc);
                }
                acc
            })
            .collect();

        let mut scores = vec![0.0; n];
        for partial in &partials {
            for (total, v) in scores.iter_mut().zip(partial) {
                *total += v;
            }
        }

        let scale = (n as f64 / sources.len() as f64) / ((n - 1) as f64 * (n - 2) as f64);
        for v in scores.iter_mut() {
            *v *= scale;
        }
        scores
    }
}

/// Scratch buffers reused across sources; only touched slots are reset
struct BrandesState {
    sigma: Vec<f64>,
    dist: Vec<u32>,
    delta: Vec<f64>,
    order: Vec<NodeId>,
    queue: VecDeque<NodeId>,
}

impl BrandesState {
    fn new(n: usize) -> Self {
        Self {
            sigma: vec![0.0; n],
            dist: vec![u32::MAX; n],
            delta: vec![0.0; n],
            order: Vec::with_capacity(n),
            queue: VecDeque::new(),
        }
    }

    fn accumulate(&mut self, graph: &NetlistGraph, source: NodeId, acc: &mut [f64]) {
        let s = source as usize;
        self.sigma[s] = 1.0;
        self.dist[s] = 0;
        self.queue.push_back(source);

        while let Some(v) = self.queue.pop_front() {
            self.order.push(v);
            let dv = self.dist[v as usize];
            for &w in graph.successors(v) {
                let wi = w as usize;
                if self.dist[wi] == u32::MAX {
                    self.dist[wi] = dv + 1;
                    self.queue.push_back(w);
                }
                if self.dist[wi] == dv + 1 {
                    self.sigma[wi] += self.sigma[v as usize];
                }
            }
        }

        for &w in self.order.iter().rev() {
            let wi = w as usize;
            let dw = self.dist[wi];
            if dw > 0 {
                let coeff = (1.0 + self.delta[wi]) / self.sigma[wi];
                for &v in graph.predecessors(w) {
                    let vi = v as usize;
                    if self.dist[vi] != u32::MAX && self.dist[vi] + 1 == dw {
                        self.delta[vi] += self.sigma[vi] * coeff;
                    }
                }
            }
            if w != source {
                acc[wi] += self.delta[wi];
            }
        }

        for &w in &self.order {
            let wi = w as usize;
            self.sigma[wi] = 0.0;
            self.dist[wi] = u32::MAX;
            self.delta[wi] = 0.0;
        }
        self.order.clear();
    }
}

//! Per-node local passes: average distance, reconvergence, flip-flop
//! adjacency, bounded depth
//!
//! These are the batchable passes handed to the worker pool. Each one reads
//! only the graph (and the precomputed `dist_min`), so batches are
//! independent.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::distance::average_distance;
use crate::features::netlist_graph::domain::is_sequential_kind;
use crate::features::netlist_graph::{NetlistGraph, NodeId};

/// Local metrics for one node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalRow {
    pub node: NodeId,
    pub dist_avg: f64,
    pub reconvergence: f64,
    pub near_flip_flop: f64,
    pub depth: f64,
}

/// Exploration budget of the depth BFS for a graph of `n` nodes
pub fn depth_cap(n: usize) -> usize {
    (n / 5).max(50).min(200)
}

/// Compute local metrics for a contiguous node range
pub fn compute_batch(
    graph: &NetlistGraph,
    dist_min: &[u32],
    nodes: Range<NodeId>,
    cap: usize,
) -> Vec<LocalRow> {
    let mut scratch = ReconvergenceScratch::default();
    let mut visited = FxHashMap::default();

    nodes
        .map(|node| LocalRow {
            node,
            dist_avg: average_distance(graph, dist_min, node),
            reconvergence: reconvergence(graph, node, &mut scratch),
            near_flip_flop: near_flip_flop(graph, node),
            depth: bounded_depth(graph, node, cap, &mut visited),
        })
        .collect()
}

/// Reusable sets for [`reconvergence`]
#[derive(Debug, Default)]
pub struct ReconvergenceScratch {
    first_hop: FxHashSet<NodeId>,
    second_hop: FxHashSet<NodeId>,
    union: FxHashSet<NodeId>,
}

/// `max(0, Σ |succ(s)| − |∪ succ(s)|)` over the distinct successors `s` of
/// `node`.
///
/// Both hops are taken as sets: parallel edges (one net driving two pins of
/// the same gate) count once.
pub fn reconvergence(graph: &NetlistGraph, node: NodeId, scratch: &mut ReconvergenceScratch) -> f64 {
    let ReconvergenceScratch {
        first_hop,
        second_hop,
        union,
    } = scratch;
    first_hop.clear();
    union.clear();

    let mut fanout_sum = 0usize;
    for &s in graph.successors(node) {
        if !first_hop.insert(s) {
            continue;
        }
        second_hop.clear();
        second_hop.extend(graph.successors(s).iter().copied());
        fanout_sum += second_hop.len();
        union.extend(second_hop.iter().copied());
    }
    fanout_sum.saturating_sub(union.len()) as f64
}

/// 1.0 when any predecessor or successor is a sequential instance
pub fn near_flip_flop(graph: &NetlistGraph, node: NodeId) -> f64 {
    let adjacent = graph
        .predecessors(node)
        .iter()
        .chain(graph.successors(node))
        .any(|&nb| is_sequential_kind(graph.kind(nb)));
    if adjacent {
        1.0
    } else {
        0.0
    }
}

/// Deepest BFS level reached from `node` before `cap` new nodes are visited
pub fn bounded_depth(
    graph: &NetlistGraph,
    node: NodeId,
    cap: usize,
    visited: &mut FxHashMap<NodeId, u32>,
) -> f64 {
    visited.clear();
    visited.insert(node, 0);

    let mut frontier = vec![node];
    let mut max_level = 0u32;
    let mut count = 0usize;

    'levels: while !frontier.is_empty() && count < cap {
        let mut next = Vec::new();
        for &u in &frontier {
            let level = visited[&u] + 1;
            for &v in graph.successors(u) {
                if !visited.contains_key(&v) {
                    visited.insert(v, level);
                    max_level = max_level.max(level);
                    next.push(v);
                    count += 1;
                }
                if count >= cap {
                    break 'levels;
                }
            }
        }
        frontier = next;
    }

    max_level as f64
}

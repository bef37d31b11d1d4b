//! Distance-to-output metrics
//!
//! `dist_min` comes from a single multi-source BFS launched from every output
//! node over the reversed graph: O(N + E) regardless of how many outputs
//! exist. `dist_avg` is derived per node from `dist_min` of its successors,
//! which keeps it a local, batchable pass.
//!
//! Unreachable nodes carry the sentinel distance `N`.

use std::collections::VecDeque;

use crate::features::netlist_graph::{NetlistGraph, NodeId};

/// Hop distance from every node to its nearest output (sentinel = N)
pub fn multi_source_distances(graph: &NetlistGraph, outputs: &[NodeId]) -> Vec<u32> {
    let n = graph.node_count();
    let sentinel = n as u32;
    let mut dist = vec![sentinel; n];
    let mut frontier = VecDeque::new();

    for &t in outputs {
        if (t as usize) < n && dist[t as usize] != 0 {
            dist[t as usize] = 0;
            frontier.push_back(t);
        }
    }

    while let Some(v) = frontier.pop_front() {
        let next = dist[v as usize] + 1;
        for &pred in graph.predecessors(v) {
            let slot = &mut dist[pred as usize];
            if *slot == sentinel {
                *slot = next;
                frontier.push_back(pred);
            }
        }
    }

    dist
}

/// Average hop distance from `node` to the outputs reachable through it.
///
/// Outputs are at distance 0. Any other node averages `1 + dist_min(s)` over
/// successors `s` that reach an output; with none, the sentinel is returned.
///
/// This is a lower bound on the mean BFS distance to every reachable output:
/// each successor contributes only its nearest output.
pub fn average_distance(graph: &NetlistGraph, dist_min: &[u32], node: NodeId) -> f64 {
    let sentinel = graph.node_count() as u32;
    if dist_min[node as usize] == 0 {
        return 0.0;
    }

    let (sum, count) = graph
        .successors(node)
        .iter()
        .map(|&s| dist_min[s as usize])
        .filter(|&d| d != sentinel)
        .fold((0u64, 0u64), |(sum, count), d| (sum + d as u64 + 1, count + 1));

    if count == 0 {
        sentinel as f64
    } else {
        sum as f64 / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::netlist_graph::{GraphBuilder, NodeAttrs};

    /// 5-node diamond: a -> {b, c} -> d (output), plus isolated e
    fn diamond() -> NetlistGraph {
        let mut b = GraphBuilder::new();
        let ids: Vec<NodeId> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|n| b.add_or_merge(n, NodeAttrs::kind("wire")))
            .collect();
        b.add_edge(ids[0], ids[1]);
        b.add_edge(ids[0], ids[2]);
        b.add_edge(ids[1], ids[3]);
        b.add_edge(ids[2], ids[3]);
        b.mark_output(ids[3]);
        b.finish().unwrap()
    }

    #[test]
    fn test_diamond_min_distances() {
        let g = diamond();
        let dist = multi_source_distances(&g, &g.output_ids());
        assert_eq!(dist, vec![2, 1, 1, 0, 5]);
    }

    #[test]
    fn test_diamond_average_distances() {
        let g = diamond();
        let dist = multi_source_distances(&g, &g.output_ids());
        assert_eq!(average_distance(&g, &dist, 3), 0.0);
        assert_eq!(average_distance(&g, &dist, 1), 1.0);
        assert_eq!(average_distance(&g, &dist, 0), 2.0);
        assert_eq!(average_distance(&g, &dist, 4), 5.0);
    }

    #[test]
    fn test_no_outputs_all_sentinel() {
        let g = diamond();
        assert_eq!(multi_source_distances(&g, &[]), vec![5; 5]);
    }
}

//! Directed netlist graph with CSR adjacency
//!
//! Nodes are dense `u32` ids assigned in first-seen order. Edges keep their
//! insertion order and multiplicity; successor and predecessor slices are
//! laid out in that same order so every traversal is deterministic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cell_patterns::is_sequential_kind;

/// Dense node identifier
pub type NodeId = u32;

/// Structural errors when rebuilding a graph from flattened parts
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("edge ({src}, {dst}) references a node outside 0..{n_nodes}")]
    EdgeOutOfRange { src: NodeId, dst: NodeId, n_nodes: u32 },

    #[error("attribute array '{field}' has {found} entries, expected {expected}")]
    AttributeLength {
        field: &'static str,
        found: usize,
        expected: usize,
    },

    #[error("output id {0} is out of range")]
    OutputOutOfRange(NodeId),
}

/// Flattened graph record used for caching and for process workers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactGraph {
    pub n_nodes: u32,
    pub edges: Vec<(NodeId, NodeId)>,
    pub names: Vec<String>,
    pub kinds: Vec<String>,
    pub output_ids: Vec<NodeId>,
}

/// Read-only netlist graph
#[derive(Debug, Clone)]
pub struct NetlistGraph {
    names: Vec<String>,
    kinds: Vec<String>,
    sequential: Vec<bool>,
    is_output: Vec<bool>,
    edges: Vec<(NodeId, NodeId)>,
    succ_offsets: Vec<usize>,
    succ: Vec<NodeId>,
    pred_offsets: Vec<usize>,
    pred: Vec<NodeId>,
}

impl NetlistGraph {
    /// Assemble a graph from parallel attribute arrays and an edge list
    pub fn from_parts(
        names: Vec<String>,
        kinds: Vec<String>,
        sequential: Vec<bool>,
        is_output: Vec<bool>,
        edges: Vec<(NodeId, NodeId)>,
    ) -> Result<Self, GraphError> {
        let n = names.len();
        for (field, found) in [
            ("kinds", kinds.len()),
            ("sequential", sequential.len()),
            ("is_output", is_output.len()),
        ] {
            if found != n {
                return Err(GraphError::AttributeLength {
                    field,
                    found,
                    expected: n,
                });
            }
        }

        if let Some(&(src, dst)) = edges
            .iter()
            .find(|(s, d)| *s as usize >= n || *d as usize >= n)
        {
            return Err(GraphError::EdgeOutOfRange {
                src,
                dst,
                n_nodes: n as u32,
            });
        }

        let (succ_offsets, succ) = build_csr(n, edges.iter().map(|&(s, d)| (s, d)));
        let (pred_offsets, pred) = build_csr(n, edges.iter().map(|&(s, d)| (d, s)));

        Ok(Self {
            names,
            kinds,
            sequential,
            is_output,
            edges,
            succ_offsets,
            succ,
            pred_offsets,
            pred,
        })
    }

    /// Rebuild a graph from its compact record.
    ///
    /// The sequential flag is derived from the kind array.
    pub fn from_compact(compact: CompactGraph) -> Result<Self, GraphError> {
        let n = compact.n_nodes as usize;
        if compact.names.len() != n {
            return Err(GraphError::AttributeLength {
                field: "names",
                found: compact.names.len(),
                expected: n,
            });
        }

        let mut is_output = vec![false; n];
        for &id in &compact.output_ids {
            let slot = is_output
                .get_mut(id as usize)
                .ok_or(GraphError::OutputOutOfRange(id))?;
            *slot = true;
        }

        let sequential = compact.kinds.iter().map(|k| is_sequential_kind(k)).collect();

        Self::from_parts(
            compact.names,
            compact.kinds,
            sequential,
            is_output,
            compact.edges,
        )
    }

    /// Flatten into a compact record
    pub fn to_compact(&self) -> CompactGraph {
        CompactGraph {
            n_nodes: self.node_count() as u32,
            edges: self.edges.clone(),
            names: self.names.clone(),
            kinds: self.kinds.clone(),
            output_ids: self.output_ids(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.names[id as usize]
    }

    pub fn kind(&self, id: NodeId) -> &str {
        &self.kinds[id as usize]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn kinds(&self) -> &[String] {
        &self.kinds
    }

    pub fn is_output(&self, id: NodeId) -> bool {
        self.is_output[id as usize]
    }

    pub fn is_sequential(&self, id: NodeId) -> bool {
        self.sequential[id as usize]
    }

    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    #[inline]
    pub fn successors(&self, id: NodeId) -> &[NodeId] {
        let i = id as usize;
        &self.succ[self.succ_offsets[i]..self.succ_offsets[i + 1]]
    }

    #[inline]
    pub fn predecessors(&self, id: NodeId) -> &[NodeId] {
        let i = id as usize;
        &self.pred[self.pred_offsets[i]..self.pred_offsets[i + 1]]
    }

    #[inline]
    pub fn out_degree(&self, id: NodeId) -> usize {
        self.successors(id).len()
    }

    #[inline]
    pub fn in_degree(&self, id: NodeId) -> usize {
        self.predecessors(id).len()
    }

    /// Output node ids in ascending order
    pub fn output_ids(&self) -> Vec<NodeId> {
        self.ids_where(&self.is_output)
    }

    /// Sequential instance ids in ascending order
    pub fn sequential_ids(&self) -> Vec<NodeId> {
        self.ids_where(&self.sequential)
    }

    /// Iterate node ids in traversal order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        0..self.node_count() as NodeId
    }

    fn ids_where(&self, flags: &[bool]) -> Vec<NodeId> {
        flags
            .iter()
            .enumerate()
            .filter_map(|(i, &f)| f.then_some(i as NodeId))
            .collect()
    }
}

/// Counting-sort an edge stream into (offsets, targets), stable per source
fn build_csr(
    n: usize,
    pairs: impl Iterator<Item = (NodeId, NodeId)> + Clone,
) -> (Vec<usize>, Vec<NodeId>) {
    let mut offsets = vec![0usize; n + 1];
    for (src, _) in pairs.clone() {
        offsets[src as usize + 1] += 1;
    }
    for i in 0..n {
        offsets[i + 1] += offsets[i];
    }

    let mut cursor = offsets.clone();
    let mut targets = vec![0 as NodeId; offsets[n]];
    for (src, dst) in pairs {
        let slot = &mut cursor[src as usize];
        targets[*slot] = dst;
        *slot += 1;
    }

    (offsets, targets)
}

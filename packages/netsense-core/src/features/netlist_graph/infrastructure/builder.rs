// Netlist Graph Builder
//
// Explicit add-or-merge node table:
// - name → index map (AHashMap) plus parallel attribute arrays
// - first writer wins for every attribute key; later writers only fill gaps
// - edges appended verbatim (no dedup, order preserved)

use ahash::AHashMap;

use crate::features::netlist_graph::domain::{GraphError, NetlistGraph, NodeId};

// ============================================================
// Node attributes
// ============================================================

/// Attributes offered for a node at add-or-merge time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeAttrs {
    pub kind: Option<String>,
    pub sequential: Option<bool>,
}

impl NodeAttrs {
    pub fn kind(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            sequential: None,
        }
    }

    pub fn with_sequential(mut self, sequential: bool) -> Self {
        self.sequential = Some(sequential);
        self
    }
}

// ============================================================
// Graph Builder
// ============================================================

/// Incremental builder with name-keyed node identity
///
/// ## Usage
/// ```text
/// let mut b = GraphBuilder::new();
/// let g1 = b.add_or_merge("g1", NodeAttrs::kind("NAND2_X1"));
/// let n1 = b.add_or_merge("n1", NodeAttrs::kind("wire"));
/// b.add_edge(n1, g1);
/// let graph = b.finish()?;
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    index: AHashMap<String, NodeId>,
    names: Vec<String>,
    kinds: Vec<Option<String>>,
    sequential: Vec<Option<bool>>,
    is_output: Vec<bool>,
    edges: Vec<(NodeId, NodeId)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `name`, creating the node on first sight.
    ///
    /// On a repeated name only attributes that are still unset are filled in.
    pub fn add_or_merge(&mut self, name: &str, attrs: NodeAttrs) -> NodeId {
        if let Some(&id) = self.index.get(name) {
            let slot = id as usize;
            if self.kinds[slot].is_none() {
                self.kinds[slot] = attrs.kind;
            }
            if self.sequential[slot].is_none() {
                self.sequential[slot] = attrs.sequential;
            }
            return id;
        }

        let id = self.names.len() as NodeId;
        self.index.insert(name.to_string(), id);
        self.names.push(name.to_string());
        self.kinds.push(attrs.kind);
        self.sequential.push(attrs.sequential);
        self.is_output.push(false);
        id
    }

    /// Append a directed edge
    pub fn add_edge(&mut self, src: NodeId, dst: NodeId) {
        self.edges.push((src, dst));
    }

    /// Flag a node as a circuit output
    pub fn mark_output(&mut self, id: NodeId) {
        if let Some(flag) = self.is_output.get_mut(id as usize) {
            *flag = true;
        }
    }

    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    /// Current kind of a node (None while unset)
    pub fn kind_of(&self, id: NodeId) -> Option<&str> {
        self.kinds.get(id as usize).and_then(|k| k.as_deref())
    }

    /// Snapshot of the name → id table
    pub fn name_index(&self) -> AHashMap<String, NodeId> {
        self.index.clone()
    }

    /// Freeze into an immutable graph. Unset kinds become empty strings.
    pub fn finish(self) -> Result<NetlistGraph, GraphError> {
        let kinds = self
            .kinds
            .into_iter()
            .map(|k| k.unwrap_or_default())
            .collect();
        let sequential = self
            .sequential
            .into_iter()
            .map(|s| s.unwrap_or(false))
            .collect();

        NetlistGraph::from_parts(self.names, kinds, sequential, self.is_output, self.edges)
    }
}

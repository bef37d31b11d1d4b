//! Netlist Graph Builder
//!
//! ```text
//! netlist text ──► strip comments ──► [module scope] ──► instance regex
//!                                                          │
//!                      ┌───────────────────────────────────┘
//!                      ▼
//!   instance node (kind = cell type) ◄──► net nodes (kind = wire)
//!     output port:  instance ──► net   (net marked as output)
//!     other port:   net ──► instance
//! ```
//!
//! Node identity is by name through [`GraphBuilder::add_or_merge`]; the
//! resulting [`NetlistGraph`] is immutable with CSR successor/predecessor
//! slices.

pub mod domain;
pub mod infrastructure;

pub use domain::{CompactGraph, GraphError, NetlistGraph, NodeId, WIRE_KIND};
pub use infrastructure::{
    read_netlist_text, GraphBuilder, NetlistParser, NodeAttrs, ParseError, ParsedNetlist,
};

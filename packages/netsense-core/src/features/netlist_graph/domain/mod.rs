//! Netlist graph domain model

pub mod cell_patterns;
pub mod graph;

pub use cell_patterns::{is_output_port, is_sequential_cell, is_sequential_kind, WIRE_KIND};
pub use graph::{CompactGraph, GraphError, NetlistGraph, NodeId};

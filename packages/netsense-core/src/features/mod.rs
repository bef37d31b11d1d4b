//! Feature modules - each stage is a vertical slice
//!
//! Each feature contains some of:
//! - domain/         - Pure types and rules
//! - application/    - Use cases
//! - infrastructure/ - Algorithms and IO

pub mod netlist_graph;
pub mod structural;

// Persisted (graph, features) per netlist
pub mod feature_cache;

// GIN encoder + DGI objective, with the resource degrade chain
pub mod encoder;

pub mod fusion;

//! Netlist parsing and graph construction

pub mod builder;
pub mod parser;

pub use builder::{GraphBuilder, NodeAttrs};
pub use parser::{read_netlist_text, NetlistParser, ParseError, ParsedNetlist};

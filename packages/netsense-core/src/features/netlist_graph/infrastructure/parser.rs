//! Gate-level netlist parser
//!
//! Regex-driven: comments are stripped, then every
//! `CELL inst ( .PORT(net), ... );` statement becomes one instance node plus
//! one `wire` node per connected net. Port direction comes from the output
//! port heuristics in `cell_patterns`.

use ahash::AHashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use super::builder::{GraphBuilder, NodeAttrs};
use crate::features::netlist_graph::domain::{
    is_output_port, is_sequential_cell, GraphError, NetlistGraph, NodeId, WIRE_KIND,
};

static LINE_COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)//.*$").unwrap());
static BLOCK_COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static INSTANCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?ms)^\s*(\w+)\s+(\w+)\s*\((.*?)\)\s*;").unwrap());
static PORT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.(\w+)\s*\(\s*([^)]+)\s*\)").unwrap());

/// Statement keywords that look like instances but are not
const RESERVED_WORDS: &[&str] = &[
    "module",
    "endmodule",
    "input",
    "output",
    "wire",
    "reg",
    "assign",
];

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Parse errors (fatal for the file being parsed)
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read netlist: {0}")]
    Io(#[from] std::io::Error),

    #[error("module '{0}' not found in netlist")]
    ModuleNotFound(String),

    #[error("unterminated block comment")]
    UnterminatedComment,

    #[error("inconsistent graph: {0}")]
    Graph(#[from] GraphError),
}

/// Parser output
#[derive(Debug, Clone)]
pub struct ParsedNetlist {
    pub graph: NetlistGraph,
    pub name_to_id: AHashMap<String, NodeId>,
    pub output_ids: Vec<NodeId>,
    pub sequential_ids: Vec<NodeId>,
}

/// Read netlist text, tolerating a UTF-8 BOM and non-UTF-8 bytes.
///
/// Invalid UTF-8 is decoded as Latin-1, which never fails.
pub fn read_netlist_text(path: impl AsRef<Path>) -> Result<String, ParseError> {
    let bytes = std::fs::read(path.as_ref())?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

    match std::str::from_utf8(body) {
        Ok(text) => Ok(text.to_string()),
        Err(_) => {
            debug!(path = %path.as_ref().display(), "netlist is not UTF-8, decoding as Latin-1");
            Ok(body.iter().map(|&b| b as char).collect())
        }
    }
}

/// Regex netlist parser
#[derive(Debug, Default, Clone, Copy)]
pub struct NetlistParser;

impl NetlistParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse netlist text into a graph.
    ///
    /// With `top_module`, only the body of that module is read; the module
    /// must exist.
    pub fn parse(&self, text: &str, top_module: Option<&str>) -> Result<ParsedNetlist, ParseError> {
        let stripped = strip_comments(text)?;
        let body = match top_module {
            Some(name) => module_body(&stripped, name)?,
            None => stripped.as_str(),
        };

        let mut builder = GraphBuilder::new();
        let mut instances = 0usize;

        for caps in INSTANCE_RE.captures_iter(body) {
            let cell_type = &caps[1];
            let inst_name = &caps[2];
            let port_list = &caps[3];

            let lowered = cell_type.to_ascii_lowercase();
            if RESERVED_WORDS.contains(&lowered.as_str()) {
                continue;
            }
            instances += 1;

            let inst_id = builder.add_or_merge(
                inst_name,
                NodeAttrs::kind(cell_type).with_sequential(is_sequential_cell(cell_type)),
            );

            for port in PORT_RE.captures_iter(port_list) {
                let port_name = &port[1];
                let net_name = port[2].trim().replace('.', "_");

                let net_id = builder.add_or_merge(&net_name, NodeAttrs::kind(WIRE_KIND));
                if is_output_port(port_name) {
                    builder.add_edge(inst_id, net_id);
                    builder.mark_output(net_id);
                } else {
                    builder.add_edge(net_id, inst_id);
                }
            }
        }

        let name_to_id = builder.name_index();
        let graph = builder.finish()?;
        debug!(
            instances,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "parsed netlist"
        );

        Ok(ParsedNetlist {
            output_ids: graph.output_ids(),
            sequential_ids: graph.sequential_ids(),
            name_to_id,
            graph,
        })
    }

    /// Read and parse a netlist file
    pub fn parse_file(
        &self,
        path: impl AsRef<Path>,
        top_module: Option<&str>,
    ) -> Result<ParsedNetlist, ParseError> {
        let text = read_netlist_text(path)?;
        self.parse(&text, top_module)
    }
}

fn strip_comments(text: &str) -> Result<String, ParseError> {
    let no_line = LINE_COMMENT_RE.replace_all(text, "");
    let no_block = BLOCK_COMMENT_RE.replace_all(&no_line, "");
    if no_block.contains("/*") {
        return Err(ParseError::UnterminatedComment);
    }
    Ok(no_block.into_owned())
}

fn module_body<'a>(text: &'a str, name: &str) -> Result<&'a str, ParseError> {
    let pattern = format!(r"(?s)\bmodule\s+{}\b(.*?)\bendmodule\b", regex::escape(name));
    let re = Regex::new(&pattern).map_err(|_| ParseError::ModuleNotFound(name.to_string()))?;
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| ParseError::ModuleNotFound(name.to_string()))
}

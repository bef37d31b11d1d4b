//! Static naming conventions of the gate-level cell library

use once_cell::sync::Lazy;
use regex::Regex;

/// Kind tag carried by every net node
pub const WIRE_KIND: &str = "wire";

/// Flip-flop / latch cell types
static SEQUENTIAL_CELL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(DFF|SDFF|DFFR|DFFS|DFFX|DLH|DLR|LATCH)").expect("valid sequential cell regex")
});

/// Port names (upper-cased) that drive their net
const OUTPUT_PORT_HINTS: &[&str] = &["Z", "ZN", "Q", "QN", "OUT", "Y"];

/// Adder sum port, matched verbatim
const SUM_PORT: &str = "o_sum";

/// True when the cell type names a flip-flop or latch
pub fn is_sequential_cell(cell_type: &str) -> bool {
    SEQUENTIAL_CELL_RE.is_match(cell_type)
}

/// True when a connection on `port` drives the net (instance → net)
pub fn is_output_port(port: &str) -> bool {
    port == SUM_PORT
        || OUTPUT_PORT_HINTS
            .iter()
            .any(|hint| hint.eq_ignore_ascii_case(port))
}

/// True for a node kind that represents a sequential cell instance
pub fn is_sequential_kind(kind: &str) -> bool {
    !kind.is_empty() && kind != WIRE_KIND && is_sequential_cell(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_cells() {
        assert!(is_sequential_cell("DFFR_X1"));
        assert!(is_sequential_cell("sdffq"));
        assert!(is_sequential_cell("LATCH_X2"));
        assert!(is_sequential_cell("TLATCH"));
        assert!(!is_sequential_cell("NAND2_X1"));
        assert!(!is_sequential_cell("BUF_X4"));
    }

    #[test]
    fn test_output_ports() {
        for port in ["Z", "zn", "Q", "QN", "out", "Y", "o_sum"] {
            assert!(is_output_port(port), "{port} should drive its net");
        }
        for port in ["A", "A1", "B", "CK", "D", "O_SUM"] {
            assert!(!is_output_port(port), "{port} should be an input");
        }
    }

    #[test]
    fn test_wire_is_never_sequential() {
        assert!(!is_sequential_kind(WIRE_KIND));
        assert!(!is_sequential_kind(""));
        assert!(is_sequential_kind("DFF_X1"));
    }
}

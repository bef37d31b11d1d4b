//! Test fixture netlists
//!
//! Gate-level Verilog snippets plus helpers that drop them into a temporary
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

/// ISCAS-85 c17: six NAND gates, two primary outputs
pub const C17: &str = r#"
// c17 benchmark
module c17 (N1, N2, N3, N6, N7, N22, N23);
  input N1, N2, N3, N6, N7;
  output N22, N23;
  wire N10, N11, N16, N19;

  NAND2_X1 U10 ( .A1(N1),  .A2(N3),  .ZN(N10) );
  NAND2_X1 U11 ( .A1(N3),  .A2(N6),  .ZN(N11) );
  NAND2_X1 U16 ( .A1(N2),  .A2(N11), .ZN(N16) );
  NAND2_X1 U19 ( .A1(N11), .A2(N7),  .ZN(N19) );
  NAND2_X1 U22 ( .A1(N10), .A2(N16), .ZN(N22) );
  NAND2_X1 U23 ( .A1(N16), .A2(N19), .ZN(N23) );
endmodule
"#;

/// One flip-flop feeding an inverter
pub const FLIP_FLOP: &str = r#"
module ff_inv (clk, d, y);
  input clk, d;
  output y;
  wire q;

  DFF_X1 ff0 ( .D(d), .CK(clk), .Q(q) );
  INV_X1 g0  ( .A(q), .ZN(y) );
endmodule
"#;

/// One flip-flop, two inverters and four nets: `n1 -> ff0 -> n2 -> g0 -> n3 -> g1 -> n4`
pub const FLIP_FLOP_TWO_GATES: &str = r#"
module ff_two (n1, n4);
  DFF_X1 ff0 ( .D(n1), .Q(n2) );
  INV_X1 g0  ( .A(n2), .ZN(n3) );
  INV_X1 g1  ( .A(n3), .ZN(n4) );
endmodule
"#;

/// Net `a` drives both inputs of one NAND: two parallel a→g1 edges
pub const SHARED_PIN_DRIVER: &str = r#"
module shared_pin (a, y);
  NAND2_X1 g1 ( .A1(a), .A2(a), .ZN(n) );
  INV_X1 g2 ( .A(n), .ZN(y) );
endmodule
"#;

/// Two modules; only `core` should be read when it is the top module
pub const TWO_MODULES: &str = r#"
module helper (a, z);
  BUF_X1 hb ( .A(a), .Z(z) );
  BUF_X1 hc ( .A(z), .Z(z2) );
endmodule

module core (a, b, y);
  AND2_X1 c0 ( .A1(a), .A2(b), .ZN(m) );
  INV_X1  c1 ( .A(m), .ZN(y) );
endmodule
"#;

/// A module without instances
pub const EMPTY_MODULE: &str = "module nothing (); endmodule\n";

/// An inverter chain of `len` gates: `s0 -> g0 -> s1 -> ... -> s{len}`
pub fn fixture_inverter_chain(len: usize) -> String {
    let gates: String = (0..len)
        .map(|i| format!("  INV_X1 g{i} ( .A(s{i}), .ZN(s{}) );\n", i + 1))
        .collect();
    format!("module chain ();\n{gates}endmodule\n")
}

/// Write `content` as `dir/name` and return the path
pub fn write_netlist(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write fixture netlist");
    path
}

//! Structural feature extraction tests
//!
//! Parser → extractor on fixture netlists: value ranges, determinism,
//! distance semantics and flip-flop adjacency.

#[path = "../common/mod.rs"]
mod common;
use common::*;

use netsense_core::config::ExtractionConfig;
use netsense_core::features::netlist_graph::{GraphBuilder, NetlistParser, NodeAttrs, NodeId};
use netsense_core::features::structural::infrastructure::multi_source_distances;
use netsense_core::features::structural::{StructuralExtractor, StructuralFeature};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn thread_config() -> ExtractionConfig {
    ExtractionConfig {
        workers: 2,
        ..Default::default()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Ranges and shape
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn c17_features_in_unit_interval() {
    let parsed = NetlistParser::new().parse(C17, None).unwrap();
    let table = StructuralExtractor::new(&thread_config())
        .extract(&parsed.graph)
        .unwrap();

    assert_eq!(table.len(), parsed.graph.node_count());
    assert_unit_interval(&table);
}

#[test]
fn outputs_flagged_and_closest() {
    let parsed = NetlistParser::new().parse(C17, None).unwrap();
    let table = StructuralExtractor::new(&thread_config())
        .extract(&parsed.graph)
        .unwrap();

    for name in ["N22", "N23"] {
        let id = parsed.name_to_id[name];
        assert_eq!(table.get(id, StructuralFeature::IsOutput), 1.0);
        assert_eq!(table.get(id, StructuralFeature::DistMinInv), 1.0);
    }
}

#[test]
fn extraction_is_deterministic() {
    let parsed = NetlistParser::new().parse(C17, None).unwrap();
    let extractor = StructuralExtractor::new(&thread_config());
    let a = extractor.extract(&parsed.graph).unwrap();
    let b = extractor.extract(&parsed.graph).unwrap();
    assert_eq!(a, b);
}

// ═══════════════════════════════════════════════════════════════════════════
// Distances
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn diamond_distances_with_sentinel() {
    // a -> {b, c} -> d (output), e isolated
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
    let g = b.finish().unwrap();

    let dist = multi_source_distances(&g, &g.output_ids());
    assert_eq!(dist[ids[1] as usize], 1);
    assert_eq!(dist[ids[0] as usize], 2);
    assert_eq!(dist[ids[4] as usize], g.node_count() as u32);

    let table = StructuralExtractor::new(&thread_config()).extract(&g).unwrap();
    assert_eq!(table.get(ids[4], StructuralFeature::DistMinInv), 0.0);
    assert!(
        table.get(ids[1], StructuralFeature::DistMinInv)
            > table.get(ids[0], StructuralFeature::DistMinInv)
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// Sequential adjacency
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn flip_flop_neighbours_marked() {
    let parsed = NetlistParser::new().parse(FLIP_FLOP, None).unwrap();
    let table = StructuralExtractor::new(&thread_config())
        .extract(&parsed.graph)
        .unwrap();
    let near = |name: &str| table.get(parsed.name_to_id[name], StructuralFeature::NearFlipFlop);

    assert_eq!(near("d"), 1.0);
    assert_eq!(near("clk"), 1.0);
    assert_eq!(near("q"), 1.0);
    assert_eq!(near("y"), 0.0);
    assert_eq!(parsed.sequential_ids, vec![parsed.name_to_id["ff0"]]);
}

#[test]
fn net_two_gates_from_flip_flop_not_marked() {
    let parsed = NetlistParser::new().parse(FLIP_FLOP_TWO_GATES, None).unwrap();
    assert_eq!(parsed.graph.node_count(), 7);

    let table = StructuralExtractor::new(&thread_config())
        .extract(&parsed.graph)
        .unwrap();
    let near = |name: &str| table.get(parsed.name_to_id[name], StructuralFeature::NearFlipFlop);

    assert_eq!(near("n1"), 1.0);
    assert_eq!(near("n2"), 1.0);
    assert_eq!(near("n3"), 0.0);
    assert_eq!(near("n4"), 0.0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Reconvergence
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn net_on_two_pins_of_one_gate_is_not_reconvergent() {
    let parsed = NetlistParser::new().parse(SHARED_PIN_DRIVER, None).unwrap();
    let a = parsed.name_to_id["a"];
    let g1 = parsed.name_to_id["g1"];
    assert_eq!(parsed.graph.successors(a), &[g1, g1]);

    let table = StructuralExtractor::new(&thread_config())
        .extract(&parsed.graph)
        .unwrap();
    assert!(table
        .column(StructuralFeature::Reconvergence)
        .iter()
        .all(|&v| v == 0.0));
}

// ═══════════════════════════════════════════════════════════════════════════
// Process workers
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn process_workers_match_threads() {
    let parsed = NetlistParser::new()
        .parse(&fixture_inverter_chain(40), None)
        .unwrap();

    let threads = StructuralExtractor::new(&thread_config())
        .extract(&parsed.graph)
        .unwrap();

    let processes = StructuralExtractor::new(&ExtractionConfig {
        workers: 2,
        small_scale_threshold: 1,
        worker_program: Some(PathBuf::from(env!("CARGO_BIN_EXE_netsense"))),
        ..Default::default()
    })
    .extract(&parsed.graph)
    .unwrap();

    assert_eq!(threads, processes);
}

//! End-to-end pipeline tests
//!
//! Netlist in, ranking file out, for single files and batch runs.

#[path = "../common/mod.rs"]
mod common;
use common::*;

use netsense_core::pipeline::{BatchRunner, FileOutcome, SensitivityPipeline, TIMING_REPORT_FILE};
use netsense_core::NetsenseError;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn ranked_path(outcome: &FileOutcome) -> PathBuf {
    match outcome {
        FileOutcome::Ranked { ranking_path, .. } => ranking_path.clone(),
        FileOutcome::Skipped { reason } => panic!("unexpected skip: {reason}"),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Single file
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn c17_ranking_written() {
    let dir = TempDir::new().unwrap();
    let path = write_netlist(dir.path(), "c17.v", C17);
    let out = dir.path().join("out");
    let pipeline =
        SensitivityPipeline::new(EngineConfigBuilder::fast(&dir.path().join("cache")).build())
            .unwrap();

    let outcome = pipeline.run_file(&path, &out).unwrap();
    let ranking = ranked_path(&outcome);
    assert_eq!(ranking, out.join("gnn_rank_c17_v1.txt"));
    assert_ranking_sorted(&ranking);

    let names: Vec<String> = read_ranking(&ranking).into_iter().map(|(n, _)| n).collect();
    // nets only, never instances
    assert!(names.iter().all(|n| n.starts_with('N')));
    assert!(names.contains(&"N22".to_string()));
    assert_eq!(names.len(), 11);
}

#[test]
fn same_input_same_ranking() {
    let dir = TempDir::new().unwrap();
    let path = write_netlist(dir.path(), "c17.v", C17);
    let config = EngineConfigBuilder::fast(&dir.path().join("cache"))
        .without_cache_reads()
        .with_seed(7)
        .build();
    let pipeline = SensitivityPipeline::new(config).unwrap();

    let a = ranked_path(&pipeline.run_file(&path, dir.path().join("a")).unwrap());
    let b = ranked_path(&pipeline.run_file(&path, dir.path().join("b")).unwrap());
    assert_eq!(fs::read_to_string(a).unwrap(), fs::read_to_string(b).unwrap());
}

#[test]
fn sampled_tier_ranks_too() {
    let dir = TempDir::new().unwrap();
    let path = write_netlist(dir.path(), "chain.v", &fixture_inverter_chain(30));
    let config = EngineConfigBuilder::fast(&dir.path().join("cache"))
        .with_sample_threshold(1)
        .build();
    let pipeline = SensitivityPipeline::new(config).unwrap();

    let ranking = ranked_path(&pipeline.run_file(&path, dir.path().join("out")).unwrap());
    assert_ranking_sorted(&ranking);
    assert!(!read_ranking(&ranking).is_empty());
}

#[test]
fn clock_excluded_from_flip_flop_ranking() {
    let dir = TempDir::new().unwrap();
    let path = write_netlist(dir.path(), "ff.v", FLIP_FLOP);
    let pipeline =
        SensitivityPipeline::new(EngineConfigBuilder::fast(&dir.path().join("cache")).build())
            .unwrap();

    let ranking = ranked_path(&pipeline.run_file(&path, dir.path().join("out")).unwrap());
    let mut names: Vec<String> = read_ranking(&ranking).into_iter().map(|(n, _)| n).collect();
    names.sort();
    assert_eq!(names, vec!["d", "q", "y"]);
}

#[test]
fn top_module_limits_graph() {
    let dir = TempDir::new().unwrap();
    let path = write_netlist(dir.path(), "two.v", TWO_MODULES);
    let pipeline =
        SensitivityPipeline::new(EngineConfigBuilder::fast(&dir.path().join("cache")).build())
            .unwrap()
            .with_top_module(Some("core".into()));

    let ranking = ranked_path(&pipeline.run_file(&path, dir.path().join("out")).unwrap());
    let names: Vec<String> = read_ranking(&ranking).into_iter().map(|(n, _)| n).collect();
    assert!(names.contains(&"m".to_string()));
    assert!(!names.contains(&"z2".to_string()));
}

#[test]
fn missing_top_module_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_netlist(dir.path(), "two.v", TWO_MODULES);
    let pipeline =
        SensitivityPipeline::new(EngineConfigBuilder::fast(&dir.path().join("cache")).build())
            .unwrap()
            .with_top_module(Some("absent".into()));

    let err = pipeline.run_file(&path, dir.path().join("out")).unwrap_err();
    assert!(matches!(err, NetsenseError::Parse(_)));
}

// ═══════════════════════════════════════════════════════════════════════════
// Batch
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn batch_records_every_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("netlists");
    fs::create_dir(&input).unwrap();
    write_netlist(&input, "c17.v", C17);
    write_netlist(&input, "ff.v", FLIP_FLOP);
    write_netlist(&input, "empty.v", EMPTY_MODULE);
    write_netlist(&input, "broken.v", "module x (); /* never closed\n");
    write_netlist(&input, "tb_c17.v", C17);
    let out = dir.path().join("out");

    let runner = BatchRunner::new(
        SensitivityPipeline::new(EngineConfigBuilder::fast(&dir.path().join("cache")).build())
            .unwrap(),
    );
    let summary = runner.run(&input, &out).unwrap();

    let files: Vec<&str> = summary.entries.iter().map(|e| e.filename.as_str()).collect();
    assert_eq!(files, vec!["broken.v", "c17.v", "empty.v", "ff.v"]);
    assert_eq!(summary.ranked(), 2);
    assert_eq!(summary.skipped(), 1);
    assert_eq!(summary.failed(), 1);
    assert!(out.join("gnn_rank_c17_v1.txt").exists());
    assert!(out.join("gnn_rank_ff_v1.txt").exists());
    assert!(!out.join("gnn_rank_tb_c17_v1.txt").exists());

    let report = fs::read_to_string(out.join(TIMING_REPORT_FILE)).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(
        lines[0],
        "filename,nodes,mode,feature_time,train_time,total_time,success"
    );
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("c17.v,17,v1,"));
    assert!(lines[1].ends_with(",true"));
    assert!(lines[2].starts_with("ff.v,"));
}

#[test]
fn second_batch_reuses_cache_times() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("netlists");
    fs::create_dir(&input).unwrap();
    write_netlist(&input, "c17.v", C17);
    let cache = dir.path().join("cache");

    let run = |out: &str| {
        BatchRunner::new(SensitivityPipeline::new(EngineConfigBuilder::fast(&cache).build()).unwrap())
            .run(&input, dir.path().join(out))
            .unwrap()
    };
    let first = run("first");
    let second = run("second");

    assert_eq!(first.timings[0].feature_time, second.timings[0].feature_time);
    assert!(matches!(
        second.entries[0].outcome,
        Some(FileOutcome::Ranked { cache_hit: true, .. })
    ));
}

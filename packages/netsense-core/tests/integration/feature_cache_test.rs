//! Feature cache tests
//!
//! Real extraction results through the disk cache and the pipeline's cache
//! lookups.

#[path = "../common/mod.rs"]
mod common;
use common::*;

use netsense_core::config::{CacheConfig, ExtractionConfig};
use netsense_core::features::feature_cache::{CacheKey, CacheRecord, FeatureCache};
use netsense_core::features::netlist_graph::NetlistParser;
use netsense_core::features::structural::StructuralExtractor;
use netsense_core::pipeline::{Preparation, PreparedFile, SensitivityPipeline};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn ready(prep: Preparation) -> PreparedFile {
    match prep {
        Preparation::Ready(prepared) => prepared,
        Preparation::Skipped { reason, .. } => panic!("unexpected skip: {reason}"),
    }
}

#[test]
fn extracted_features_survive_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = write_netlist(dir.path(), "c17.v", C17);
    let parsed = NetlistParser::new().parse_file(&path, None).unwrap();
    let features = StructuralExtractor::new(&ExtractionConfig {
        workers: 2,
        ..Default::default()
    })
    .extract(&parsed.graph)
    .unwrap();

    let cache = FeatureCache::new(&CacheConfig {
        enabled: true,
        cache_dir: dir.path().join("cache"),
    });
    let key = CacheKey::for_file(&path, "v1");
    cache.store(&key, &CacheRecord::new(&parsed.graph, &features, 0.25));

    let hit = cache.load(&key).expect("cache hit");
    assert_eq!(hit.features, features);
    assert_eq!(hit.graph.names(), parsed.graph.names());
    assert_eq!(hit.graph.kinds(), parsed.graph.kinds());
    assert_eq!(hit.graph.edges(), parsed.graph.edges());
    assert_eq!(hit.output_ids, parsed.output_ids);
    assert_eq!(hit.compute_time_secs, 0.25);
}

#[test]
fn edited_netlist_misses() {
    let dir = TempDir::new().unwrap();
    let path = write_netlist(dir.path(), "c17.v", C17);
    let pipeline =
        SensitivityPipeline::new(EngineConfigBuilder::fast(&dir.path().join("cache")).build())
            .unwrap();

    assert!(!ready(pipeline.prepare(&path).unwrap()).cache_hit);
    assert!(ready(pipeline.prepare(&path).unwrap()).cache_hit);

    fs::write(&path, format!("{C17}\n// edited\n")).unwrap();
    assert!(!ready(pipeline.prepare(&path).unwrap()).cache_hit);
}

#[test]
fn corrupted_entry_is_recomputed() {
    let dir = TempDir::new().unwrap();
    let cache_dir = dir.path().join("cache");
    let path = write_netlist(dir.path(), "c17.v", C17);
    let pipeline = SensitivityPipeline::new(EngineConfigBuilder::fast(&cache_dir).build()).unwrap();

    let first = ready(pipeline.prepare(&path).unwrap());
    let entry = pipeline.cache_key(&path).path_in(&cache_dir);
    fs::write(&entry, b"not msgpack").unwrap();

    let again = ready(pipeline.prepare(&path).unwrap());
    assert!(!again.cache_hit);
    assert_eq!(again.features, first.features);
}

#[test]
fn disabled_reads_still_store() {
    let dir = TempDir::new().unwrap();
    let path = write_netlist(dir.path(), "c17.v", C17);
    let pipeline = SensitivityPipeline::new(
        EngineConfigBuilder::fast(&dir.path().join("cache"))
            .without_cache_reads()
            .build(),
    )
    .unwrap();

    assert!(!ready(pipeline.prepare(&path).unwrap()).cache_hit);
    assert!(!ready(pipeline.prepare(&path).unwrap()).cache_hit);
    assert!(ready(pipeline.prepare_cached(&path).unwrap()).cache_hit);
}

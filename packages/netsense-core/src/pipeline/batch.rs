//! Two-phase batch runner
//!
//! ```text
//! Phase 1: for each netlist  parse → extract → store   (extraction parallel inside)
//! Phase 2: for each ready    cache → train → fuse → write   (one at a time)
//! ```
//!
//! Per-file failures are recorded in the summary and never abort the batch.
//! Timing rows exist for every file that reached phase 2.

use ahash::AHashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use super::result::{BatchEntry, BatchSummary, FileOutcome, Preparation, TimingRecord};
use super::runner::{SensitivityPipeline, VERSION_TAG};
use crate::errors::Result;

/// Name of the timing report written into the output directory
pub const TIMING_REPORT_FILE: &str = "timing_report.csv";

const TIMING_COLUMNS: &[&str] = &[
    "filename",
    "nodes",
    "mode",
    "feature_time",
    "train_time",
    "total_time",
    "success",
];

/// Runs every netlist of a directory
pub struct BatchRunner {
    pipeline: SensitivityPipeline,
}

impl BatchRunner {
    pub fn new(pipeline: SensitivityPipeline) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &SensitivityPipeline {
        &self.pipeline
    }

    /// `*.v` files sorted by name, testbenches (`tb_*`) excluded
    pub fn discover(input_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = fs::read_dir(input_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_netlist(path))
            .collect();
        files.sort();
        Ok(files)
    }

    pub fn run(&self, input_dir: impl AsRef<Path>, out_dir: impl AsRef<Path>) -> Result<BatchSummary> {
        let input_dir = input_dir.as_ref();
        let out_dir = out_dir.as_ref();
        fs::create_dir_all(out_dir)?;

        let files = Self::discover(input_dir)?;
        info!(files = files.len(), input = %input_dir.display(), "batch started");

        // Phase 1
        let phase1 = Instant::now();
        let mut entries = Vec::with_capacity(files.len());
        let mut ready = Vec::new();
        let mut extraction: AHashMap<String, (f64, usize)> = AHashMap::new();

        for (i, path) in files.iter().enumerate() {
            let filename = file_name(path);
            info!("[{}/{}] extracting {}", i + 1, files.len(), filename);

            match self.pipeline.prepare(path) {
                Ok(Preparation::Ready(prepared)) => {
                    extraction.insert(
                        filename.clone(),
                        (prepared.feature_secs, prepared.graph.node_count()),
                    );
                    ready.push(path.clone());
                }
                Ok(Preparation::Skipped { nodes, reason }) => {
                    info!(file = %filename, nodes, "skipped: {}", reason);
                    entries.push(BatchEntry {
                        filename,
                        outcome: Some(FileOutcome::Skipped { reason }),
                        error: None,
                    });
                }
                Err(e) => {
                    warn!(file = %filename, "extraction failed: {}", e);
                    entries.push(BatchEntry {
                        filename,
                        outcome: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }
        info!(
            ready = ready.len(),
            total = files.len(),
            "phase 1 finished in {:.2}s",
            phase1.elapsed().as_secs_f64()
        );

        // Phase 2
        let phase2 = Instant::now();
        let mut timings = Vec::with_capacity(ready.len());
        for path in &ready {
            let filename = file_name(path);
            let (feature_time, nodes) = match extraction.get(&filename) {
                Some(&(secs, nodes)) => (Some(secs), nodes),
                None => (None, 0),
            };

            let result = self.pipeline.prepare_cached(path).and_then(|prep| match prep {
                Preparation::Ready(prepared) => self.pipeline.finish(path, &prepared, out_dir),
                Preparation::Skipped { reason, .. } => Ok(FileOutcome::Skipped { reason }),
            });

            match result {
                Ok(outcome) => {
                    let train_time = match &outcome {
                        FileOutcome::Ranked { train_secs, .. } => Some(*train_secs),
                        FileOutcome::Skipped { .. } => None,
                    };
                    timings.push(TimingRecord {
                        filename: filename.clone(),
                        nodes,
                        mode: VERSION_TAG.to_string(),
                        feature_time,
                        train_time,
                        success: outcome.is_ranked(),
                    });
                    entries.push(BatchEntry {
                        filename,
                        outcome: Some(outcome),
                        error: None,
                    });
                }
                Err(e) => {
                    warn!(file = %filename, "training failed: {}", e);
                    timings.push(TimingRecord {
                        filename: filename.clone(),
                        nodes,
                        mode: VERSION_TAG.to_string(),
                        feature_time,
                        train_time: None,
                        success: false,
                    });
                    entries.push(BatchEntry {
                        filename,
                        outcome: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }
        info!(
            trained = timings.iter().filter(|t| t.success).count(),
            "phase 2 finished in {:.2}s",
            phase2.elapsed().as_secs_f64()
        );

        entries.sort_by(|a, b| a.filename.cmp(&b.filename));
        let report_path = match write_timing_report(&out_dir.join(TIMING_REPORT_FILE), &timings) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("failed to write timing report: {}", e);
                None
            }
        };

        Ok(BatchSummary {
            entries,
            timings,
            report_path,
        })
    }
}

fn is_netlist(path: &Path) -> bool {
    let is_v = path.extension().is_some_and(|ext| ext == "v");
    let is_testbench = path
        .file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with("tb_"));
    is_v && !is_testbench
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Write the timing CSV atomically
pub fn write_timing_report(path: &Path, records: &[TimingRecord]) -> std::io::Result<PathBuf> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(render_timing_report(records).as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(path.to_path_buf())
}

/// CSV text: header plus one row per record, times to 4 decimals, blank when unknown
pub fn render_timing_report(records: &[TimingRecord]) -> String {
    let secs = |t: Option<f64>| t.map(|t| format!("{t:.4}")).unwrap_or_default();

    let mut out = TIMING_COLUMNS.join(",");
    out.push('\n');
    for r in records {
        let row = [
            csv_field(&r.filename),
            r.nodes.to_string(),
            csv_field(&r.mode),
            secs(r.feature_time),
            secs(r.train_time),
            secs(r.total_time()),
            r.success.to_string(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

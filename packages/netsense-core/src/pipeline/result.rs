//! Pipeline result types

use serde::Serialize;
use std::path::PathBuf;

use crate::features::netlist_graph::NetlistGraph;
use crate::features::structural::FeatureTable;

/// Graph and features ready for training
#[derive(Debug, Clone)]
pub struct PreparedFile {
    pub graph: NetlistGraph,
    pub features: FeatureTable,
    /// Extraction time; on a cache hit, the time recorded when it was stored
    pub feature_secs: f64,
    pub cache_hit: bool,
}

/// Outcome of the parse/extract half
#[derive(Debug, Clone)]
pub enum Preparation {
    Ready(PreparedFile),
    Skipped { nodes: usize, reason: String },
}

/// Outcome of one file run end to end
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Ranked {
        nodes: usize,
        ranking_path: PathBuf,
        feature_secs: f64,
        train_secs: f64,
        cache_hit: bool,
    },
    Skipped {
        reason: String,
    },
}

impl FileOutcome {
    pub fn is_ranked(&self) -> bool {
        matches!(self, FileOutcome::Ranked { .. })
    }
}

/// One row of the batch timing report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingRecord {
    pub filename: String,
    pub nodes: usize,
    pub mode: String,
    pub feature_time: Option<f64>,
    pub train_time: Option<f64>,
    pub success: bool,
}

impl TimingRecord {
    /// Feature plus training time; training alone when extraction time is unknown
    pub fn total_time(&self) -> Option<f64> {
        match (self.feature_time, self.train_time) {
            (Some(f), Some(t)) => Some(f + t),
            (None, Some(t)) => Some(t),
            _ => None,
        }
    }
}

/// Per-file status in a batch run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntry {
    pub filename: String,
    pub outcome: Option<FileOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a batch run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub entries: Vec<BatchEntry>,
    pub timings: Vec<TimingRecord>,
    pub report_path: Option<PathBuf>,
}

impl BatchSummary {
    pub fn ranked(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome.as_ref().is_some_and(FileOutcome::is_ranked))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, Some(FileOutcome::Skipped { .. })))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.entries.iter().filter(|e| e.error.is_some()).count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

//! Pipeline orchestration
//!
//! [`SensitivityPipeline`] chains the feature modules for one netlist;
//! [`BatchRunner`] drives it over a directory in two phases and writes the
//! timing report.

pub mod batch;
pub mod result;
pub mod runner;

pub use batch::{render_timing_report, write_timing_report, BatchRunner, TIMING_REPORT_FILE};
pub use result::{
    BatchEntry, BatchSummary, FileOutcome, Preparation, PreparedFile, TimingRecord,
};
pub use runner::{base_name, SensitivityPipeline, MIN_NODES, VERSION_TAG};

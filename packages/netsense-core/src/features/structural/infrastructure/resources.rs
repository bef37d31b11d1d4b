//! Adaptive worker sizing from host memory
//!
//! ```text
//! per_worker = max(100, N * 0.002) MB   (distance phase)
//!            = max(50,  N * 0.001) MB   (node feature phase)
//! reserved   = max(2000 MB, 20% of total)
//! workers    = min(max(1, (available - reserved) / per_worker), default)
//! ```

use std::fs;
use tracing::debug;

use crate::config::ExtractionConfig;

/// Which extraction phase the pool is being sized for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadKind {
    Distance,
    NodeFeatures,
}

impl WorkloadKind {
    fn per_worker_mb(self, n_nodes: usize) -> f64 {
        let n = n_nodes as f64;
        match self {
            WorkloadKind::Distance => (n * 0.002).max(100.0),
            WorkloadKind::NodeFeatures => (n * 0.001).max(50.0),
        }
    }
}

/// Host memory in megabytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySnapshot {
    pub available_mb: u64,
    pub total_mb: u64,
}

impl MemorySnapshot {
    /// Read `/proc/meminfo`; `None` where it is unavailable
    pub fn probe() -> Option<Self> {
        let text = fs::read_to_string("/proc/meminfo").ok()?;
        Self::parse_meminfo(&text)
    }

    /// Configured overrides take precedence over the probe
    pub fn resolve(cfg: &ExtractionConfig) -> Option<Self> {
        match (cfg.available_memory_mb, cfg.total_memory_mb) {
            (Some(available_mb), Some(total_mb)) => Some(Self {
                available_mb,
                total_mb,
            }),
            (available, total) => {
                let probed = Self::probe()?;
                Some(Self {
                    available_mb: available.unwrap_or(probed.available_mb),
                    total_mb: total.unwrap_or(probed.total_mb),
                })
            }
        }
    }

    fn parse_meminfo(text: &str) -> Option<Self> {
        let field_kb = |key: &str| -> Option<u64> {
            text.lines()
                .find(|line| line.starts_with(key))?
                .split_whitespace()
                .nth(1)?
                .parse()
                .ok()
        };
        Some(Self {
            available_mb: field_kb("MemAvailable:")? / 1024,
            total_mb: field_kb("MemTotal:")? / 1024,
        })
    }
}

/// `max(1, cpus - 2)`
pub fn default_workers() -> usize {
    num_cpus::get().saturating_sub(2).max(1)
}

/// Worker count bounded by memory headroom and the default
pub fn adaptive_workers(
    n_nodes: usize,
    kind: WorkloadKind,
    snapshot: Option<MemorySnapshot>,
    default: usize,
) -> usize {
    let default = default.max(1);
    let Some(mem) = snapshot else {
        return default;
    };

    let reserved = (mem.total_mb / 5).max(2000);
    let usable = mem.available_mb.saturating_sub(reserved) as f64;
    let by_memory = ((usable / kind.per_worker_mb(n_nodes)) as usize).max(1);
    let workers = by_memory.min(default);

    debug!(
        n_nodes,
        ?kind,
        available_mb = mem.available_mb,
        workers,
        "adaptive worker count"
    );
    workers
}

/*
 * Netsense Core - Unsupervised Netlist Sensitivity Ranking
 *
 * Feature-First Architecture:
 * - features/netlist_graph : gate-level netlist → directed graph
 * - features/structural    : 12 normalized per-node features
 * - features/feature_cache : persisted (graph, features)
 * - features/encoder       : GIN + DGI embeddings, degrade chain
 * - features/fusion        : weighted score, eligibility, ranking file
 * - pipeline/              : per-file and batch orchestration
 *
 * Performance:
 * - Rayon work-stealing for centralities and local metrics
 * - Process workers for large graphs
 */

// Crate-level lint configuration
#![allow(clippy::too_many_arguments)] // Training entry points carry many hyper-parameters
#![allow(clippy::type_complexity)] // Tuple batches in worker jobs
#![allow(clippy::needless_range_loop)] // Range loop for indexing
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared utilities
pub mod shared;

/// Feature modules (builder → extractor → cache → encoder → fusion)
pub mod features;

/// Pipeline orchestration
pub mod pipeline;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::EngineConfig;
pub use errors::{NetsenseError, Result};
pub use pipeline::{BatchRunner, BatchSummary, FileOutcome, SensitivityPipeline};

// ═══════════════════════════════════════════════════════════════════════════
// Rayon Thread Pool
// ═══════════════════════════════════════════════════════════════════════════

/// Initialize the global Rayon pool (75% of cores). Later calls are no-ops.
pub fn init_rayon() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let num_cpus = num_cpus::get();
        let threads = std::cmp::max(1, (num_cpus * 3) / 4);

        match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            Ok(()) => tracing::debug!("rayon pool: {} threads (75% of {})", threads, num_cpus),
            Err(e) => tracing::warn!("rayon pool already initialized: {}", e),
        }
    });
}

//! Structural Feature Extractor
//!
//! ```text
//! NetlistGraph
//!     │
//!     ├── PageRank / Betweenness / Eigenvector   (global, rayon)
//!     ├── multi-source BFS → dist_min            (global, O(N + E))
//!     └── WorkerPool                              (batched per node)
//!           dist_avg · reconvergence · near_ff · depth
//!     │
//!     ▼
//! RawMetrics ──normalize──▶ FeatureTable (N × 12, [0,1])
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::StructuralExtractor;
pub use domain::{FeatureTable, RawMetrics, StructuralFeature, FEATURE_COUNT};

#[doc(hidden)]
pub use infrastructure::{run_worker, WorkerError, WorkerJob, WorkerReply};

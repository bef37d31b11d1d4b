//! Structural metric engines and the batch worker pool

pub mod betweenness;
pub mod distance;
pub mod eigenvector;
pub mod local_metrics;
pub mod pagerank;
pub mod resources;
pub mod worker_pool;
pub mod worker_protocol;

pub use betweenness::{pivot_count, BetweennessEstimator};
pub use distance::{average_distance, multi_source_distances};
pub use eigenvector::EigenvectorCentrality;
pub use local_metrics::{compute_batch, depth_cap, LocalRow};
pub use pagerank::{PageRankEngine, PageRankSettings};
pub use resources::{adaptive_workers, default_workers, MemorySnapshot, WorkloadKind};
pub use worker_pool::{node_batches, PoolMode, WorkerPool};
pub use worker_protocol::{
    read_frame, run_worker, write_frame, WorkerError, WorkerJob, WorkerReply, WorkerResult,
    PROTOCOL_VERSION,
};

//! Feature Cache
//!
//! Persists (graph, features) per netlist keyed by
//! `(base name, version tag, content hash)`. A hit rebuilds the graph from
//! its compact record, so the parser and extractor are skipped entirely.

mod disk_cache;
mod error;
mod fingerprint;
mod types;

pub use disk_cache::FeatureCache;
pub use error::{CacheError, CacheResult};
pub use fingerprint::{ContentHash, HASH_HEAD_BYTES};
pub use types::{CacheKey, CacheRecord, CachedFeatures, CACHE_VERSION};

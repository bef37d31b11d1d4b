//! Disk-backed feature cache
//!
//! One msgpack file per key under the cache directory. Writes go to a
//! temporary file in the same directory and are renamed into place, so a
//! reader never observes a partial record. Every failure is a miss.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::error::{CacheError, CacheResult};
use super::types::{CacheKey, CacheRecord, CachedFeatures};
use crate::config::CacheConfig;

/// Persistent feature cache
pub struct FeatureCache {
    dir: PathBuf,
    read_enabled: bool,
}

impl FeatureCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            dir: config.cache_dir.clone(),
            read_enabled: config.enabled,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Look up a record; `None` on any miss or failure, or when reads are
    /// disabled
    pub fn load(&self, key: &CacheKey) -> Option<CachedFeatures> {
        if !self.read_enabled {
            return None;
        }
        self.load_entry(key)
    }

    /// Look up a record regardless of the read switch.
    ///
    /// Used to pick up an entry this run has just stored.
    pub fn load_entry(&self, key: &CacheKey) -> Option<CachedFeatures> {
        match self.try_load(key) {
            Ok(hit) => {
                debug!(key = %key.file_name(), nodes = hit.graph.node_count(), "feature cache hit");
                Some(hit)
            }
            Err(CacheError::NotFound) => {
                debug!(key = %key.file_name(), "feature cache miss");
                None
            }
            Err(e) => {
                warn!(key = %key.file_name(), "ignoring unreadable cache entry: {}", e);
                None
            }
        }
    }

    /// Persist a record atomically; failures are logged and dropped
    pub fn store(&self, key: &CacheKey, record: &CacheRecord) {
        match self.try_store(key, record) {
            Ok(path) => debug!(path = %path.display(), "feature cache stored"),
            Err(e) => warn!(key = %key.file_name(), "failed to store cache entry: {}", e),
        }
    }

    fn try_load(&self, key: &CacheKey) -> CacheResult<CachedFeatures> {
        let path = key.path_in(&self.dir);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(CacheError::NotFound),
            Err(e) => return Err(e.into()),
        };
        let record: CacheRecord = rmp_serde::from_slice(&bytes)?;
        CachedFeatures::try_from(record)
    }

    fn try_store(&self, key: &CacheKey, record: &CacheRecord) -> CacheResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let bytes = rmp_serde::to_vec(record)?;

        let path = key.path_in(&self.dir);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| CacheError::Io(e.error))?;
        Ok(path)
    }
}

//! Cache keys and records

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::{CacheError, CacheResult};
use super::fingerprint::ContentHash;
use crate::features::netlist_graph::{CompactGraph, NetlistGraph, NodeId};
use crate::features::structural::FeatureTable;

/// On-disk record layout version
pub const CACHE_VERSION: u32 = 3;

/// Identifies one cached extraction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub base: String,
    pub version_tag: String,
    pub hash: ContentHash,
}

impl CacheKey {
    pub fn new(base: impl Into<String>, version_tag: impl Into<String>, hash: ContentHash) -> Self {
        Self {
            base: base.into(),
            version_tag: version_tag.into(),
            hash,
        }
    }

    /// Key for a netlist file: base is the file stem
    pub fn for_file(path: impl AsRef<Path>, version_tag: impl Into<String>) -> Self {
        let path = path.as_ref();
        let base = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(base, version_tag, ContentHash::of_file(path))
    }

    /// `{base}_{version}_{hash}.msgpack`
    pub fn file_name(&self) -> String {
        format!("{}_{}_{}.msgpack", self.base, self.version_tag, self.hash)
    }

    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

/// Serialized cache record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub cache_version: u32,
    pub features: FeatureTable,
    pub output_ids: Vec<NodeId>,
    pub sequential_ids: Vec<NodeId>,
    pub graph: CompactGraph,
    pub compute_time_secs: f64,
}

impl CacheRecord {
    pub fn new(
        graph: &NetlistGraph,
        features: &FeatureTable,
        compute_time_secs: f64,
    ) -> Self {
        Self {
            cache_version: CACHE_VERSION,
            features: features.clone(),
            output_ids: graph.output_ids(),
            sequential_ids: graph.sequential_ids(),
            graph: graph.to_compact(),
            compute_time_secs,
        }
    }
}

/// A cache hit: reconstructed graph plus its features
#[derive(Debug, Clone)]
pub struct CachedFeatures {
    pub graph: NetlistGraph,
    pub features: FeatureTable,
    pub output_ids: Vec<NodeId>,
    pub sequential_ids: Vec<NodeId>,
    pub compute_time_secs: f64,
}

impl TryFrom<CacheRecord> for CachedFeatures {
    type Error = CacheError;

    fn try_from(record: CacheRecord) -> CacheResult<Self> {
        if record.cache_version != CACHE_VERSION {
            return Err(CacheError::VersionMismatch {
                found: record.cache_version,
                expected: CACHE_VERSION,
            });
        }

        let graph = NetlistGraph::from_compact(record.graph)?;
        if record.features.len() != graph.node_count() {
            return Err(CacheError::Corrupted(format!(
                "{} feature rows for {} nodes",
                record.features.len(),
                graph.node_count()
            )));
        }

        Ok(Self {
            graph,
            features: record.features,
            output_ids: record.output_ids,
            sequential_ids: record.sequential_ids,
            compute_time_secs: record.compute_time_secs,
        })
    }
}

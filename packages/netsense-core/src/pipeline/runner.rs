//! Per-file orchestration
//!
//! ```text
//! cache lookup ─hit──────────────────────────────┐
//!      │ miss                                     ▼
//!      └─► parse ─► (N < 2: skip) ─► extract ─► store ─► train ─► fuse ─► write
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use super::result::{FileOutcome, Preparation, PreparedFile};
use crate::config::EngineConfig;
use crate::errors::{NetsenseError, Result};
use crate::features::encoder::{DegradeChain, EncoderInput};
use crate::features::feature_cache::{CacheKey, CacheRecord, CachedFeatures, FeatureCache};
use crate::features::fusion::{ranking_file_name, RankWriter, ScoreFusion};
use crate::features::netlist_graph::NetlistParser;
use crate::features::structural::StructuralExtractor;

/// Tag carried by cache entries and ranking file names
pub const VERSION_TAG: &str = "v1";

/// Graphs smaller than this are skipped
pub const MIN_NODES: usize = 2;

/// Runs one netlist through every stage
pub struct SensitivityPipeline {
    config: EngineConfig,
    top_module: Option<String>,
    parser: NetlistParser,
    extractor: StructuralExtractor,
    cache: FeatureCache,
    fusion: ScoreFusion,
    writer: RankWriter,
}

impl SensitivityPipeline {
    /// Validates the configuration before building stages
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            parser: NetlistParser::new(),
            extractor: StructuralExtractor::new(&config.extraction),
            cache: FeatureCache::new(&config.cache),
            fusion: ScoreFusion::new(config.fusion),
            writer: RankWriter::new(),
            top_module: None,
            config,
        })
    }

    /// Restrict parsing to one module body
    pub fn with_top_module(mut self, top_module: Option<String>) -> Self {
        self.top_module = top_module;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &FeatureCache {
        &self.cache
    }

    /// Cache key of a netlist; a top module narrows the graph, so it joins the tag
    pub fn cache_key(&self, path: &Path) -> CacheKey {
        match &self.top_module {
            Some(module) => CacheKey::for_file(path, format!("{VERSION_TAG}.{module}")),
            None => CacheKey::for_file(path, VERSION_TAG),
        }
    }

    /// Graph and features from the cache, or parsed and extracted afresh
    pub fn prepare(&self, path: &Path) -> Result<Preparation> {
        let key = self.cache_key(path);
        if let Some(hit) = self.cache.load(&key) {
            return Ok(ready_from_cache(hit));
        }
        self.extract_and_store(path, &key)
    }

    /// Like [`prepare`](Self::prepare), but reads an existing entry even
    /// when cache reads are disabled
    pub fn prepare_cached(&self, path: &Path) -> Result<Preparation> {
        let key = self.cache_key(path);
        match self.cache.load_entry(&key) {
            Some(hit) => Ok(ready_from_cache(hit)),
            None => {
                debug!(path = %path.display(), "no cache entry, extracting again");
                self.extract_and_store(path, &key)
            }
        }
    }

    fn extract_and_store(&self, path: &Path, key: &CacheKey) -> Result<Preparation> {
        let parsed = self
            .parser
            .parse_file(path, self.top_module.as_deref())?;
        let graph = parsed.graph;

        let nodes = graph.node_count();
        if nodes < MIN_NODES {
            return Ok(Preparation::Skipped {
                nodes,
                reason: format!("graph has {nodes} node(s), need at least {MIN_NODES}"),
            });
        }

        let start = Instant::now();
        let features = self.extractor.extract(&graph)?;
        let feature_secs = start.elapsed().as_secs_f64();

        self.cache
            .store(key, &CacheRecord::new(&graph, &features, feature_secs));
        debug!(nodes, "features extracted in {:.3}s", feature_secs);

        Ok(Preparation::Ready(PreparedFile {
            graph,
            features,
            feature_secs,
            cache_hit: false,
        }))
    }

    /// Train, fuse and write the ranking; returns the file path and training time
    pub fn rank_prepared(
        &self,
        prepared: &PreparedFile,
        base: &str,
        out_dir: &Path,
    ) -> Result<(PathBuf, f64)> {
        let graph = &prepared.graph;
        let input = EncoderInput::from_graph(graph, &prepared.features);

        let start = Instant::now();
        let chain = DegradeChain::for_graph(&self.config.encoder, graph.node_count());
        let embeddings = chain.train(&input)?;
        let train_secs = start.elapsed().as_secs_f64();

        let ranking = self.fusion.rank(graph, &prepared.features, &embeddings)?;
        std::fs::create_dir_all(out_dir)?;
        let path = self
            .writer
            .write(out_dir.join(ranking_file_name(base, VERSION_TAG)), &ranking)?;

        info!(
            base,
            signals = ranking.len(),
            "ranking written to {} (training {:.2}s)",
            path.display(),
            train_secs
        );
        Ok((path, train_secs))
    }

    /// Run one netlist end to end
    pub fn run_file(&self, path: impl AsRef<Path>, out_dir: impl AsRef<Path>) -> Result<FileOutcome> {
        let path = path.as_ref();
        let prepared = match self.prepare(path)? {
            Preparation::Ready(prepared) => prepared,
            Preparation::Skipped { reason, .. } => {
                info!(path = %path.display(), "skipped: {}", reason);
                return Ok(FileOutcome::Skipped { reason });
            }
        };
        self.finish(path, &prepared, out_dir.as_ref())
    }

    pub(crate) fn finish(
        &self,
        path: &Path,
        prepared: &PreparedFile,
        out_dir: &Path,
    ) -> Result<FileOutcome> {
        let base = base_name(path)?;
        let (ranking_path, train_secs) = self.rank_prepared(prepared, &base, out_dir)?;
        Ok(FileOutcome::Ranked {
            nodes: prepared.graph.node_count(),
            ranking_path,
            feature_secs: prepared.feature_secs,
            train_secs,
            cache_hit: prepared.cache_hit,
        })
    }
}

fn ready_from_cache(hit: CachedFeatures) -> Preparation {
    Preparation::Ready(PreparedFile {
        graph: hit.graph,
        features: hit.features,
        feature_secs: hit.compute_time_secs,
        cache_hit: true,
    })
}

/// File stem used in cache keys and output names
pub fn base_name(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| NetsenseError::pipeline(format!("no file name in {}", path.display())))
}

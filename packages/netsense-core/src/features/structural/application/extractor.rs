//! Structural feature extraction use case

use std::time::Instant;
use tracing::{debug, info};

use crate::config::ExtractionConfig;
use crate::errors::{NetsenseError, Result};
use crate::features::netlist_graph::NetlistGraph;
use crate::features::structural::domain::{FeatureTable, RawMetrics};
use crate::features::structural::infrastructure::{
    adaptive_workers, default_workers, depth_cap, multi_source_distances, BetweennessEstimator,
    EigenvectorCentrality, MemorySnapshot, PageRankEngine, PageRankSettings, PoolMode, WorkerPool,
    WorkloadKind,
};

/// Computes the normalized 12-feature table of a graph
pub struct StructuralExtractor {
    config: ExtractionConfig,
}

impl StructuralExtractor {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Extract every feature; rows are indexed by node id
    pub fn extract(&self, graph: &NetlistGraph) -> Result<FeatureTable> {
        let n = graph.node_count();
        if n == 0 {
            return Ok(FeatureTable::default());
        }
        let start = Instant::now();

        // Global metrics
        let ((pagerank, betweenness), eigenvector) = rayon::join(
            || {
                rayon::join(
                    || PageRankEngine::new(&PageRankSettings::from(&self.config)).compute(graph),
                    || BetweennessEstimator::new(self.config.seed).compute(graph),
                )
            },
            || {
                EigenvectorCentrality::new(
                    self.config.eigen_max_iterations,
                    self.config.eigen_tolerance,
                )
                .compute(graph)
            },
        );
        debug!("global centralities in {:.3}s", start.elapsed().as_secs_f64());

        let dist_min = multi_source_distances(graph, &graph.output_ids());

        // Local metrics, batched
        let local_start = Instant::now();
        let (pool, mode) = self.worker_pool(n);
        let rows = pool
            .run(graph, &dist_min, depth_cap(n), mode)
            .map_err(|e| NetsenseError::extraction(e.to_string()))?;
        if rows.len() != n {
            return Err(NetsenseError::extraction(format!(
                "local metrics produced {} rows for {} nodes",
                rows.len(),
                n
            )));
        }
        debug!(
            workers = pool.workers(),
            ?mode,
            "local metrics in {:.3}s",
            local_start.elapsed().as_secs_f64()
        );

        let mut raw = RawMetrics {
            in_degree: graph.node_ids().map(|v| graph.in_degree(v) as f64).collect(),
            out_degree: graph.node_ids().map(|v| graph.out_degree(v) as f64).collect(),
            pagerank,
            betweenness,
            eigenvector,
            dist_min: dist_min.iter().map(|&d| d as f64).collect(),
            name_length: graph
                .node_ids()
                .map(|v| graph.name(v).chars().count() as f64)
                .collect(),
            is_output: graph
                .node_ids()
                .map(|v| if graph.is_output(v) { 1.0 } else { 0.0 })
                .collect(),
            ..Default::default()
        };
        for row in rows {
            raw.dist_avg.push(row.dist_avg);
            raw.reconvergence.push(row.reconvergence);
            raw.near_flip_flop.push(row.near_flip_flop);
            raw.depth.push(row.depth);
        }

        let table = raw.normalize();
        info!(
            nodes = n,
            edges = graph.edge_count(),
            "structural features extracted in {:.3}s",
            start.elapsed().as_secs_f64()
        );
        Ok(table)
    }

    fn worker_pool(&self, n: usize) -> (WorkerPool, PoolMode) {
        let mode = pool_mode(n, self.config.small_scale_threshold);
        let workers = match self.config.workers {
            0 => adaptive_workers(
                n,
                workload_for(mode),
                MemorySnapshot::resolve(&self.config),
                default_workers(),
            ),
            fixed => fixed,
        };
        (
            WorkerPool::new(workers, self.config.worker_program.clone()),
            mode,
        )
    }
}

fn pool_mode(n: usize, small_scale_threshold: usize) -> PoolMode {
    if n >= small_scale_threshold {
        PoolMode::Processes
    } else {
        PoolMode::Threads
    }
}

/// Process pools take the distance memory profile
fn workload_for(mode: PoolMode) -> WorkloadKind {
    match mode {
        PoolMode::Processes => WorkloadKind::Distance,
        PoolMode::Threads => WorkloadKind::NodeFeatures,
    }
}

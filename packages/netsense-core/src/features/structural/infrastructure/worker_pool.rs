//! Batch executor for the local metric passes
//!
//! Nodes are split into contiguous batches of `max(1, N / workers)`. Small
//! graphs run the batches on a rayon pool sharing the graph by reference.
//! Large graphs ship a [`CompactGraph`] to child processes running the
//! hidden `worker` subcommand; any spawn or protocol failure falls back to
//! the thread path.
//!
//! Either way rows come back in node order and every batch has joined
//! before the caller sees them.

use rayon::prelude::*;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use tracing::{debug, info, warn};

use super::local_metrics::{compute_batch, LocalRow};
use super::worker_protocol::{read_frame, write_frame, WorkerError, WorkerJob, WorkerReply, WorkerResult};
use crate::features::netlist_graph::{NetlistGraph, NodeId};

/// Execution backend for one extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolMode {
    Threads,
    Processes,
}

/// Contiguous half-open node ranges covering `0..n`
pub fn node_batches(n: usize, workers: usize) -> Vec<(NodeId, NodeId)> {
    let size = (n / workers.max(1)).max(1);
    (0..n)
        .step_by(size)
        .map(|start| (start as NodeId, (start + size).min(n) as NodeId))
        .collect()
}

/// Worker pool for batchable metrics
pub struct WorkerPool {
    workers: usize,
    worker_program: Option<PathBuf>,
}

impl WorkerPool {
    pub fn new(workers: usize, worker_program: Option<PathBuf>) -> Self {
        Self {
            workers: workers.max(1),
            worker_program,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Compute local rows for every node, falling back to threads on
    /// process failure
    pub fn run(
        &self,
        graph: &NetlistGraph,
        dist_min: &[u32],
        depth_cap: usize,
        mode: PoolMode,
    ) -> WorkerResult<Vec<LocalRow>> {
        let batches = node_batches(graph.node_count(), self.workers);
        debug!(
            ?mode,
            workers = self.workers,
            batches = batches.len(),
            "dispatching local metric batches"
        );

        if mode == PoolMode::Processes {
            match self.run_processes(graph, dist_min, &batches, depth_cap) {
                Ok(rows) => return Ok(rows),
                Err(e) => warn!("process workers failed ({}), falling back to threads", e),
            }
        }
        self.run_threads(graph, dist_min, &batches, depth_cap)
    }

    fn run_threads(
        &self,
        graph: &NetlistGraph,
        dist_min: &[u32],
        batches: &[(NodeId, NodeId)],
        depth_cap: usize,
    ) -> WorkerResult<Vec<LocalRow>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| WorkerError::Failed(e.to_string()))?;

        let per_batch: Vec<Vec<LocalRow>> = pool.install(|| {
            batches
                .par_iter()
                .map(|&(start, end)| compute_batch(graph, dist_min, start..end, depth_cap))
                .collect()
        });
        Ok(per_batch.into_iter().flatten().collect())
    }

    fn run_processes(
        &self,
        graph: &NetlistGraph,
        dist_min: &[u32],
        batches: &[(NodeId, NodeId)],
        depth_cap: usize,
    ) -> WorkerResult<Vec<LocalRow>> {
        let program = self
            .worker_program
            .as_ref()
            .ok_or_else(|| WorkerError::Failed("no worker program configured".to_string()))?;

        let compact = graph.to_compact();
        let per_child = batches.len().div_ceil(self.workers).max(1);
        info!(
            program = %program.display(),
            children = batches.len().div_ceil(per_child),
            "spawning feature workers"
        );

        let mut children: Vec<Child> = Vec::new();
        for group in batches.chunks(per_child) {
            let mut child = match Command::new(program)
                .arg("worker")
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::inherit())
                .spawn()
            {
                Ok(child) => child,
                Err(e) => {
                    reap(children);
                    return Err(e.into());
                }
            };

            let job = WorkerJob::new(compact.clone(), dist_min.to_vec(), group.to_vec(), depth_cap);
            let sent = match child.stdin.take() {
                Some(mut stdin) => write_frame(&mut stdin, &job),
                None => Err(WorkerError::Failed("worker stdin unavailable".to_string())),
            };
            children.push(child);
            if let Err(e) = sent {
                reap(children);
                return Err(e);
            }
        }

        let mut rows = Vec::with_capacity(graph.node_count());
        let mut pending = children.into_iter();
        while let Some(mut child) = pending.next() {
            let reply: WorkerResult<WorkerReply> = match child.stdout.as_mut() {
                Some(stdout) => read_frame(stdout),
                None => Err(WorkerError::Failed("worker stdout unavailable".to_string())),
            };
            let status = child.wait()?;
            match reply {
                Ok(reply) if status.success() => rows.extend(reply.rows),
                Ok(_) => {
                    reap(pending.collect());
                    return Err(WorkerError::Failed(format!("worker exited with {status}")));
                }
                Err(e) => {
                    reap(pending.collect());
                    return Err(e);
                }
            }
        }

        if rows.len() != graph.node_count() {
            return Err(WorkerError::Failed(format!(
                "workers returned {} rows for {} nodes",
                rows.len(),
                graph.node_count()
            )));
        }
        Ok(rows)
    }
}

/// Kill and wait for children that are no longer needed
fn reap(children: Vec<Child>) {
    for mut child in children {
        let _ = child.kill();
        let _ = child.wait();
    }
}

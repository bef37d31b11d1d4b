//! Worker subprocess protocol
//!
//! Implements framing protocol: `[u32_le length][msgpack body]`
//!
//! A worker reads exactly one [`WorkerJob`] frame from its input, rebuilds
//! the graph from the compact record, computes the local metrics of every
//! batch it was given, and writes exactly one [`WorkerReply`] frame.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use thiserror::Error;
use tracing::debug;

use super::local_metrics::{compute_batch, LocalRow};
use crate::features::netlist_graph::{CompactGraph, GraphError, NetlistGraph, NodeId};

/// Bumped whenever [`WorkerJob`] or [`WorkerReply`] change shape
pub const PROTOCOL_VERSION: u32 = 1;

/// Frames larger than this are rejected before allocation
const MAX_FRAME_BYTES: u32 = 1 << 31;

/// Worker protocol errors
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("Frame of {0} bytes exceeds limit")]
    FrameTooLarge(u64),

    #[error("Protocol version mismatch: expected {expected}, got {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Invalid graph: {0}")]
    Graph(#[from] GraphError),

    #[error("Worker failed: {0}")]
    Failed(String),
}

pub type WorkerResult<T> = Result<T, WorkerError>;

/// One unit of work for a worker process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerJob {
    pub protocol_version: u32,
    pub graph: CompactGraph,
    pub dist_min: Vec<u32>,
    /// Half-open node ranges `[start, end)`
    pub batches: Vec<(NodeId, NodeId)>,
    pub depth_cap: usize,
}

impl WorkerJob {
    pub fn new(
        graph: CompactGraph,
        dist_min: Vec<u32>,
        batches: Vec<(NodeId, NodeId)>,
        depth_cap: usize,
    ) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            graph,
            dist_min,
            batches,
            depth_cap,
        }
    }
}

/// Rows for every node of every batch, in batch order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerReply {
    pub rows: Vec<LocalRow>,
}

/// Write one length-prefixed msgpack frame
pub fn write_frame<W: Write, T: Serialize>(writer: &mut W, value: &T) -> WorkerResult<()> {
    let body = rmp_serde::to_vec(value)?;
    if body.len() as u64 > MAX_FRAME_BYTES as u64 {
        return Err(WorkerError::FrameTooLarge(body.len() as u64));
    }
    writer.write_u32::<LittleEndian>(body.len() as u32)?;
    writer.write_all(&body)?;
    writer.flush()?;
    Ok(())
}

/// Read one length-prefixed msgpack frame
pub fn read_frame<R: Read, T: DeserializeOwned>(reader: &mut R) -> WorkerResult<T> {
    let len = reader.read_u32::<LittleEndian>()?;
    if len > MAX_FRAME_BYTES {
        return Err(WorkerError::FrameTooLarge(len as u64));
    }
    let mut body = vec![0u8; len as usize];
    reader.read_exact(&mut body)?;
    Ok(rmp_serde::from_slice(&body)?)
}

/// Worker entry point: one job in, one reply out
pub fn run_worker<R: Read, W: Write>(input: &mut R, output: &mut W) -> WorkerResult<()> {
    let job: WorkerJob = read_frame(input)?;
    if job.protocol_version != PROTOCOL_VERSION {
        return Err(WorkerError::VersionMismatch {
            expected: PROTOCOL_VERSION,
            found: job.protocol_version,
        });
    }

    let graph = NetlistGraph::from_compact(job.graph)?;
    if job.dist_min.len() != graph.node_count() {
        return Err(WorkerError::Failed(format!(
            "dist_min has {} entries for {} nodes",
            job.dist_min.len(),
            graph.node_count()
        )));
    }

    let n = graph.node_count() as NodeId;
    let mut rows = Vec::new();
    for &(start, end) in &job.batches {
        if start > end || end > n {
            return Err(WorkerError::Failed(format!(
                "batch {start}..{end} outside 0..{n}"
            )));
        }
        rows.extend(compute_batch(&graph, &job.dist_min, start..end, job.depth_cap));
    }
    debug!(batches = job.batches.len(), rows = rows.len(), "worker finished");

    write_frame(output, &WorkerReply { rows })
}

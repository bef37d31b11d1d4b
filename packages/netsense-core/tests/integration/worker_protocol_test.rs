//! Worker protocol tests
//!
//! Frames a job through `run_worker` in memory and through the real
//! `netsense worker` subprocess.

#[path = "../common/mod.rs"]
mod common;
use common::*;

use netsense_core::features::netlist_graph::NetlistParser;
use netsense_core::features::structural::infrastructure::{
    compute_batch, depth_cap, multi_source_distances, read_frame, run_worker, write_frame,
    PoolMode, WorkerError, WorkerJob, WorkerPool, WorkerReply,
};
use pretty_assertions::assert_eq;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

fn chain_job() -> (WorkerJob, WorkerReply) {
    let graph = NetlistParser::new()
        .parse(&fixture_inverter_chain(12), None)
        .unwrap()
        .graph;
    let dist = multi_source_distances(&graph, &graph.output_ids());
    let cap = depth_cap(graph.node_count());
    let n = graph.node_count() as u32;

    let expected = WorkerReply {
        rows: compute_batch(&graph, &dist, 0..n, cap),
    };
    let job = WorkerJob::new(graph.to_compact(), dist, vec![(0, n / 2), (n / 2, n)], cap);
    (job, expected)
}

#[test]
fn in_memory_round_trip() {
    let (job, expected) = chain_job();

    let mut input = Vec::new();
    write_frame(&mut input, &job).unwrap();
    let mut output = Vec::new();
    run_worker(&mut Cursor::new(input), &mut output).unwrap();

    let reply: WorkerReply = read_frame(&mut Cursor::new(output)).unwrap();
    assert_eq!(reply.rows, expected.rows);
}

#[test]
fn out_of_range_batch_rejected() {
    let (mut job, _) = chain_job();
    job.batches = vec![(0, 10_000)];

    let mut input = Vec::new();
    write_frame(&mut input, &job).unwrap();
    let err = run_worker(&mut Cursor::new(input), &mut Vec::new()).unwrap_err();
    assert!(matches!(err, WorkerError::Failed(_)));
}

#[test]
fn subprocess_worker_round_trip() {
    let (job, expected) = chain_job();

    let mut child = Command::new(env!("CARGO_BIN_EXE_netsense"))
        .arg("worker")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    {
        let mut stdin = child.stdin.take().unwrap();
        write_frame(&mut stdin, &job).unwrap();
        stdin.flush().unwrap();
    }
    let reply: WorkerReply = read_frame(child.stdout.as_mut().unwrap()).unwrap();
    assert!(child.wait().unwrap().success());
    assert_eq!(reply.rows, expected.rows);
}

#[test]
fn pool_uses_subprocesses() {
    let graph = NetlistParser::new()
        .parse(&fixture_inverter_chain(30), None)
        .unwrap()
        .graph;
    let dist = multi_source_distances(&graph, &graph.output_ids());
    let cap = depth_cap(graph.node_count());

    let pool = WorkerPool::new(3, Some(PathBuf::from(env!("CARGO_BIN_EXE_netsense"))));
    let processes = pool.run(&graph, &dist, cap, PoolMode::Processes).unwrap();
    let threads = pool.run(&graph, &dist, cap, PoolMode::Threads).unwrap();
    assert_eq!(processes, threads);
}

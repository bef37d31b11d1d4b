//! Tier 2: sampled-subgraph DGI training
//!
//! Each epoch trains one step on a sorted uniform sample of
//! `min(sample_batch_size, N/2)` nodes and the edges induced among them.
//! Inference walks contiguous chunks of `min(inference_chunk, N)` nodes,
//! keeping only intra-chunk edges. The preferred device is tried first and
//! the host second.

use candle_core::{Device, Tensor};
use rand::seq::index::sample;
use tracing::{debug, warn};

use super::strategy::{
    check_budget, estimate_step_mb, input_rows, permutation, seeded_rng, to_embeddings,
    EncoderStrategy,
};
use crate::config::EncoderConfig;
use crate::features::encoder::domain::{Embeddings, EncoderInput, TrainError, TrainResult};
use crate::features::encoder::infrastructure::{
    device_label, is_accelerator, Adam, Discriminator, EdgeIndex, GinEncoder, Mode,
};
use crate::features::netlist_graph::NodeId;

/// Mini-batch trainer over induced subgraphs
pub struct SampledSubgraphStrategy {
    config: EncoderConfig,
    device: Device,
}

impl SampledSubgraphStrategy {
    pub fn new(config: &EncoderConfig, device: Device) -> Self {
        Self {
            config: config.clone(),
            device,
        }
    }

    fn sample_size(&self, n: usize) -> usize {
        self.config.sample_batch_size.min(n / 2).max(1).min(n)
    }

    fn train_on(&self, input: &EncoderInput, device: &Device) -> TrainResult<Embeddings> {
        let cfg = &self.config;
        let n = input.n_nodes();
        let k = self.sample_size(n);
        let chunk = cfg.inference_chunk.min(n).max(1);
        let avg_degree = input.edges().len() / n.max(1) + 1;
        check_budget(
            self.name(),
            estimate_step_mb(k.max(chunk), k.max(chunk) * avg_degree, input.dim(), cfg.hidden, cfg.layers),
            cfg.memory_budget_mb,
        )?;

        let mut rng = seeded_rng(cfg.seed);
        let mut encoder =
            GinEncoder::new(input.dim(), cfg.hidden, cfg.layers, cfg.dropout, &mut rng, device)?;
        let discriminator = Discriminator::new(cfg.hidden, &mut rng, device)?;
        let mut vars = encoder.vars();
        vars.push(discriminator.var());
        let mut optimizer = Adam::new(vars, cfg.learning_rate)?;

        // slot of each node in the current sample, u32::MAX when absent
        let mut slot = vec![u32::MAX; n];

        for epoch in 0..cfg.epochs {
            let mut nodes: Vec<u32> = sample(&mut rng, n, k).into_iter().map(|i| i as u32).collect();
            nodes.sort_unstable();
            for (i, &v) in nodes.iter().enumerate() {
                slot[v as usize] = i as u32;
            }
            let sub_edges: Vec<(NodeId, NodeId)> = input
                .edges()
                .iter()
                .filter_map(|&(s, d)| {
                    let (ls, ld) = (slot[s as usize], slot[d as usize]);
                    (ls != u32::MAX && ld != u32::MAX).then_some((ls, ld))
                })
                .collect();

            let x = gather_rows(input, &nodes, device)?;
            let edges = EdgeIndex::new(&sub_edges, device)?;

            let corrupted = x.index_select(&permutation(k, &mut rng, device)?, 0)?;
            let h_pos = encoder.forward(&x, &edges, Mode::Train, &mut rng)?;
            let h_neg = encoder.forward(&corrupted, &edges, Mode::Train, &mut rng)?;
            let loss = discriminator.loss(&h_pos, &h_neg)?;
            optimizer.backward_step(&loss)?;

            for &v in &nodes {
                slot[v as usize] = u32::MAX;
            }

            if epoch % 25 == 0 || epoch + 1 == cfg.epochs {
                debug!(
                    epoch,
                    sampled = k,
                    edges = sub_edges.len(),
                    loss = loss.to_scalar::<f32>()?,
                    device = device_label(device),
                    "DGI sampled"
                );
            }
        }

        let mut data = Vec::with_capacity(n * cfg.hidden);
        let mut start = 0;
        while start < n {
            let end = (start + chunk).min(n);
            let local_edges: Vec<(NodeId, NodeId)> = input
                .edges()
                .iter()
                .filter(|&&(s, d)| {
                    let range = start as NodeId..end as NodeId;
                    range.contains(&s) && range.contains(&d)
                })
                .map(|&(s, d)| (s - start as NodeId, d - start as NodeId))
                .collect();

            let x = input_rows(input, start, end, device)?;
            let edges = EdgeIndex::new(&local_edges, device)?;
            let h = encoder.forward(&x, &edges, Mode::Eval, &mut rng)?;
            data.extend_from_slice(to_embeddings(&h)?.as_slice());
            start = end;
        }

        Embeddings::new(n, cfg.hidden, data)
            .ok_or_else(|| TrainError::Other("chunked inference lost rows".to_string()))
    }
}

/// Upload the input rows of `nodes`, in order
fn gather_rows(input: &EncoderInput, nodes: &[u32], device: &Device) -> TrainResult<Tensor> {
    let dim = input.dim();
    let mut rows = Vec::with_capacity(nodes.len() * dim);
    for &v in nodes {
        let v = v as usize;
        rows.extend_from_slice(&input.x()[v * dim..(v + 1) * dim]);
    }
    Ok(Tensor::from_vec(rows, (nodes.len(), dim), device)?)
}

impl EncoderStrategy for SampledSubgraphStrategy {
    fn name(&self) -> &'static str {
        "sampled-subgraph"
    }

    fn train(&self, input: &EncoderInput) -> TrainResult<Embeddings> {
        match self.train_on(input, &self.device) {
            Err(e) if e.is_exhausted() && is_accelerator(&self.device) => {
                warn!("sampled training exhausted the accelerator ({}), retrying on host", e);
                self.train_on(input, &Device::Cpu)
            }
            other => other,
        }
    }
}

//! Training tier abstraction and helpers shared by the tiers

use candle_core::{Device, Tensor};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::features::encoder::domain::{Embeddings, EncoderInput, TrainError, TrainResult};

/// One tier of the degrade chain
pub trait EncoderStrategy: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Train on `input` and return embeddings for every node.
    ///
    /// Running out of memory or device resources must surface as
    /// [`TrainError::ResourceExhausted`] so the chain can move on.
    fn train(&self, input: &EncoderInput) -> TrainResult<Embeddings>;
}

/// Fresh RNG for one training run
pub(crate) fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Random row permutation as an index tensor
pub(crate) fn permutation(n: usize, rng: &mut ChaCha8Rng, device: &Device) -> TrainResult<Tensor> {
    let mut perm: Vec<u32> = (0..n as u32).collect();
    perm.shuffle(rng);
    Ok(Tensor::from_vec(perm, n, device)?)
}

/// Upload rows `[start, end)` of the input matrix
pub(crate) fn input_rows(
    input: &EncoderInput,
    start: usize,
    end: usize,
    device: &Device,
) -> TrainResult<Tensor> {
    let dim = input.dim();
    let rows = input.x()[start * dim..end * dim].to_vec();
    Ok(Tensor::from_vec(rows, (end - start, dim), device)?)
}

/// Copy a `(N, H)` tensor back to host memory
pub(crate) fn to_embeddings(h: &Tensor) -> TrainResult<Embeddings> {
    let (n, dim) = h.dims2()?;
    let data = h.to_device(&Device::Cpu)?.flatten_all()?.to_vec1::<f32>()?;
    Embeddings::new(n, dim, data)
        .ok_or_else(|| TrainError::Other(format!("embedding buffer does not match {n}x{dim}")))
}

/// Rough peak footprint in MB of one training step over `nodes` rows and
/// `edges` messages: activations for the positive and corrupted passes,
/// their gradients, and the input block.
pub fn estimate_step_mb(nodes: usize, edges: usize, in_dim: usize, hidden: usize, layers: usize) -> u64 {
    let per_layer = nodes * hidden * 6 + edges * hidden;
    let floats = nodes * in_dim * 2 + 2 * 2 * layers * per_layer;
    ((floats as u64) * 4).div_ceil(1024 * 1024)
}

/// Fail with exhaustion when `estimate_mb` exceeds the optional budget
pub(crate) fn check_budget(tier: &str, estimate_mb: u64, budget_mb: Option<u64>) -> TrainResult<()> {
    match budget_mb {
        Some(budget) if estimate_mb > budget => Err(TrainError::ResourceExhausted(format!(
            "{tier} needs ~{estimate_mb} MB, budget is {budget} MB"
        ))),
        _ => Ok(()),
    }
}

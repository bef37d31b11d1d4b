//! Deep Graph Infomax objective
//!
//! ```text
//! s    = σ(mean_rows(h_pos))
//! pos  = Σ_j h_pos · (s W)
//! neg  = Σ_j h_neg · (s W)
//! loss = −( mean log(σ(pos) + ε) + mean log(1 − σ(neg) + ε) )
//! ```

use candle_core::{Device, Result, Tensor, Var};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::layers::sigmoid;

const LOG_EPS: f64 = 1e-10;

/// Bias-free bilinear discriminator
pub struct Discriminator {
    weight: Var,
}

impl Discriminator {
    pub fn new(hidden: usize, rng: &mut ChaCha8Rng, device: &Device) -> Result<Self> {
        let bound = 1.0 / (hidden.max(1) as f32).sqrt();
        let data: Vec<f32> = (0..hidden * hidden)
            .map(|_| rng.gen_range(-bound..bound))
            .collect();
        Ok(Self {
            weight: Var::from_tensor(&Tensor::from_vec(data, (hidden, hidden), device)?)?,
        })
    }

    pub fn loss(&self, h_pos: &Tensor, h_neg: &Tensor) -> Result<Tensor> {
        let summary = sigmoid(&h_pos.mean_keepdim(0)?)?;
        let projected = summary.matmul(self.weight.as_tensor())?;
        let pos = h_pos.broadcast_mul(&projected)?.sum(1)?;
        let neg = h_neg.broadcast_mul(&projected)?.sum(1)?;
        contrastive_loss(&pos, &neg)
    }

    pub fn var(&self) -> Var {
        self.weight.clone()
    }
}

/// `−( mean log(σ(pos) + ε) + mean log(1 − σ(neg) + ε) )`
pub fn contrastive_loss(pos: &Tensor, neg: &Tensor) -> Result<Tensor> {
    let real = sigmoid(pos)?.affine(1.0, LOG_EPS)?.log()?.mean_all()?;
    let fake = sigmoid(neg)?
        .affine(-1.0, 1.0 + LOG_EPS)?
        .log()?
        .mean_all()?;
    real.add(&fake)?.neg()
}

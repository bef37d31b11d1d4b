//! Trainable building blocks over candle `Var`s
//!
//! Weights are stored `(in, out)` so a forward pass is `x.matmul(w)`.
//! Initialization draws from `U(-1/sqrt(fan_in), 1/sqrt(fan_in))` using the
//! caller's seeded RNG, so two runs with the same seed build identical
//! models.

use candle_core::{DType, Device, Result, Tensor, Var};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

const BATCH_NORM_EPS: f64 = 1e-5;
const BATCH_NORM_MOMENTUM: f64 = 0.1;

/// Forward mode: training enables dropout and batch statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Train,
    Eval,
}

fn uniform_var(
    rng: &mut ChaCha8Rng,
    shape: (usize, usize),
    fan_in: usize,
    device: &Device,
) -> Result<Var> {
    let bound = 1.0 / (fan_in.max(1) as f32).sqrt();
    let data: Vec<f32> = (0..shape.0 * shape.1)
        .map(|_| rng.gen_range(-bound..bound))
        .collect();
    Var::from_tensor(&Tensor::from_vec(data, shape, device)?)
}

/// `1 / (1 + e^-x)`
pub fn sigmoid(t: &Tensor) -> Result<Tensor> {
    t.neg()?.exp()?.affine(1.0, 1.0)?.recip()
}

/// Inverted dropout with a mask drawn from `rng`
pub fn dropout(h: &Tensor, p: f64, rng: &mut ChaCha8Rng) -> Result<Tensor> {
    if p <= 0.0 {
        return Ok(h.clone());
    }
    let keep = 1.0 - p;
    let scale = (1.0 / keep) as f32;
    let mask: Vec<f32> = (0..h.elem_count())
        .map(|_| if rng.gen::<f64>() < keep { scale } else { 0.0 })
        .collect();
    h.mul(&Tensor::from_vec(mask, h.dims(), h.device())?)
}

/// Fully connected layer with bias
pub struct Linear {
    weight: Var,
    bias: Var,
}

impl Linear {
    pub fn new(in_dim: usize, out_dim: usize, rng: &mut ChaCha8Rng, device: &Device) -> Result<Self> {
        let weight = uniform_var(rng, (in_dim, out_dim), in_dim, device)?;
        let bias = uniform_var(rng, (1, out_dim), in_dim, device)?;
        Ok(Self { weight, bias })
    }

    pub fn forward(&self, x: &Tensor) -> Result<Tensor> {
        x.matmul(self.weight.as_tensor())?
            .broadcast_add(self.bias.as_tensor())
    }

    pub fn vars(&self) -> Vec<Var> {
        vec![self.weight.clone(), self.bias.clone()]
    }
}

/// Batch normalization over rows with running statistics
pub struct BatchNorm {
    gamma: Var,
    beta: Var,
    running_mean: Tensor,
    running_var: Tensor,
}

impl BatchNorm {
    pub fn new(dim: usize, device: &Device) -> Result<Self> {
        Ok(Self {
            gamma: Var::ones((1, dim), DType::F32, device)?,
            beta: Var::zeros((1, dim), DType::F32, device)?,
            running_mean: Tensor::zeros((1, dim), DType::F32, device)?,
            running_var: Tensor::ones((1, dim), DType::F32, device)?,
        })
    }

    pub fn forward(&mut self, x: &Tensor, mode: Mode) -> Result<Tensor> {
        let (mean, var) = match mode {
            Mode::Train => {
                let rows = x.dim(0)?;
                let mean = x.mean_keepdim(0)?;
                let centered = x.broadcast_sub(&mean)?;
                let var = centered.sqr()?.mean_keepdim(0)?;

                let unbiased = if rows > 1 {
                    var.affine(rows as f64 / (rows - 1) as f64, 0.0)?
                } else {
                    var.clone()
                };
                self.running_mean = self
                    .running_mean
                    .affine(1.0 - BATCH_NORM_MOMENTUM, 0.0)?
                    .add(&mean.affine(BATCH_NORM_MOMENTUM, 0.0)?)?
                    .detach();
                self.running_var = self
                    .running_var
                    .affine(1.0 - BATCH_NORM_MOMENTUM, 0.0)?
                    .add(&unbiased.affine(BATCH_NORM_MOMENTUM, 0.0)?)?
                    .detach();
                (mean, var)
            }
            Mode::Eval => (self.running_mean.clone(), self.running_var.clone()),
        };

        let std = var.affine(1.0, BATCH_NORM_EPS)?.sqrt()?;
        x.broadcast_sub(&mean)?
            .broadcast_div(&std)?
            .broadcast_mul(self.gamma.as_tensor())?
            .broadcast_add(self.beta.as_tensor())
    }

    pub fn vars(&self) -> Vec<Var> {
        vec![self.gamma.clone(), self.beta.clone()]
    }
}

/// Linear→ReLU→Linear→ReLU
pub struct Mlp {
    first: Linear,
    second: Linear,
}

impl Mlp {
    pub fn new(in_dim: usize, hidden: usize, rng: &mut ChaCha8Rng, device: &Device) -> Result<Self> {
        Ok(Self {
            first: Linear::new(in_dim, hidden, rng, device)?,
            second: Linear::new(hidden, hidden, rng, device)?,
        })
    }

    pub fn forward(&self, x: &Tensor) -> Result<Tensor> {
        self.second.forward(&self.first.forward(x)?.relu()?)?.relu()
    }

    pub fn vars(&self) -> Vec<Var> {
        let mut vars = self.first.vars();
        vars.extend(self.second.vars());
        vars
    }
}

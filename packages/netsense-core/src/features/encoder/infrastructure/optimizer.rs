//! Adam optimizer for candle `Var`s
//!
//! Plain Adam with bias correction, no weight decay:
//!
//! ```text
//! m = β1·m + (1−β1)·g
//! v = β2·v + (1−β2)·g²
//! θ = θ − lr · m̂ / (sqrt(v̂) + ε)
//! ```

use candle_core::{Result, Tensor, Var};

pub const BETA1: f64 = 0.9;
pub const BETA2: f64 = 0.999;
pub const EPSILON: f64 = 1e-8;

struct TrackedParam {
    var: Var,
    m: Tensor,
    v: Tensor,
}

/// Adam optimizer
pub struct Adam {
    lr: f64,
    params: Vec<TrackedParam>,
    step: usize,
}

impl Adam {
    pub fn new(vars: Vec<Var>, lr: f64) -> Result<Self> {
        let params = vars
            .into_iter()
            .map(|var| {
                let m = var.as_tensor().zeros_like()?;
                let v = var.as_tensor().zeros_like()?;
                Ok(TrackedParam { var, m, v })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { lr, params, step: 0 })
    }

    /// Backpropagate `loss` and update every tracked parameter
    pub fn backward_step(&mut self, loss: &Tensor) -> Result<()> {
        self.step += 1;
        let grads = loss.backward()?;

        let bc1 = 1.0 - BETA1.powi(self.step as i32);
        let bc2 = 1.0 - BETA2.powi(self.step as i32);

        for param in &mut self.params {
            let Some(grad) = grads.get(param.var.as_tensor()) else {
                continue;
            };

            param.m = param
                .m
                .affine(BETA1, 0.0)?
                .add(&grad.affine(1.0 - BETA1, 0.0)?)?
                .detach();
            param.v = param
                .v
                .affine(BETA2, 0.0)?
                .add(&grad.sqr()?.affine(1.0 - BETA2, 0.0)?)?
                .detach();

            let m_hat = param.m.affine(1.0 / bc1, 0.0)?;
            let denom = param.v.affine(1.0 / bc2, 0.0)?.sqrt()?.affine(1.0, EPSILON)?;
            let update = m_hat.div(&denom)?.affine(-self.lr, 0.0)?;

            let next = param.var.as_tensor().add(&update)?.detach();
            param.var.set(&next)?;
        }
        Ok(())
    }

    pub fn steps(&self) -> usize {
        self.step
    }
}

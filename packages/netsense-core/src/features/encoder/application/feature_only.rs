//! Tier 3: feature-only MLP on the host
//!
//! Ignores edges entirely. Loss:
//! `−mean log σ(Σ h·h) − mean log(1 − σ(Σ h·h_neg))`.

use candle_core::Device;
use tracing::debug;

use super::strategy::{input_rows, permutation, seeded_rng, to_embeddings, EncoderStrategy};
use crate::config::EncoderConfig;
use crate::features::encoder::domain::{Embeddings, EncoderInput, TrainResult};
use crate::features::encoder::infrastructure::{contrastive_loss, Adam, Mlp};

/// Last-resort tier: no message passing, host only
pub struct FeatureOnlyStrategy {
    config: EncoderConfig,
}

impl FeatureOnlyStrategy {
    pub fn new(config: &EncoderConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl EncoderStrategy for FeatureOnlyStrategy {
    fn name(&self) -> &'static str {
        "feature-only"
    }

    fn train(&self, input: &EncoderInput) -> TrainResult<Embeddings> {
        let cfg = &self.config;
        let device = Device::Cpu;
        let n = input.n_nodes();
        let epochs = cfg.epochs.min(cfg.feature_only_max_epochs);

        let mut rng = seeded_rng(cfg.seed);
        let x = input_rows(input, 0, n, &device)?;
        let mlp = Mlp::new(input.dim(), cfg.hidden, &mut rng, &device)?;
        let mut optimizer = Adam::new(mlp.vars(), cfg.learning_rate)?;

        for epoch in 0..epochs {
            let corrupted = x.index_select(&permutation(n, &mut rng, &device)?, 0)?;
            let h = mlp.forward(&x)?;
            let h_neg = mlp.forward(&corrupted)?;
            let pos = h.sqr()?.sum(1)?;
            let neg = h.mul(&h_neg)?.sum(1)?;
            let loss = contrastive_loss(&pos, &neg)?;
            optimizer.backward_step(&loss)?;

            if epoch % 10 == 0 || epoch + 1 == epochs {
                debug!(epoch, loss = loss.to_scalar::<f32>()?, "feature-only MLP");
            }
        }

        to_embeddings(&mlp.forward(&x)?)
    }
}

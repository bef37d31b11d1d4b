//! Tier 1: full-graph DGI training

use candle_core::Device;
use tracing::debug;

use super::strategy::{
    check_budget, estimate_step_mb, input_rows, permutation, seeded_rng, to_embeddings,
    EncoderStrategy,
};
use crate::config::EncoderConfig;
use crate::features::encoder::domain::{Embeddings, EncoderInput, TrainResult};
use crate::features::encoder::infrastructure::{
    device_label, Adam, Discriminator, EdgeIndex, GinEncoder, Mode,
};

/// Trains the GIN encoder on the whole graph every epoch
pub struct FullGraphStrategy {
    config: EncoderConfig,
    device: Device,
}

impl FullGraphStrategy {
    pub fn new(config: &EncoderConfig, device: Device) -> Self {
        Self {
            config: config.clone(),
            device,
        }
    }
}

impl EncoderStrategy for FullGraphStrategy {
    fn name(&self) -> &'static str {
        "full-graph"
    }

    fn train(&self, input: &EncoderInput) -> TrainResult<Embeddings> {
        let cfg = &self.config;
        let n = input.n_nodes();
        check_budget(
            self.name(),
            estimate_step_mb(n, input.edges().len(), input.dim(), cfg.hidden, cfg.layers),
            cfg.memory_budget_mb,
        )?;

        let mut rng = seeded_rng(cfg.seed);
        let x = input_rows(input, 0, n, &self.device)?;
        let edges = EdgeIndex::new(input.edges(), &self.device)?;

        let mut encoder = GinEncoder::new(
            input.dim(),
            cfg.hidden,
            cfg.layers,
            cfg.dropout,
            &mut rng,
            &self.device,
        )?;
        let discriminator = Discriminator::new(cfg.hidden, &mut rng, &self.device)?;
        let mut vars = encoder.vars();
        vars.push(discriminator.var());
        let mut optimizer = Adam::new(vars, cfg.learning_rate)?;

        for epoch in 0..cfg.epochs {
            let corrupted = x.index_select(&permutation(n, &mut rng, &self.device)?, 0)?;
            let h_pos = encoder.forward(&x, &edges, Mode::Train, &mut rng)?;
            let h_neg = encoder.forward(&corrupted, &edges, Mode::Train, &mut rng)?;
            let loss = discriminator.loss(&h_pos, &h_neg)?;
            optimizer.backward_step(&loss)?;

            if epoch % 25 == 0 || epoch + 1 == cfg.epochs {
                debug!(
                    epoch,
                    loss = loss.to_scalar::<f32>()?,
                    device = device_label(&self.device),
                    "DGI full-graph"
                );
            }
        }

        let h = encoder.forward(&x, &edges, Mode::Eval, &mut rng)?;
        to_embeddings(&h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(n: u32) -> EncoderInput {
        let dim = 3;
        let x: Vec<f32> = (0..n * dim).map(|i| (i % 7) as f32 / 7.0).collect();
        let edges = (0..n).map(|i| (i, (i + 1) % n)).collect();
        EncoderInput::from_parts(n as usize, dim as usize, x, edges).unwrap()
    }

    #[test]
    fn test_same_seed_same_embeddings() {
        let cfg = EncoderConfig::tiny();
        let a = FullGraphStrategy::new(&cfg, Device::Cpu).train(&ring(12)).unwrap();
        let b = FullGraphStrategy::new(&cfg, Device::Cpu).train(&ring(12)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.n_nodes(), 12);
        assert_eq!(a.dim(), cfg.hidden);
        assert!(a.as_slice().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_tiny_budget_is_exhaustion() {
        let cfg = EncoderConfig {
            memory_budget_mb: Some(0),
            ..EncoderConfig::tiny()
        };
        let err = FullGraphStrategy::new(&cfg, Device::Cpu).train(&ring(12)).unwrap_err();
        assert!(err.is_exhausted());
    }
}

//! Resource degrade chain
//!
//! ```text
//! N < sample_threshold:   full-graph → sampled-subgraph → feature-only
//! N >= sample_threshold:               sampled-subgraph → feature-only
//! ```
//!
//! Tiers run in order; only [`TrainError::ResourceExhausted`] moves on to the
//! next one. Any other error is returned as is.

use tracing::{info, warn};

use super::feature_only::FeatureOnlyStrategy;
use super::full_graph::FullGraphStrategy;
use super::sampled::SampledSubgraphStrategy;
use super::strategy::EncoderStrategy;
use crate::config::EncoderConfig;
use crate::features::encoder::domain::{Embeddings, EncoderInput, TrainError, TrainResult};
use crate::features::encoder::infrastructure::{device_label, preferred_device};

/// Ordered list of training tiers
pub struct DegradeChain {
    tiers: Vec<Box<dyn EncoderStrategy>>,
}

impl DegradeChain {
    /// Standard tiers for a graph of `n_nodes`
    pub fn for_graph(config: &EncoderConfig, n_nodes: usize) -> Self {
        let device = preferred_device(config.prefer_accelerator);
        info!(device = device_label(&device), n_nodes, "encoder device selected");

        let mut tiers: Vec<Box<dyn EncoderStrategy>> = Vec::new();
        if n_nodes < config.sample_threshold {
            tiers.push(Box::new(FullGraphStrategy::new(config, device.clone())));
        }
        tiers.push(Box::new(SampledSubgraphStrategy::new(config, device)));
        tiers.push(Box::new(FeatureOnlyStrategy::new(config)));
        Self { tiers }
    }

    /// Custom tier list
    pub fn with_tiers(tiers: Vec<Box<dyn EncoderStrategy>>) -> Self {
        Self { tiers }
    }

    pub fn tier_names(&self) -> Vec<&'static str> {
        self.tiers.iter().map(|t| t.name()).collect()
    }

    /// Run tiers in order until one succeeds
    pub fn train(&self, input: &EncoderInput) -> TrainResult<Embeddings> {
        if input.n_nodes() == 0 {
            return Err(TrainError::InvalidInput("graph has no nodes".to_string()));
        }

        let mut last = None;
        for tier in &self.tiers {
            match tier.train(input) {
                Ok(embeddings) => {
                    info!(tier = tier.name(), "encoder trained");
                    return Ok(embeddings);
                }
                Err(TrainError::ResourceExhausted(msg)) => {
                    warn!(tier = tier.name(), "tier exhausted resources: {}", msg);
                    last = Some(msg);
                }
                Err(other) => return Err(other),
            }
        }

        Err(TrainError::ResourceExhausted(format!(
            "every tier exhausted resources (last: {})",
            last.unwrap_or_else(|| "no tiers configured".to_string())
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct ScriptedTier {
        name: &'static str,
        outcome: fn() -> TrainResult<Embeddings>,
        calls: Arc<AtomicUsize>,
    }

    impl EncoderStrategy for ScriptedTier {
        fn name(&self) -> &'static str {
            self.name
        }

        fn train(&self, _input: &EncoderInput) -> TrainResult<Embeddings> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }
    }

    fn exhausted() -> TrainResult<Embeddings> {
        Err(TrainError::ResourceExhausted("out of memory".into()))
    }

    fn broken() -> TrainResult<Embeddings> {
        Err(TrainError::Other("shape mismatch".into()))
    }

    fn ok() -> TrainResult<Embeddings> {
        Ok(Embeddings::new(2, 1, vec![1.0, 2.0]).unwrap())
    }

    fn tier(
        name: &'static str,
        outcome: fn() -> TrainResult<Embeddings>,
    ) -> (Box<dyn EncoderStrategy>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let t = ScriptedTier {
            name,
            outcome,
            calls: Arc::clone(&calls),
        };
        (Box::new(t), calls)
    }

    fn input() -> EncoderInput {
        EncoderInput::from_parts(2, 1, vec![0.0, 1.0], vec![(0, 1)]).unwrap()
    }

    #[test]
    fn test_falls_through_on_exhaustion() {
        let (a, a_calls) = tier("a", exhausted);
        let (b, b_calls) = tier("b", ok);
        let chain = DegradeChain::with_tiers(vec![a, b]);
        assert!(chain.train(&input()).is_ok());
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_other_errors_propagate() {
        let (a, _) = tier("a", broken);
        let (b, b_calls) = tier("b", ok);
        let chain = DegradeChain::with_tiers(vec![a, b]);
        assert!(matches!(chain.train(&input()), Err(TrainError::Other(_))));
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_all_exhausted_is_exhaustion() {
        let (a, _) = tier("a", exhausted);
        let (b, _) = tier("b", exhausted);
        let err = DegradeChain::with_tiers(vec![a, b]).train(&input()).unwrap_err();
        assert!(err.is_exhausted());
    }

    #[test]
    fn test_large_graphs_skip_full_tier() {
        let cfg = EncoderConfig {
            sample_threshold: 100,
            ..EncoderConfig::tiny()
        };
        assert_eq!(
            DegradeChain::for_graph(&cfg, 10).tier_names(),
            vec!["full-graph", "sampled-subgraph", "feature-only"]
        );
        assert_eq!(
            DegradeChain::for_graph(&cfg, 100).tier_names(),
            vec!["sampled-subgraph", "feature-only"]
        );
    }
}

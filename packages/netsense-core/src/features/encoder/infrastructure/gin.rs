//! Graph Isomorphism Network encoder
//!
//! ```text
//! per layer:
//!   agg = h + Σ_{(j→i)} h_j
//!   h   = dropout(relu(bn(relu(W2 · relu(W1 · agg + b1) + b2))))
//! ```

use candle_core::{Device, Result, Tensor, Var};
use rand_chacha::ChaCha8Rng;

use super::layers::{dropout, BatchNorm, Mlp, Mode};
use crate::features::netlist_graph::NodeId;

/// Edge index tensors on a device; `None` for an edgeless graph
pub struct EdgeIndex {
    tensors: Option<(Tensor, Tensor)>,
}

impl EdgeIndex {
    pub fn new(edges: &[(NodeId, NodeId)], device: &Device) -> Result<Self> {
        if edges.is_empty() {
            return Ok(Self { tensors: None });
        }
        let (src, dst): (Vec<u32>, Vec<u32>) = edges.iter().copied().unzip();
        let n = src.len();
        Ok(Self {
            tensors: Some((
                Tensor::from_vec(src, n, device)?,
                Tensor::from_vec(dst, n, device)?,
            )),
        })
    }

    /// `h + Σ_{(j→i)} h_j`
    fn aggregate(&self, h: &Tensor) -> Result<Tensor> {
        match &self.tensors {
            Some((src, dst)) => h.index_add(dst, &h.index_select(src, 0)?, 0),
            None => Ok(h.clone()),
        }
    }
}

struct GinLayer {
    mlp: Mlp,
    norm: BatchNorm,
}

/// Stack of GIN layers with shared dropout rate
pub struct GinEncoder {
    layers: Vec<GinLayer>,
    dropout: f64,
}

impl GinEncoder {
    pub fn new(
        in_dim: usize,
        hidden: usize,
        num_layers: usize,
        dropout: f64,
        rng: &mut ChaCha8Rng,
        device: &Device,
    ) -> Result<Self> {
        let layers = (0..num_layers)
            .map(|i| {
                let input = if i == 0 { in_dim } else { hidden };
                Ok(GinLayer {
                    mlp: Mlp::new(input, hidden, rng, device)?,
                    norm: BatchNorm::new(hidden, device)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { layers, dropout })
    }

    pub fn forward(
        &mut self,
        x: &Tensor,
        edges: &EdgeIndex,
        mode: Mode,
        rng: &mut ChaCha8Rng,
    ) -> Result<Tensor> {
        let mut h = x.clone();
        for layer in self.layers.iter_mut() {
            let agg = edges.aggregate(&h)?;
            h = layer.norm.forward(&layer.mlp.forward(&agg)?, mode)?.relu()?;
            if mode == Mode::Train {
                h = dropout(&h, self.dropout, rng)?;
            }
        }
        Ok(h)
    }

    pub fn vars(&self) -> Vec<Var> {
        self.layers
            .iter()
            .flat_map(|l| {
                let mut vars = l.mlp.vars();
                vars.extend(l.norm.vars());
                vars
            })
            .collect()
    }
}

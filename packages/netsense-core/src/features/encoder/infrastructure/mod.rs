//! Encoder infrastructure: candle layers, GIN, DGI objective, Adam

pub mod device;
pub mod dgi;
pub mod gin;
pub mod layers;
pub mod optimizer;

pub use device::{device_label, is_accelerator, preferred_device};
pub use dgi::{contrastive_loss, Discriminator};
pub use gin::{EdgeIndex, GinEncoder};
pub use layers::{dropout, sigmoid, BatchNorm, Linear, Mlp, Mode};
pub use optimizer::Adam;

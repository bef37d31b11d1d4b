//! Compute device selection

use candle_core::Device;
use tracing::debug;

/// CUDA device 0 when preferred and present, host otherwise
pub fn preferred_device(prefer_accelerator: bool) -> Device {
    if !prefer_accelerator {
        return Device::Cpu;
    }
    match Device::cuda_if_available(0) {
        Ok(device) => device,
        Err(e) => {
            debug!("accelerator unavailable ({}), using host", e);
            Device::Cpu
        }
    }
}

pub fn is_accelerator(device: &Device) -> bool {
    !matches!(device, Device::Cpu)
}

pub fn device_label(device: &Device) -> &'static str {
    if is_accelerator(device) {
        "accelerator"
    } else {
        "host"
    }
}

//! Compute device selection: accelerator when one is usable, CPU otherwise.

use candle_core::{Device, DeviceLocation};
use tracing::{info, warn};

/// Picks CUDA device 0, then Metal device 0, then the CPU.
///
/// An accelerator that is reported available but fails to initialize is
/// skipped with a warning rather than aborting startup.
pub fn select_device(force_cpu: bool) -> Device {
    if force_cpu {
        info!("FORCE_CPU set, using CPU");
        return Device::Cpu;
    }

    if candle_core::utils::cuda_is_available() {
        match Device::new_cuda(0) {
            Ok(device) => return device,
            Err(e) => warn!("CUDA reported available but failed to initialize: {e}"),
        }
    }

    if candle_core::utils::metal_is_available() {
        match Device::new_metal(0) {
            Ok(device) => return device,
            Err(e) => warn!("Metal reported available but failed to initialize: {e}"),
        }
    }

    Device::Cpu
}

/// Display string for the settings panel, e.g. `"GPU - CUDA:0"` or `"CPU"`.
pub fn device_label(device: &Device) -> String {
    match device.location() {
        DeviceLocation::Cpu => "CPU".to_string(),
        DeviceLocation::Cuda { gpu_id } => format!("GPU - CUDA:{gpu_id}"),
        DeviceLocation::Metal { gpu_id } => format!("GPU - Metal:{gpu_id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_cpu_always_returns_cpu() {
        assert!(matches!(select_device(true), Device::Cpu));
    }

    #[test]
    fn test_cpu_label() {
        assert_eq!(device_label(&Device::Cpu), "CPU");
    }
}

use candle_core::Device;
use tracing::debug;

/// Compute device for the sentence embedder.
///
/// Tries each GPU backend compiled in (`metal`, then `cuda`) and settles on CPU when none
/// comes up. Device failures are logged, never fatal.
pub fn select_device() -> Device {
    #[cfg(feature = "metal")]
    match Device::new_metal(0) {
        Ok(device) => return device,
        Err(e) => tracing::warn!(error = %e, "Metal unavailable for embedding"),
    }

    #[cfg(feature = "cuda")]
    match Device::new_cuda(0) {
        Ok(device) => return device,
        Err(e) => tracing::warn!(error = %e, "CUDA unavailable for embedding"),
    }

    debug!("Embedding on CPU");
    Device::Cpu
}

//! System probe implementation for gpuprov-runtime.
//!
//! This module provides the `DefaultSystemProbe` which implements
//! `SystemProbePort` from gpuprov-core. It performs active system probing
//! via command execution and file reads.

mod commands;
mod gpu;
mod os;

use std::path::PathBuf;

use gpuprov_core::domain::GpuProbe;
use gpuprov_core::ports::{SystemProbeError, SystemProbePort, SystemProbeResult};
use gpuprov_core::{OsProfile, VersionTarget};

pub use commands::{command_exists, get_command_output};
pub use gpu::{nvcc_output, parse_driver_cuda, parse_gpu_name, parse_nvcc_release};

/// Default implementation of `SystemProbePort`.
///
/// Construct it in the CLI's main.rs and pass it to handlers that need
/// system information.
///
/// # Example
///
/// ```ignore
/// use gpuprov_runtime::system::DefaultSystemProbe;
/// use gpuprov_core::ports::SystemProbePort;
///
/// let probe = DefaultSystemProbe::new("/usr/local");
/// let gpu = probe.probe_gpu()?;
/// ```
pub struct DefaultSystemProbe {
    cuda_root: PathBuf,
}

impl DefaultSystemProbe {
    /// `cuda_root` is where toolkits are installed (`/usr/local`).
    pub fn new(cuda_root: impl Into<PathBuf>) -> Self {
        Self {
            cuda_root: cuda_root.into(),
        }
    }
}

impl SystemProbePort for DefaultSystemProbe {
    fn probe_gpu(&self) -> SystemProbeResult<Option<GpuProbe>> {
        Ok(gpu::detect_gpu())
    }

    fn os_profile(&self) -> SystemProbeResult<OsProfile> {
        os::detect_os_profile()
    }

    fn installed_toolkit(&self) -> SystemProbeResult<Option<VersionTarget>> {
        let Some(output) = gpu::nvcc_output(&self.cuda_root) else {
            return Ok(None);
        };
        parse_nvcc_release(&output)
            .map(Some)
            .ok_or_else(|| SystemProbeError::VersionParseFailed {
                command: "nvcc --version".to_string(),
                reason: output.lines().last().unwrap_or_default().trim().to_string(),
            })
    }
}

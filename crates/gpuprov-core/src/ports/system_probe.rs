//! System probe port for GPU, OS and toolkit detection.
//!
//! This port abstracts active system probing (command execution, file reads)
//! from the core domain. Implementations live in adapters (e.g., gpuprov-runtime).
//!
//! # Design Notes
//!
//! - Core owns the trait and types (pure)
//! - Runtime owns the implementation (active probing via `Command::new`)
//! - CLI injects the probe via main.rs

use thiserror::Error;

use crate::domain::{GpuProbe, OsProfile, VersionTarget};

/// Errors that can occur during system probing.
#[derive(Debug, Error)]
pub enum SystemProbeError {
    /// Failed to execute a command.
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    /// Failed to parse version output.
    #[error("Version parse failed for {command}: {reason}")]
    VersionParseFailed { command: String, reason: String },

    /// The OS could not be identified or is not supported.
    #[error("OS detection failed: {0}")]
    OsDetectionFailed(String),
}

/// Result type for system probe operations.
pub type SystemProbeResult<T> = Result<T, SystemProbeError>;

/// Port for probing the machine that is about to be provisioned.
///
/// # Example
///
/// ```ignore
/// use gpuprov_core::ports::SystemProbePort;
///
/// fn describe(probe: &dyn SystemProbePort) {
///     let gpu = probe.probe_gpu();
///     let os = probe.os_profile();
///     // ...
/// }
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait SystemProbePort: Send + Sync {
    /// GPU name and driver CUDA ceiling. `Ok(None)` when no NVIDIA driver is
    /// installed.
    fn probe_gpu(&self) -> SystemProbeResult<Option<GpuProbe>>;

    /// Operating system of the target machine.
    fn os_profile(&self) -> SystemProbeResult<OsProfile>;

    /// Toolkit version reported by `nvcc`, if one is installed.
    fn installed_toolkit(&self) -> SystemProbeResult<Option<VersionTarget>>;
}

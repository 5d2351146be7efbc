//! NVIDIA GPU and toolkit detection.
//!
//! Parsing is kept separate from command execution so the formats can be
//! tested without a GPU.

use std::path::Path;

use gpuprov_core::VersionTarget;
use gpuprov_core::domain::GpuProbe;
use tracing::debug;

use super::commands::{command_exists, get_command_output};

/// Query `nvidia-smi` for the GPU name and driver CUDA ceiling.
///
/// `None` when no NVIDIA driver is installed.
pub fn detect_gpu() -> Option<GpuProbe> {
    let names = get_command_output("nvidia-smi", &["--query-gpu=name", "--format=csv,noheader"])?;
    let name = parse_gpu_name(&names)?;

    // The ceiling only appears in the banner of the plain invocation
    let ceiling = get_command_output("nvidia-smi", &[]).and_then(|banner| parse_driver_cuda(&banner));
    debug!(gpu = %name, driver_cuda = ?ceiling.map(|v| v.to_string()), "Detected NVIDIA GPU");

    Some(GpuProbe::new(name, ceiling))
}

/// Run `nvcc --version`, preferring `PATH` and falling back to
/// `<cuda_root>/cuda/bin/nvcc`.
///
/// `None` when no `nvcc` is found; `Some(output)` otherwise.
pub fn nvcc_output(cuda_root: &Path) -> Option<String> {
    if command_exists("nvcc") {
        return get_command_output("nvcc", &["--version"]);
    }
    let fallback = cuda_root.join("cuda").join("bin").join("nvcc");
    if fallback.exists() {
        return get_command_output(&fallback.to_string_lossy(), &["--version"]);
    }
    None
}

/// First GPU name in `--query-gpu=name` output.
pub fn parse_gpu_name(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(ToString::to_string)
}

/// `CUDA Version: 12.4` from the `nvidia-smi` banner.
pub fn parse_driver_cuda(banner: &str) -> Option<VersionTarget> {
    let rest = banner.split("CUDA Version:").nth(1)?;
    let token = rest.split_whitespace().next()?;
    VersionTarget::parse(token.trim_end_matches('|')).ok()
}

/// `release 12.0` from `nvcc --version`.
pub fn parse_nvcc_release(output: &str) -> Option<VersionTarget> {
    // "Cuda compilation tools, release 12.0, V12.0.140"
    let line = output.lines().find(|l| l.contains("release"))?;
    let version = line.split("release").nth(1)?.trim().split(',').next()?.trim();
    VersionTarget::parse(version).ok()
}

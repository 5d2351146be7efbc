//! Detect command handler.
//!
//! Probes the GPU, driver, OS and installed toolkit and shows what an
//! install would configure.

use gpuprov_core::{EnvExport, GpuProbe};
use serde_json::json;
use tracing::debug;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::render_detection;

/// Execute the detect command.
///
/// A missing GPU or toolkit is reported, not treated as an error. An
/// unsupported OS is an error because nothing else can be planned.
pub fn execute(ctx: &CliContext, json: bool) -> Result<(), CliError> {
    let gpu = ctx.probe.probe_gpu()?;
    let os = ctx.probe.os_profile()?;
    let installed = ctx.probe.installed_toolkit()?;
    debug!(gpu = ?gpu, os = %os, installed = ?installed, "Detection complete");

    let arch_export = arch_export(gpu.as_ref(), ctx.settings.effective_arch_env_var());

    if json {
        let capability = gpu.as_ref().and_then(GpuProbe::compute_capability);
        let report = json!({
            "gpu": gpu,
            "compute_capability": capability,
            "os": os,
            "repo_candidates": os.repo_candidates(),
            "installed_toolkit": installed,
            "arch_export": arch_export,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!(
            "{}",
            render_detection(gpu.as_ref(), &os, installed, arch_export.as_ref())
        );
    }
    Ok(())
}

/// The architecture flag an install would export, if the GPU is known.
pub fn arch_export(gpu: Option<&GpuProbe>, env_var: &str) -> Option<EnvExport> {
    gpu.and_then(GpuProbe::compute_capability)
        .map(|c| EnvExport::new(env_var, c.as_str()))
}

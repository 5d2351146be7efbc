//! Install command handler.
//!
//! Probe, plan, confirm, execute, record the outcome, then apply the
//! toolkit environment to the shell profile.

use gpuprov_core::{
    GpuProbe, PackageArch, PlanRequest, ToolkitEnvironment, UserChoice, VersionTarget,
    manifest_path, persist_exports, profile_path,
};
use gpuprov_runtime::prompt::InstallPrompt;
use tracing::{info, warn};

use crate::bootstrap::CliContext;
use crate::commands::ChoiceArgs;
use crate::error::CliError;
use crate::presentation::render_plan;

const CHOICE_KEEP: usize = 0;
const CHOICE_LATEST: usize = 1;
const CHOICE_CUSTOM: usize = 2;

/// Arguments for the install command.
#[derive(Debug, Clone, Default)]
pub struct InstallArgs {
    pub choice: ChoiceArgs,
    pub auto: bool,
    pub no_profile: bool,
}

/// Execute the install command.
///
/// Returns `CliError::Exhausted` (carrying the manual download URL) when
/// every repository and version failed. The outcome manifest is written
/// either way.
pub async fn execute(
    ctx: &CliContext,
    args: InstallArgs,
    prompt: &dyn InstallPrompt,
) -> Result<(), CliError> {
    let gpu = ctx.probe.probe_gpu()?;
    let os = ctx.probe.os_profile()?;
    let installed = ctx.probe.installed_toolkit()?;

    match &gpu {
        Some(probe) => prompt.info(&format!("Detected {}", probe.raw_name)),
        None => prompt.warn("No NVIDIA GPU detected"),
    }

    let choice = match args.choice.to_choice()? {
        Some(choice) => choice,
        None if args.auto => UserChoice::Latest,
        None => ask_choice(prompt, installed)?,
    };

    let request = PlanRequest {
        os,
        driver_ceiling: gpu.as_ref().and_then(|g| g.driver_cuda_version),
        current_installed: installed,
        choice,
    };
    let plan = ctx.resolver.plan(&request).await;
    prompt.info(render_plan(&plan).trim_end());

    if plan.is_noop() {
        return Ok(());
    }
    if !args.auto && !prompt.confirm("Proceed with installation?", true)? {
        return Err(CliError::Cancelled);
    }

    let outcome = ctx.executor(os.family).execute(&plan).await;
    let manifest = manifest_path()?;
    if let Err(e) = outcome.save(&manifest) {
        warn!(error = %e, "Could not record install outcome");
        prompt.warn(&e.to_string());
    }

    let success = outcome.ensure_succeeded(PackageArch::current())?;
    info!(
        repo = %success.repo,
        package = %success.entry.package_name(),
        attempts = outcome.install_attempts(),
        "Toolkit installed"
    );
    prompt.info(&format!(
        "Installed {} from {} (CUDA {})",
        success.entry.package_name(),
        success.repo,
        outcome
            .final_version
            .map_or_else(|| "version unknown".to_string(), |v| v.to_string())
    ));

    let env = ToolkitEnvironment::for_toolkit(
        ctx.cuda_root(),
        outcome.final_version,
        gpu.as_ref().and_then(GpuProbe::compute_capability),
        ctx.settings.effective_arch_env_var(),
    );
    let exports = env.exports();

    if args.no_profile {
        for export in &exports {
            println!("{}", export.to_shell_line());
        }
    } else {
        let profile = profile_path()?;
        persist_exports(&profile, &exports)?;
        prompt.info(&format!(
            "Updated {}; run `source {}` or open a new shell",
            profile.display(),
            profile.display()
        ));
    }
    Ok(())
}

/// Ask Keep / Latest / Custom. Keep is the default when a toolkit is
/// already installed.
fn ask_choice(
    prompt: &dyn InstallPrompt,
    installed: Option<VersionTarget>,
) -> Result<UserChoice, CliError> {
    let keep_label = installed.map_or_else(
        || "Keep (no toolkit installed)".to_string(),
        |v| format!("Keep CUDA {v}"),
    );
    let options = [keep_label.as_str(), "Latest", "Custom version"];
    let default = if installed.is_some() {
        CHOICE_KEEP
    } else {
        CHOICE_LATEST
    };

    match prompt.select("Which CUDA toolkit should be installed?", &options, default)? {
        CHOICE_KEEP => Ok(UserChoice::Keep),
        CHOICE_CUSTOM => {
            let raw = prompt.input("CUDA version (e.g. 12.6)")?;
            Ok(UserChoice::Custom(VersionTarget::parse(&raw)?))
        }
        _ => Ok(UserChoice::Latest),
    }
}

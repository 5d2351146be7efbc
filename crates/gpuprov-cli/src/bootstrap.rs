//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - Settings (defaults overlaid with `GPUPROV_*` variables)
//! - System probe, release index and package manager (via gpuprov-runtime)
//! - Resolver service (via gpuprov-core)
//!
//! Command handlers receive the composed `CliContext`.

use std::path::Path;
use std::sync::Arc;

use gpuprov_core::ports::{ReleaseIndexPort, SystemProbePort};
use gpuprov_core::{OsFamily, PlanExecutor, ResolverService, Settings};
use gpuprov_runtime::progress::CliProgress;
use gpuprov_runtime::{DefaultSystemProbe, HttpReleaseIndex, SystemPackageManager};

use crate::error::CliError;

/// Fully composed application context for CLI commands.
pub struct CliContext {
    pub settings: Settings,
    pub probe: Arc<dyn SystemProbePort>,
    pub resolver: ResolverService,
}

impl CliContext {
    /// Executor bound to the package manager of `family`.
    pub fn executor(&self, family: OsFamily) -> PlanExecutor {
        let packages = SystemPackageManager::new(
            family,
            self.settings.effective_cuda_repo_url(),
            self.cuda_root(),
        )
        .with_progress(Arc::new(CliProgress::new()));
        PlanExecutor::new(Arc::new(packages))
    }

    pub fn cuda_root(&self) -> &Path {
        Path::new(self.settings.effective_cuda_root())
    }
}

/// Compose the context from validated settings.
pub fn bootstrap(settings: Settings) -> CliContext {
    let probe: Arc<dyn SystemProbePort> =
        Arc::new(DefaultSystemProbe::new(settings.effective_cuda_root()));
    let index: Arc<dyn ReleaseIndexPort> =
        Arc::new(HttpReleaseIndex::new(settings.effective_cuda_repo_url()));
    let resolver = ResolverService::new(index, settings.effective_default_cuda_version());

    CliContext {
        settings,
        probe,
        resolver,
    }
}

/// Load settings from the environment and compose the context.
pub fn bootstrap_from_env() -> Result<CliContext, CliError> {
    Ok(bootstrap(Settings::from_env()?))
}

//! Plan command handler.
//!
//! Dry run: resolves the plan an install would execute. Overrides let the
//! plan be computed for another machine without probing this one.

use gpuprov_core::{OsProfile, PlanRequest, UserChoice, VersionTarget};
use tracing::debug;

use crate::bootstrap::CliContext;
use crate::commands::ChoiceArgs;
use crate::error::CliError;
use crate::presentation::render_plan;

/// Arguments for the plan command.
#[derive(Debug, Clone, Default)]
pub struct PlanArgs {
    pub choice: ChoiceArgs,
    pub os: Option<String>,
    pub driver_cuda: Option<String>,
    pub installed: Option<String>,
    pub json: bool,
}

/// Execute the plan command.
///
/// Without a choice flag the plan is computed for `Latest`.
pub async fn execute(ctx: &CliContext, args: PlanArgs) -> Result<(), CliError> {
    let request = build_request(ctx, &args)?;
    debug!(request = ?request, "Planning");

    let plan = ctx.resolver.plan(&request).await;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", render_plan(&plan));
    }
    Ok(())
}

/// Merge overrides with probed values. Only facts that were not overridden
/// are probed.
fn build_request(ctx: &CliContext, args: &PlanArgs) -> Result<PlanRequest, CliError> {
    let choice = args.choice.to_choice()?.unwrap_or(UserChoice::Latest);

    let os = match &args.os {
        Some(raw) => raw.parse::<OsProfile>()?,
        None => ctx.probe.os_profile()?,
    };

    let driver_ceiling = match &args.driver_cuda {
        Some(raw) => Some(VersionTarget::parse(raw)?),
        None if args.os.is_some() => None,
        None => ctx
            .probe
            .probe_gpu()?
            .and_then(|gpu| gpu.driver_cuda_version),
    };

    let current_installed = match &args.installed {
        Some(raw) => Some(VersionTarget::parse(raw)?),
        None if args.os.is_some() => None,
        None => ctx.probe.installed_toolkit()?,
    };

    Ok(PlanRequest {
        os,
        driver_ceiling,
        current_installed,
        choice,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use gpuprov_core::ports::{
        ReleaseIndexError, ReleaseIndexPort, SystemProbeError, SystemProbePort, SystemProbeResult,
    };
    use gpuprov_core::{CudaRepoCandidate, GpuProbe, ResolverService, Settings};

    struct FixedProbe;

    impl SystemProbePort for FixedProbe {
        fn probe_gpu(&self) -> SystemProbeResult<Option<GpuProbe>> {
            Ok(Some(GpuProbe::new(
                "NVIDIA L4",
                Some(VersionTarget::new(12, 4)),
            )))
        }

        fn os_profile(&self) -> SystemProbeResult<OsProfile> {
            Ok(OsProfile::ubuntu(22, 4))
        }

        fn installed_toolkit(&self) -> SystemProbeResult<Option<VersionTarget>> {
            Ok(Some(VersionTarget::new(12, 2)))
        }
    }

    /// Fails every call so tests prove overrides skip probing.
    struct FailingProbe;

    impl SystemProbePort for FailingProbe {
        fn probe_gpu(&self) -> SystemProbeResult<Option<GpuProbe>> {
            Err(SystemProbeError::CommandFailed("nvidia-smi".into()))
        }

        fn os_profile(&self) -> SystemProbeResult<OsProfile> {
            Err(SystemProbeError::OsDetectionFailed("no os-release".into()))
        }

        fn installed_toolkit(&self) -> SystemProbeResult<Option<VersionTarget>> {
            Err(SystemProbeError::CommandFailed("nvcc".into()))
        }
    }

    struct EmptyIndex;

    #[async_trait::async_trait]
    impl ReleaseIndexPort for EmptyIndex {
        async fn latest_toolkit(
            &self,
            _repo: &CudaRepoCandidate,
        ) -> Result<Option<VersionTarget>, ReleaseIndexError> {
            Ok(None)
        }
    }

    fn context(probe: Arc<dyn SystemProbePort>) -> CliContext {
        let settings = Settings::with_defaults();
        CliContext {
            resolver: ResolverService::new(
                Arc::new(EmptyIndex),
                settings.effective_default_cuda_version(),
            ),
            settings,
            probe,
        }
    }

    #[test]
    fn test_request_from_probe() {
        let ctx = context(Arc::new(FixedProbe));
        let request = build_request(&ctx, &PlanArgs::default()).unwrap();

        assert_eq!(request.os, OsProfile::ubuntu(22, 4));
        assert_eq!(request.driver_ceiling, Some(VersionTarget::new(12, 4)));
        assert_eq!(request.current_installed, Some(VersionTarget::new(12, 2)));
        assert_eq!(request.choice, UserChoice::Latest);
    }

    #[test]
    fn test_os_override_skips_probe() {
        let ctx = context(Arc::new(FailingProbe));
        let args = PlanArgs {
            os: Some("rhel:9".to_string()),
            driver_cuda: Some("12.8".to_string()),
            choice: ChoiceArgs {
                cuda: Some("12.6".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let request = build_request(&ctx, &args).unwrap();

        assert_eq!(request.os, OsProfile::rhel(9, 0));
        assert_eq!(request.driver_ceiling, Some(VersionTarget::new(12, 8)));
        assert_eq!(request.current_installed, None);
        assert_eq!(
            request.choice,
            UserChoice::Custom(VersionTarget::new(12, 6))
        );
    }

    #[test]
    fn test_bad_override_is_argument_error() {
        let ctx = context(Arc::new(FailingProbe));
        let args = PlanArgs {
            os: Some("windows:11".to_string()),
            ..Default::default()
        };
        let err = build_request(&ctx, &args).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_latest_falls_back_to_default() {
        let ctx = context(Arc::new(FixedProbe));
        let request = build_request(&ctx, &PlanArgs::default()).unwrap();
        let plan = tokio_test::block_on(ctx.resolver.plan(&request));
        assert_eq!(plan.target, Some(VersionTarget::new(12, 9)));
    }
}

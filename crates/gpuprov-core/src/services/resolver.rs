//! Resolver service - turns a plan request into a provisioning plan.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{
    CudaRepoCandidate, PlanRequest, ProvisioningPlan, TargetSource, UserChoice, VersionTarget,
    build_plan,
};
use crate::ports::ReleaseIndexPort;

/// Resolves the primary target and builds the plan.
pub struct ResolverService {
    index: Arc<dyn ReleaseIndexPort>,
    default_version: VersionTarget,
}

impl ResolverService {
    /// `default_version` is used for `Latest` when no repository answers.
    pub fn new(index: Arc<dyn ReleaseIndexPort>, default_version: VersionTarget) -> Self {
        Self {
            index,
            default_version,
        }
    }

    /// Build the provisioning plan for `request`.
    ///
    /// Only `UserChoice::Latest` touches the release index.
    pub async fn plan(&self, request: &PlanRequest) -> ProvisioningPlan {
        let resolved = match request.choice {
            UserChoice::Keep => None,
            UserChoice::Custom(version) => Some((version, TargetSource::Requested)),
            UserChoice::Latest => Some(self.resolve_latest(&request.os.repo_candidates()).await),
        };
        let plan = build_plan(request, resolved);
        info!(
            os = %plan.os,
            status = ?plan.status,
            target = ?plan.target.map(|v| v.to_string()),
            repos = plan.repo_candidates.len(),
            ladder = plan.version_ladder.len(),
            "Resolved provisioning plan"
        );
        plan
    }

    /// Newest toolkit advertised by the first candidate that answers.
    ///
    /// Unreachable candidates and listings without a versioned toolkit are
    /// skipped. Falls back to the configured default.
    pub async fn resolve_latest(
        &self,
        candidates: &[CudaRepoCandidate],
    ) -> (VersionTarget, TargetSource) {
        for repo in candidates {
            match self.index.latest_toolkit(repo).await {
                Ok(Some(version)) => {
                    debug!(repo = %repo, version = %version, "Latest toolkit from repository");
                    return (version, TargetSource::Repository(repo.clone()));
                }
                Ok(None) => {
                    debug!(repo = %repo, "Repository lists no versioned toolkit");
                }
                Err(e) => {
                    warn!(repo = %repo, error = %e, "Skipping repository for version lookup");
                }
            }
        }
        info!(
            version = %self.default_version,
            "No repository answered, using default CUDA version"
        );
        (self.default_version, TargetSource::DefaultFallback)
    }
}

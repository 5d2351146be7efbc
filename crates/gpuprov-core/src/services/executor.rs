//! Plan executor - walks the repository × ladder matrix.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{AttemptStep, InstallOutcome, LadderEntry, ProvisioningPlan, SuccessPoint};
use crate::ports::PackageManagerPort;

/// Drives a package manager through a provisioning plan.
///
/// Steps run strictly in order: each repository is configured before any of
/// its packages are tried, and nothing runs concurrently.
pub struct PlanExecutor {
    packages: Arc<dyn PackageManagerPort>,
}

impl PlanExecutor {
    pub fn new(packages: Arc<dyn PackageManagerPort>) -> Self {
        Self { packages }
    }

    /// Execute `plan` and record every step.
    ///
    /// Stops at the first successful install. Per-step failures are logged
    /// and recorded; a plan with an empty ladder returns an outcome with no
    /// attempts. Use [`InstallOutcome::ensure_succeeded`] to turn an
    /// exhausted matrix into an error.
    pub async fn execute(&self, plan: &ProvisioningPlan) -> InstallOutcome {
        let mut outcome = InstallOutcome::new(plan.os);
        if plan.version_ladder.is_empty() {
            debug!(status = ?plan.status, "Nothing to install");
            return outcome;
        }

        for repo in &plan.repo_candidates {
            if let Err(e) = self.packages.configure_repository(repo).await {
                warn!(repo = %repo, error = %e, "Failed to configure repository");
                outcome.record(repo, AttemptStep::ConfigureRepository, Some(e.to_string()));
                continue;
            }
            outcome.record(repo, AttemptStep::ConfigureRepository, None);

            for entry in &plan.version_ladder {
                let package = entry.package_name();
                let index = outcome.attempted.len();
                debug!(repo = %repo, package = %package, attempt = index + 1, "Installing");

                match self.packages.install_package(&package).await {
                    Ok(()) => {
                        outcome.record(repo, AttemptStep::Install(*entry), None);
                        outcome.final_version = match entry {
                            LadderEntry::Version(v) => Some(*v),
                            LadderEntry::Generic => {
                                self.packages.installed_toolkit_version().await
                            }
                        };
                        outcome.succeeded_at = Some(SuccessPoint {
                            attempt: index,
                            repo: repo.clone(),
                            entry: *entry,
                        });
                        info!(repo = %repo, package = %package, "CUDA toolkit installed");
                        return outcome;
                    }
                    Err(e) => {
                        warn!(repo = %repo, package = %package, error = %e, "Install attempt failed");
                        outcome.record(repo, AttemptStep::Install(*entry), Some(e.to_string()));
                    }
                }
            }
        }

        warn!(
            attempts = outcome.attempted.len(),
            "Exhausted all repository and version candidates"
        );
        outcome
    }
}

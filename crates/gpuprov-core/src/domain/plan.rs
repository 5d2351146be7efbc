//! Provisioning plans: which repositories and toolkit versions to try.
//!
//! Everything here is pure. Resolving "latest" needs a release index and
//! lives in `services::resolver`; once a primary target is known the plan is
//! built by [`build_plan`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::os::{CudaRepoCandidate, OsProfile};
use super::version::VersionTarget;

/// Package name of the unversioned toolkit meta-package.
pub const GENERIC_TOOLKIT_PACKAGE: &str = "cuda-toolkit";

/// Fallback series for 12.x and newer targets, newest first.
const STABLE_FALLBACKS: [VersionTarget; 4] = [
    VersionTarget::new(12, 9),
    VersionTarget::new(12, 6),
    VersionTarget::new(12, 3),
    VersionTarget::new(12, 2),
];

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "choice", content = "version")]
pub enum UserChoice {
    /// Leave the current toolkit alone.
    Keep,
    /// Newest toolkit the repositories advertise.
    Latest,
    /// A specific version.
    Custom(VersionTarget),
}

/// Inputs to the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    pub os: OsProfile,
    /// CUDA ceiling reported by the driver, if a driver is present.
    pub driver_ceiling: Option<VersionTarget>,
    /// Toolkit version already on the machine.
    pub current_installed: Option<VersionTarget>,
    pub choice: UserChoice,
}

/// One rung of the version ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LadderEntry {
    /// `cuda-toolkit-X-Y`
    Version(VersionTarget),
    /// `cuda-toolkit`, whatever the repository ships.
    Generic,
}

impl LadderEntry {
    /// Package name passed to the package manager.
    pub fn package_name(&self) -> String {
        match self {
            Self::Version(v) => format!("{GENERIC_TOOLKIT_PACKAGE}-{}", v.package_suffix()),
            Self::Generic => GENERIC_TOOLKIT_PACKAGE.to_string(),
        }
    }

    pub const fn version(&self) -> Option<VersionTarget> {
        match self {
            Self::Version(v) => Some(*v),
            Self::Generic => None,
        }
    }
}

impl fmt::Display for LadderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Version(v) => write!(f, "{v}"),
            Self::Generic => f.write_str("generic"),
        }
    }
}

/// Where the primary target came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "source", content = "repo")]
pub enum TargetSource {
    /// `UserChoice::Custom`
    Requested,
    /// Newest version listed by this repository.
    Repository(CudaRepoCandidate),
    /// No repository answered; the configured default was used.
    DefaultFallback,
}

/// Outcome class of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// User chose to keep the current toolkit.
    Keep,
    /// The installed toolkit already equals the target.
    AlreadyUpToDate,
    /// The ladder should be executed.
    Install,
}

/// Advisory findings attached to a plan. None of them block execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PlanWarning {
    /// Target is newer than what the driver advertises.
    DriverTooOld {
        requested: VersionTarget,
        driver_ceiling: VersionTarget,
    },
    /// No driver ceiling was available to check against.
    DriverNotDetected,
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DriverTooOld {
                requested,
                driver_ceiling,
            } => write!(
                f,
                "CUDA {requested} is newer than the driver supports (CUDA {driver_ceiling}); \
                 the install will be attempted but may need a driver upgrade"
            ),
            Self::DriverNotDetected => f.write_str(
                "No NVIDIA driver detected; the toolkit can be installed but GPU code will not run",
            ),
        }
    }
}

/// Ordered install plan produced by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningPlan {
    pub os: OsProfile,
    pub status: PlanStatus,
    /// Primary target, absent for `Keep`.
    pub target: Option<VersionTarget>,
    pub target_source: Option<TargetSource>,
    /// Repositories to configure, newest first.
    pub repo_candidates: Vec<CudaRepoCandidate>,
    /// Packages to try in each repository, in order. Empty unless `Install`.
    pub version_ladder: Vec<LadderEntry>,
    pub warnings: Vec<PlanWarning>,
}

impl ProvisioningPlan {
    pub fn is_noop(&self) -> bool {
        self.version_ladder.is_empty()
    }

    /// Number of repository × package combinations the executor may try.
    pub fn attempt_budget(&self) -> usize {
        self.repo_candidates.len() * self.version_ladder.len()
    }
}

/// Older versions to retry when `target` is not available.
///
/// Never proposes anything newer than `target`; results are strictly
/// descending. 11.x and 12.0/12.1 have no fallback.
pub fn fallback_versions(target: VersionTarget) -> Vec<VersionTarget> {
    match (target.major, target.minor) {
        (12, 2) => vec![VersionTarget::new(12, 1)],
        (major, _) if major >= 12 => STABLE_FALLBACKS
            .iter()
            .copied()
            .filter(|v| *v < target)
            .collect(),
        _ => Vec::new(),
    }
}

/// Full ladder for a primary target: target, fallbacks, then the generic
/// toolkit package.
pub fn version_ladder(target: VersionTarget) -> Vec<LadderEntry> {
    std::iter::once(target)
        .chain(fallback_versions(target))
        .map(LadderEntry::Version)
        .chain(std::iter::once(LadderEntry::Generic))
        .collect()
}

/// Build a plan once the primary target is known.
///
/// `resolved` is ignored for `UserChoice::Keep`; for the install choices it
/// must carry the target and its source.
pub fn build_plan(
    request: &PlanRequest,
    resolved: Option<(VersionTarget, TargetSource)>,
) -> ProvisioningPlan {
    let repo_candidates = request.os.repo_candidates();

    let (target, target_source) = match (request.choice, resolved) {
        (UserChoice::Keep, _) | (_, None) => {
            return ProvisioningPlan {
                os: request.os,
                status: PlanStatus::Keep,
                target: None,
                target_source: None,
                repo_candidates,
                version_ladder: Vec::new(),
                warnings: Vec::new(),
            };
        }
        (_, Some(resolved)) => resolved,
    };

    if request.current_installed == Some(target) {
        return ProvisioningPlan {
            os: request.os,
            status: PlanStatus::AlreadyUpToDate,
            target: Some(target),
            target_source: Some(target_source),
            repo_candidates,
            version_ladder: Vec::new(),
            warnings: Vec::new(),
        };
    }

    let warnings = match request.driver_ceiling {
        Some(ceiling) if target > ceiling => vec![PlanWarning::DriverTooOld {
            requested: target,
            driver_ceiling: ceiling,
        }],
        Some(_) => Vec::new(),
        None => vec![PlanWarning::DriverNotDetected],
    };

    ProvisioningPlan {
        os: request.os,
        status: PlanStatus::Install,
        target: Some(target),
        target_source: Some(target_source),
        repo_candidates,
        version_ladder: version_ladder(target),
        warnings,
    }
}

//! Record of an executed provisioning plan.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{ProvisionError, ProvisionResult};
use super::os::{CudaRepoCandidate, OsProfile, PackageArch};
use super::plan::LadderEntry;
use super::version::VersionTarget;

/// What a single attempt tried to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "step", content = "entry")]
pub enum AttemptStep {
    /// Register the repository with the package manager.
    ConfigureRepository,
    /// Install one ladder entry from the repository.
    Install(LadderEntry),
}

/// One step taken by the executor, in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub repo: CudaRepoCandidate,
    pub step: AttemptStep,
    /// Failure reason; `None` when the step succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AttemptRecord {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Repository and ladder entry that produced the installed toolkit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessPoint {
    /// Index of the successful step in `InstallOutcome::attempted`.
    pub attempt: usize,
    pub repo: CudaRepoCandidate,
    pub entry: LadderEntry,
}

/// Result of executing a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallOutcome {
    /// When the outcome was recorded.
    pub recorded_at: DateTime<Utc>,
    pub os: OsProfile,
    /// Every step tried, in order.
    pub attempted: Vec<AttemptRecord>,
    /// Set only when an install step succeeded.
    pub succeeded_at: Option<SuccessPoint>,
    /// Toolkit version on the machine after execution, when known.
    pub final_version: Option<VersionTarget>,
}

impl InstallOutcome {
    pub fn new(os: OsProfile) -> Self {
        Self {
            recorded_at: Utc::now(),
            os,
            attempted: Vec::new(),
            succeeded_at: None,
            final_version: None,
        }
    }

    pub fn record(&mut self, repo: &CudaRepoCandidate, step: AttemptStep, error: Option<String>) {
        self.attempted.push(AttemptRecord {
            repo: repo.clone(),
            step,
            error,
        });
    }

    pub const fn is_success(&self) -> bool {
        self.succeeded_at.is_some()
    }

    /// The attempt record the success point refers to.
    pub fn succeeded_attempt(&self) -> Option<&AttemptRecord> {
        self.succeeded_at
            .as_ref()
            .and_then(|point| self.attempted.get(point.attempt))
    }

    /// Number of package install steps tried, excluding repository setup.
    pub fn install_attempts(&self) -> usize {
        self.attempted
            .iter()
            .filter(|a| matches!(a.step, AttemptStep::Install(_)))
            .count()
    }

    /// Turn a failed outcome into `ExhaustedAllCandidates`.
    pub fn ensure_succeeded(&self, arch: PackageArch) -> ProvisionResult<&SuccessPoint> {
        self.succeeded_at
            .as_ref()
            .ok_or_else(|| ProvisionError::ExhaustedAllCandidates {
                attempts: self.attempted.len(),
                manual_install_url: self.os.manual_install_url(arch),
            })
    }

    /// Write the outcome as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> ProvisionResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ProvisionError::ManifestIo {
                action: "create directory for",
                path: path.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| {
            ProvisionError::ManifestFormat {
                path: path.to_path_buf(),
                source,
            }
        })?;
        fs::write(path, json).map_err(|source| ProvisionError::ManifestIo {
            action: "write",
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a previously saved outcome.
    pub fn load(path: &Path) -> ProvisionResult<Self> {
        let json = fs::read_to_string(path).map_err(|source| ProvisionError::ManifestIo {
            action: "read",
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ProvisionError::ManifestFormat {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> InstallOutcome {
        let repo = CudaRepoCandidate("ubuntu2404".to_string());
        let mut outcome = InstallOutcome::new(OsProfile::ubuntu(24, 4));
        outcome.record(&repo, AttemptStep::ConfigureRepository, None);
        outcome.record(
            &repo,
            AttemptStep::Install(LadderEntry::Version(VersionTarget::new(12, 9))),
            Some("E: Unable to locate package cuda-toolkit-12-9".to_string()),
        );
        outcome.record(
            &repo,
            AttemptStep::Install(LadderEntry::Version(VersionTarget::new(12, 6))),
            None,
        );
        outcome.succeeded_at = Some(SuccessPoint {
            attempt: 2,
            repo,
            entry: LadderEntry::Version(VersionTarget::new(12, 6)),
        });
        outcome.final_version = Some(VersionTarget::new(12, 6));
        outcome
    }

    #[test]
    fn test_outcome_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("install-outcome.json");

        let original = sample();
        original.save(&path).unwrap();
        let loaded = InstallOutcome::load(&path).unwrap();

        assert_eq!(original, loaded);
        assert_eq!(loaded.install_attempts(), 2);
        assert_eq!(loaded.succeeded_at.as_ref().map(|p| p.attempt), Some(2));
    }

    #[test]
    fn test_success_index_points_at_successful_install() {
        let outcome = sample();
        let record = outcome.succeeded_attempt().unwrap();
        assert!(record.succeeded());
        assert_eq!(
            record.step,
            AttemptStep::Install(LadderEntry::Version(VersionTarget::new(12, 6)))
        );
    }

    #[test]
    fn test_failed_outcome_reports_manual_url() {
        let repo = CudaRepoCandidate("rhel9".to_string());
        let mut outcome = InstallOutcome::new(OsProfile::rhel(9, 4));
        outcome.record(&repo, AttemptStep::ConfigureRepository, Some("timeout".into()));

        let err = outcome.ensure_succeeded(PackageArch::X86_64).unwrap_err();
        match err {
            ProvisionError::ExhaustedAllCandidates {
                attempts,
                manual_install_url,
            } => {
                assert_eq!(attempts, 1);
                assert!(manual_install_url.contains("Distribution=RHEL"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_file_is_manifest_error() {
        let dir = tempdir().unwrap();
        let err = InstallOutcome::load(&dir.path().join("absent.json")).unwrap_err();
        match err {
            ProvisionError::ManifestIo { action, source, .. } => {
                assert_eq!(action, "read");
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_corrupt_manifest_keeps_parse_error_as_source() {
        use std::error::Error as _;

        let dir = tempdir().unwrap();
        let path = dir.path().join("install-outcome.json");
        fs::write(&path, "{ not json").unwrap();

        let err = InstallOutcome::load(&path).unwrap_err();
        assert!(matches!(err, ProvisionError::ManifestFormat { .. }));
        let source = err.source().unwrap();
        assert!(source.downcast_ref::<serde_json::Error>().is_some());
    }
}

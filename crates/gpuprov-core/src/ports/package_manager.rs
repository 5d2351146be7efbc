//! Package manager port.
//!
//! The executor drives this port one step at a time. Implementations wrap
//! apt or dnf; tests use mocks or in-memory fakes.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{CudaRepoCandidate, VersionTarget};

/// Failures of a single package manager step. The executor records these
/// and moves on to the next candidate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PackageManagerError {
    /// The repository could not be downloaded or registered.
    #[error("Repository {repo} unreachable: {reason}")]
    RepositoryUnreachable { repo: String, reason: String },

    /// The package does not exist in the configured repositories.
    #[error("Package {package} unavailable: {reason}")]
    PackageUnavailable { package: String, reason: String },

    /// The package manager ran but failed for another reason.
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Port for configuring repositories and installing packages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageManagerPort: Send + Sync {
    /// Register the NVIDIA repository identified by `repo`.
    async fn configure_repository(
        &self,
        repo: &CudaRepoCandidate,
    ) -> Result<(), PackageManagerError>;

    /// Install a package by name (`cuda-toolkit-12-9`, `cuda-toolkit`).
    async fn install_package(&self, package: &str) -> Result<(), PackageManagerError>;

    /// Toolkit version present after an install, used when the installed
    /// package name carries no version.
    async fn installed_toolkit_version(&self) -> Option<VersionTarget>;
}

//! Release index port: which toolkit versions a repository advertises.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{CudaRepoCandidate, VersionTarget};

/// Errors from querying a repository listing.
#[derive(Debug, Error)]
pub enum ReleaseIndexError {
    /// The listing could not be fetched.
    #[error("Repository {repo} unreachable: {reason}")]
    Unreachable { repo: String, reason: String },

    /// The listing was fetched but could not be parsed.
    #[error("Unparseable listing for {repo}: {reason}")]
    Unparseable { repo: String, reason: String },
}

/// Port for looking up the newest toolkit in a repository.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReleaseIndexPort: Send + Sync {
    /// Newest `cuda-toolkit-X-Y` package listed by `repo`.
    ///
    /// `Ok(None)` means the repository answered but lists no versioned
    /// toolkit.
    async fn latest_toolkit(
        &self,
        repo: &CudaRepoCandidate,
    ) -> Result<Option<VersionTarget>, ReleaseIndexError>;
}

//! Error types for provisioning resolution and execution.
//!
//! Per-attempt failures (an unreachable repository, a missing package) are
//! absorbed by the executor and only show up inside an `InstallOutcome`.
//! The variants here are the conditions that reach a caller.

use std::path::PathBuf;

use thiserror::Error;

use crate::paths::PathError;

/// Errors surfaced by the provisioning core.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// A version string could not be parsed as `major.minor`.
    #[error("Invalid CUDA version '{0}' (expected MAJOR.MINOR, e.g. 12.9)")]
    InvalidVersion(String),

    /// The operating system is not one the resolver knows how to target.
    #[error("Unsupported operating system: {0}")]
    UnsupportedOs(String),

    /// Every repository × version combination failed.
    #[error(
        "CUDA installation failed after {attempts} attempt(s). Install manually: {manual_install_url}"
    )]
    ExhaustedAllCandidates {
        attempts: usize,
        manual_install_url: String,
    },

    /// The install outcome manifest could not be read or written.
    #[error("Cannot {action} install manifest {}: {source}", path.display())]
    ManifestIo {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The install outcome manifest is not valid JSON for this version.
    #[error("Malformed install manifest {}: {source}", path.display())]
    ManifestFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Path resolution failed.
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Result type alias for provisioning operations.
pub type ProvisionResult<T> = Result<T, ProvisionError>;

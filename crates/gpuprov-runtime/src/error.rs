//! Error types for the runtime adapters.
//!
//! Keeps error plumbing out of the package manager and prompt modules.
//! Port implementations convert these into the core port errors.

use thiserror::Error;

/// Errors raised while driving the host system.
#[derive(Debug, Error)]
pub enum RuntimeError {
    // === Commands ===
    /// A command exited non-zero
    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// A command could not be started at all
    #[error("Failed to run `{command}`: {reason}")]
    SpawnFailed { command: String, reason: String },

    // === Download ===
    /// Failed to download a file
    #[error("Download failed: {0}")]
    DownloadFailed(String),

    // === Prompt ===
    /// User confirmation was required but not available (non-interactive mode)
    #[error("User confirmation required: {message}")]
    PromptRequired { message: String },

    /// User cancelled the operation
    #[error("Operation cancelled by user")]
    Cancelled,

    // === IO ===
    /// IO operation failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl RuntimeError {
    /// Create a `PromptRequired` error with a message
    pub fn prompt_required(message: impl Into<String>) -> Self {
        Self::PromptRequired {
            message: message.into(),
        }
    }
}

/// Result type alias for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

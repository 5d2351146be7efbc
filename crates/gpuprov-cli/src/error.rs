//! CLI-specific error types and mappings.
//!
//! Maps core, settings, path and runtime errors to exit codes and
//! user-facing messages.

use gpuprov_core::{PathError, ProvisionError, SettingsError, SystemProbeError};
use gpuprov_runtime::RuntimeError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Core domain error.
    #[error("{0}")]
    Core(String),

    /// Every repository and toolkit version failed to install.
    #[error("{message}\nInstall manually: {manual_install_url}")]
    Exhausted {
        message: String,
        manual_install_url: String,
    },

    /// Argument parsing error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Machine probing failed.
    #[error("Detection failed: {0}")]
    Probe(String),

    /// The user declined or input ended.
    #[error("Cancelled")]
    Cancelled,
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Core(_) | Self::Probe(_) => 1,
            Self::Arguments(_) => 2,  // EX_USAGE
            Self::Exhausted { .. } => 69, // EX_UNAVAILABLE
            Self::Io(_) => 74,        // EX_IOERR
            Self::Config(_) => 78,    // EX_CONFIG
            Self::Cancelled => 130,
        }
    }
}

impl From<ProvisionError> for CliError {
    fn from(err: ProvisionError) -> Self {
        match err {
            ProvisionError::ExhaustedAllCandidates {
                attempts,
                manual_install_url,
            } => Self::Exhausted {
                message: format!("CUDA installation failed after {attempts} attempt(s)."),
                manual_install_url,
            },
            ProvisionError::InvalidVersion(_) | ProvisionError::UnsupportedOs(_) => {
                Self::Arguments(err.to_string())
            }
            ProvisionError::ManifestIo { .. } | ProvisionError::ManifestFormat { .. } => {
                Self::Io(err.to_string())
            }
            ProvisionError::Path(path_err) => path_err.into(),
        }
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::NoHomeDir | PathError::NoDataDir | PathError::EmptyPath => {
                Self::Config(err.to_string())
            }
            _ => Self::Io(err.to_string()),
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<SystemProbeError> for CliError {
    fn from(err: SystemProbeError) -> Self {
        Self::Probe(err.to_string())
    }
}

impl From<RuntimeError> for CliError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::Cancelled => Self::Cancelled,
            RuntimeError::PromptRequired { message } => Self::Arguments(format!(
                "'{message}' needs an answer; rerun with a choice flag or --auto"
            )),
            RuntimeError::IoError(e) => Self::Io(e.to_string()),
            other => Self::Core(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Core(format!("JSON encoding failed: {err}"))
    }
}

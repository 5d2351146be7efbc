//! Pure path resolver for testing and CLI introspection.
//!
//! Captures all resolved paths in one call and exposes them via the
//! `gpuprov paths` CLI command.

use std::path::PathBuf;

use super::{PathError, data_root, env_file_path, manifest_path, profile_path};

/// All resolved paths captured in a single struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Root directory for application data
    pub data_root: PathBuf,
    /// User overrides loaded at startup
    pub env_file: PathBuf,
    /// Last install outcome
    pub manifest_path: PathBuf,
    /// Shell profile receiving toolkit exports
    pub profile_path: PathBuf,
}

impl ResolvedPaths {
    /// Resolve all paths using the current environment.
    pub fn resolve() -> Result<Self, PathError> {
        Ok(Self {
            data_root: data_root()?,
            env_file: env_file_path()?,
            manifest_path: manifest_path()?,
            profile_path: profile_path()?,
        })
    }
}

impl std::fmt::Display for ResolvedPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "data_root = {}", self.data_root.display())?;
        writeln!(f, "env_file = {}", self.env_file.display())?;
        writeln!(f, "manifest_path = {}", self.manifest_path.display())?;
        write!(f, "profile_path = {}", self.profile_path.display())
    }
}

//! Shell environment proposed after a toolkit install.
//!
//! Nothing here touches the process environment or any file. The CLI decides
//! whether to write these exports to the shell profile.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::gpu::ComputeCapability;
use super::version::VersionTarget;

/// A single `export KEY="value"` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvExport {
    pub key: String,
    pub value: String,
}

impl EnvExport {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Shell line as written to a profile.
    pub fn to_shell_line(&self) -> String {
        format!("export {}=\"{}\"", self.key, self.value)
    }
}

/// Variables the toolkit needs on `PATH`-style lookups, plus the optional
/// architecture flag for extension builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolkitEnvironment {
    pub cuda_home: PathBuf,
    /// `(variable, capability)`, e.g. `("TORCH_CUDA_ARCH_LIST", "8.9")`.
    pub arch_flag: Option<(String, String)>,
}

impl ToolkitEnvironment {
    /// Build the environment for a toolkit under `cuda_root`.
    ///
    /// A known version maps to the versioned directory (`cuda-12.6`); the
    /// generic package lands in the unversioned `cuda` symlink. The
    /// architecture flag is only proposed when the GPU was classified.
    pub fn for_toolkit(
        cuda_root: &Path,
        version: Option<VersionTarget>,
        capability: Option<ComputeCapability>,
        arch_env_var: &str,
    ) -> Self {
        let cuda_home = match version {
            Some(v) => cuda_root.join(format!("cuda-{v}")),
            None => cuda_root.join("cuda"),
        };
        Self {
            cuda_home,
            arch_flag: capability.map(|c| (arch_env_var.to_string(), c.as_str().to_string())),
        }
    }

    /// Exports in the order they should appear in the profile.
    pub fn exports(&self) -> Vec<EnvExport> {
        let home = self.cuda_home.display();
        let mut exports = vec![
            EnvExport::new("CUDA_HOME", home.to_string()),
            EnvExport::new("PATH", format!("{home}/bin:$PATH")),
            EnvExport::new(
                "LD_LIBRARY_PATH",
                format!("{home}/lib64:${{LD_LIBRARY_PATH:-}}"),
            ),
        ];
        if let Some((key, value)) = &self.arch_flag {
            exports.push(EnvExport::new(key.clone(), value.clone()));
        }
        exports
    }
}

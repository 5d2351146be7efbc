//! Settings domain types and validation.
//!
//! Settings come from built-in defaults overlaid with `GPUPROV_*`
//! environment variables (which `.env` files feed via the CLI). They are
//! passed explicitly to the services that need them.

use serde::{Deserialize, Serialize};

use crate::domain::VersionTarget;

/// Used for `Latest` when no repository reports a version.
pub const DEFAULT_CUDA_VERSION: VersionTarget = VersionTarget::new(12, 9);

/// Base URL of the NVIDIA CUDA package repositories.
pub const DEFAULT_CUDA_REPO_URL: &str = "https://developer.download.nvidia.com/compute/cuda/repos";

/// Variable that receives the compute capability.
pub const DEFAULT_ARCH_ENV_VAR: &str = "TORCH_CUDA_ARCH_LIST";

/// Prefix under which toolkits are installed (`/usr/local/cuda-12.9`).
pub const DEFAULT_CUDA_ROOT: &str = "/usr/local";

pub const ENV_DEFAULT_CUDA: &str = "GPUPROV_DEFAULT_CUDA";
pub const ENV_CUDA_REPO_URL: &str = "GPUPROV_CUDA_REPO_URL";
pub const ENV_ARCH_ENV_VAR: &str = "GPUPROV_ARCH_ENV_VAR";
pub const ENV_CUDA_ROOT: &str = "GPUPROV_CUDA_ROOT";

/// Provisioning settings.
///
/// All fields are optional to support partial overlays and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Fallback target for `Latest`.
    pub default_cuda_version: Option<VersionTarget>,

    /// Repository base URL; repo ids and arch are appended.
    pub cuda_repo_url: Option<String>,

    /// Name of the architecture flag variable.
    pub arch_env_var: Option<String>,

    /// Toolkit install prefix.
    pub cuda_root: Option<String>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            default_cuda_version: Some(DEFAULT_CUDA_VERSION),
            cuda_repo_url: Some(DEFAULT_CUDA_REPO_URL.to_string()),
            arch_env_var: Some(DEFAULT_ARCH_ENV_VAR.to_string()),
            cuda_root: Some(DEFAULT_CUDA_ROOT.to_string()),
        }
    }

    /// Defaults overlaid with the process environment, then validated.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`, then validated.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let mut settings = Self::with_defaults();
        settings.merge(&SettingsUpdate::from_lookup(lookup)?);
        validate_settings(&settings)?;
        Ok(settings)
    }

    #[must_use]
    pub fn effective_default_cuda_version(&self) -> VersionTarget {
        self.default_cuda_version.unwrap_or(DEFAULT_CUDA_VERSION)
    }

    #[must_use]
    pub fn effective_cuda_repo_url(&self) -> &str {
        self.cuda_repo_url
            .as_deref()
            .unwrap_or(DEFAULT_CUDA_REPO_URL)
            .trim_end_matches('/')
    }

    #[must_use]
    pub fn effective_arch_env_var(&self) -> &str {
        self.arch_env_var.as_deref().unwrap_or(DEFAULT_ARCH_ENV_VAR)
    }

    #[must_use]
    pub fn effective_cuda_root(&self) -> &str {
        self.cuda_root.as_deref().unwrap_or(DEFAULT_CUDA_ROOT)
    }

    /// Merge an update into this one, only updating fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(version) = other.default_cuda_version {
            self.default_cuda_version = Some(version);
        }
        if let Some(ref url) = other.cuda_repo_url {
            self.cuda_repo_url = Some(url.clone());
        }
        if let Some(ref var) = other.arch_env_var {
            self.arch_env_var = Some(var.clone());
        }
        if let Some(ref root) = other.cuda_root {
            self.cuda_root = Some(root.clone());
        }
    }
}

/// Partial settings overlay. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub default_cuda_version: Option<VersionTarget>,
    pub cuda_repo_url: Option<String>,
    pub arch_env_var: Option<String>,
    pub cuda_root: Option<String>,
}

impl SettingsUpdate {
    /// Read `GPUPROV_*` values through `lookup`. Blank values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let default_cuda_version = get(ENV_DEFAULT_CUDA)
            .map(|raw| {
                VersionTarget::parse(&raw).map_err(|_| SettingsError::InvalidCudaVersion(raw))
            })
            .transpose()?;

        Ok(Self {
            default_cuda_version,
            cuda_repo_url: get(ENV_CUDA_REPO_URL),
            arch_env_var: get(ENV_ARCH_ENV_VAR),
            cuda_root: get(ENV_CUDA_ROOT),
        })
    }
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Default CUDA version must look like 12.9, got '{0}'")]
    InvalidCudaVersion(String),

    #[error("Repository URL must start with http:// or https://, got '{0}'")]
    InvalidRepoUrl(String),

    #[error("'{0}' is not a valid environment variable name")]
    InvalidEnvVarName(String),

    #[error("CUDA root must be an absolute path, got '{0}'")]
    RelativeCudaRoot(String),
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(url) = &settings.cuda_repo_url
        && !(url.starts_with("https://") || url.starts_with("http://"))
    {
        return Err(SettingsError::InvalidRepoUrl(url.clone()));
    }

    if let Some(var) = &settings.arch_env_var
        && !is_env_var_name(var)
    {
        return Err(SettingsError::InvalidEnvVarName(var.clone()));
    }

    if let Some(root) = &settings.cuda_root
        && !root.starts_with('/')
    {
        return Err(SettingsError::RelativeCudaRoot(root.clone()));
    }

    Ok(())
}

fn is_env_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::with_defaults();
        assert_eq!(settings.effective_default_cuda_version(), VersionTarget::new(12, 9));
        assert_eq!(settings.effective_arch_env_var(), "TORCH_CUDA_ARCH_LIST");
        assert_eq!(settings.effective_cuda_root(), "/usr/local");
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_env_overlay() {
        let settings = Settings::from_lookup(lookup(&[
            (ENV_DEFAULT_CUDA, "12.6"),
            (ENV_CUDA_REPO_URL, "https://mirror.example.com/cuda/repos/"),
            (ENV_ARCH_ENV_VAR, "  "),
        ]))
        .unwrap();

        assert_eq!(settings.effective_default_cuda_version(), VersionTarget::new(12, 6));
        assert_eq!(
            settings.effective_cuda_repo_url(),
            "https://mirror.example.com/cuda/repos"
        );
        // Blank values keep the default.
        assert_eq!(settings.effective_arch_env_var(), DEFAULT_ARCH_ENV_VAR);
    }

    #[test]
    fn test_invalid_default_version() {
        assert_eq!(
            Settings::from_lookup(lookup(&[(ENV_DEFAULT_CUDA, "latest")])),
            Err(SettingsError::InvalidCudaVersion("latest".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let settings = Settings {
            cuda_repo_url: Some("ftp://example.com".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidRepoUrl(_))
        ));

        let settings = Settings {
            arch_env_var: Some("1BAD-NAME".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidEnvVarName(_))
        ));

        let settings = Settings {
            cuda_root: Some("usr/local".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::RelativeCudaRoot(_))
        ));
    }

    #[test]
    fn test_merge_only_touches_some_fields() {
        let mut settings = Settings::with_defaults();
        settings.merge(&SettingsUpdate {
            cuda_root: Some("/opt".to_string()),
            ..Default::default()
        });
        assert_eq!(settings.effective_cuda_root(), "/opt");
        assert_eq!(settings.effective_cuda_repo_url(), DEFAULT_CUDA_REPO_URL);
    }
}

//! `PackageManagerPort` implementation over apt and dnf.
//!
//! Each port call runs its commands one after another and maps failures to
//! `PackageManagerError`, which the executor records before moving on.

pub mod apt;
mod command;
pub mod dnf;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gpuprov_core::ports::{PackageManagerError, PackageManagerPort};
use gpuprov_core::{CudaRepoCandidate, OsFamily, PackageArch, VersionTarget};
use tracing::{debug, info};

pub use command::ShellCommand;

use crate::error::RuntimeError;
use crate::progress::{NoopProgress, ProgressReporter};
use crate::system::{parse_nvcc_release, nvcc_output};

/// Timeout for every HTTP request the adapters make.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// Remove a downloaded keyring package. A missing file is not an error.
pub async fn discard_keyring(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        debug!(path = %path.display(), error = %e, "Could not remove keyring package");
    }
}

/// `{base}/{repo}/{arch}` for a CUDA repository.
pub fn repo_url(base_url: &str, repo: &CudaRepoCandidate, arch: PackageArch) -> String {
    format!(
        "{}/{repo}/{}",
        base_url.trim_end_matches('/'),
        arch.repo_dir()
    )
}

/// Whether privileged commands must go through `sudo`.
pub fn needs_sudo() -> bool {
    #[cfg(unix)]
    {
        !nix::unistd::geteuid().is_root()
    }
    #[cfg(not(unix))]
    {
        false
    }
}

/// Package manager for the host, selected by OS family.
pub struct SystemPackageManager {
    family: OsFamily,
    base_url: String,
    arch: PackageArch,
    cuda_root: PathBuf,
    elevate: bool,
    http: reqwest::Client,
    progress: Arc<dyn ProgressReporter>,
}

impl SystemPackageManager {
    pub fn new(family: OsFamily, base_url: &str, cuda_root: impl Into<PathBuf>) -> Self {
        Self {
            family,
            base_url: base_url.trim_end_matches('/').to_string(),
            arch: PackageArch::current(),
            cuda_root: cuda_root.into(),
            elevate: needs_sudo(),
            http: http_client(REQUEST_TIMEOUT),
            progress: Arc::new(NoopProgress),
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub const fn with_arch(mut self, arch: PackageArch) -> Self {
        self.arch = arch;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = http_client(timeout);
        self
    }

    async fn download_keyring(&self, repo: &CudaRepoCandidate) -> Result<PathBuf, RuntimeError> {
        let url = apt::keyring_url(&repo_url(&self.base_url, repo, self.arch));
        debug!(url = %url, "Downloading CUDA keyring");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| RuntimeError::DownloadFailed(format!("{url}: {e}")))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RuntimeError::DownloadFailed(format!("{url}: {e}")))?;

        let path = apt::keyring_download_path(&std::env::temp_dir(), repo);
        tokio::fs::write(&path, &bytes).await?;
        Ok(path)
    }

    async fn run_all(&self, commands: &[ShellCommand]) -> Result<(), RuntimeError> {
        for cmd in commands {
            cmd.run(self.elevate).await?;
        }
        Ok(())
    }

    fn is_package_missing(&self, stderr: &str) -> bool {
        match self.family {
            OsFamily::Ubuntu => apt::is_package_missing(stderr),
            OsFamily::RhelFamily => dnf::is_package_missing(stderr),
        }
    }
}

#[async_trait]
impl PackageManagerPort for SystemPackageManager {
    async fn configure_repository(
        &self,
        repo: &CudaRepoCandidate,
    ) -> Result<(), PackageManagerError> {
        self.progress
            .start(&format!("Configuring NVIDIA repository {repo}"));

        let result = match self.family {
            OsFamily::Ubuntu => match self.download_keyring(repo).await {
                Ok(keyring) => {
                    self.progress.message(&format!("Registering {repo} keyring"));
                    let registered = self.run_all(&apt::configure_commands(&keyring)).await;
                    discard_keyring(&keyring).await;
                    registered
                }
                Err(e) => Err(e),
            },
            OsFamily::RhelFamily => {
                let url = repo_url(&self.base_url, repo, self.arch);
                self.run_all(&dnf::configure_commands(&url, repo)).await
            }
        };

        match result {
            Ok(()) => {
                self.progress.finish(&format!("Configured {repo}"));
                Ok(())
            }
            Err(e) => {
                self.progress.finish_with_error(&format!("{repo} unavailable"));
                Err(PackageManagerError::RepositoryUnreachable {
                    repo: repo.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    async fn install_package(&self, package: &str) -> Result<(), PackageManagerError> {
        self.progress.start(&format!("Installing {package}"));
        let cmd = match self.family {
            OsFamily::Ubuntu => apt::install_command(package),
            OsFamily::RhelFamily => dnf::install_command(package),
        };

        match cmd.run(self.elevate).await {
            Ok(_) => {
                info!(package = %package, "Package installed");
                self.progress.finish(&format!("Installed {package}"));
                Ok(())
            }
            Err(RuntimeError::CommandFailed { stderr, .. }) if self.is_package_missing(&stderr) => {
                self.progress
                    .finish_with_error(&format!("{package} not in repository"));
                Err(PackageManagerError::PackageUnavailable {
                    package: package.to_string(),
                    reason: stderr,
                })
            }
            Err(e) => {
                self.progress
                    .finish_with_error(&format!("{package} failed"));
                Err(PackageManagerError::CommandFailed(e.to_string()))
            }
        }
    }

    async fn installed_toolkit_version(&self) -> Option<VersionTarget> {
        let cuda_root = self.cuda_root.clone();
        tokio::task::spawn_blocking(move || {
            nvcc_output(&cuda_root).and_then(|out| parse_nvcc_release(&out))
        })
        .await
        .ok()
        .flatten()
    }
}

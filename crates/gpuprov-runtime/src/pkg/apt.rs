//! apt command sequences for Ubuntu.

use std::path::Path;

use gpuprov_core::CudaRepoCandidate;

use super::command::ShellCommand;

/// Keyring package published in every Ubuntu CUDA repository.
pub const KEYRING_PACKAGE: &str = "cuda-keyring_1.1-1_all.deb";

/// URL of the keyring package for `repo`.
pub fn keyring_url(repo_url: &str) -> String {
    format!("{repo_url}/{KEYRING_PACKAGE}")
}

/// Commands that register a repository once its keyring is downloaded.
pub fn configure_commands(keyring: &Path) -> Vec<ShellCommand> {
    vec![
        ShellCommand::new("dpkg", ["-i".to_string(), keyring.display().to_string()]).privileged(),
        update_command(),
    ]
}

pub fn update_command() -> ShellCommand {
    ShellCommand::new("apt-get", ["update"])
        .env("DEBIAN_FRONTEND", "noninteractive")
        .privileged()
}

pub fn install_command(package: &str) -> ShellCommand {
    ShellCommand::new("apt-get", ["install", "-y", package])
        .env("DEBIAN_FRONTEND", "noninteractive")
        .privileged()
}

/// Where the keyring for `repo` is downloaded to.
pub fn keyring_download_path(dir: &Path, repo: &CudaRepoCandidate) -> std::path::PathBuf {
    dir.join(format!("gpuprov-{repo}-{KEYRING_PACKAGE}"))
}

/// Whether apt's stderr means the package does not exist.
pub fn is_package_missing(stderr: &str) -> bool {
    stderr.contains("Unable to locate package")
        || stderr.contains("has no installation candidate")
        || stderr.contains("Couldn't find any package")
}

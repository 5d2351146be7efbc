//! dnf command sequences for RHEL-family systems.

use gpuprov_core::CudaRepoCandidate;

use super::command::ShellCommand;

/// `.repo` file URL for `repo`.
pub fn repo_file_url(repo_url: &str, repo: &CudaRepoCandidate) -> String {
    format!("{repo_url}/cuda-{repo}.repo")
}

pub fn configure_commands(repo_url: &str, repo: &CudaRepoCandidate) -> Vec<ShellCommand> {
    vec![
        ShellCommand::new(
            "dnf",
            [
                "config-manager".to_string(),
                "--add-repo".to_string(),
                repo_file_url(repo_url, repo),
            ],
        )
        .privileged(),
        ShellCommand::new("dnf", ["clean", "expire-cache"]).privileged(),
    ]
}

pub fn install_command(package: &str) -> ShellCommand {
    ShellCommand::new("dnf", ["install", "-y", package]).privileged()
}

/// Whether dnf's stderr means the package does not exist.
pub fn is_package_missing(stderr: &str) -> bool {
    stderr.contains("No match for argument") || stderr.contains("Unable to find a match")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_sequence() {
        let repo = CudaRepoCandidate("rhel9".to_string());
        let rendered: Vec<String> =
            configure_commands("https://example.com/repos/rhel9/x86_64", &repo)
                .iter()
                .map(ToString::to_string)
                .collect();
        assert_eq!(
            rendered,
            vec![
                "dnf config-manager --add-repo https://example.com/repos/rhel9/x86_64/cuda-rhel9.repo",
                "dnf clean expire-cache",
            ]
        );
    }

    #[test]
    fn test_missing_package_detection() {
        assert!(is_package_missing("No match for argument: cuda-toolkit-13-0"));
        assert!(is_package_missing("Error: Unable to find a match: cuda-toolkit-12-1"));
        assert!(!is_package_missing("Curl error (6): Couldn't resolve host name"));
    }

    #[test]
    fn test_install_command() {
        assert_eq!(
            install_command("cuda-toolkit").to_string(),
            "dnf install -y cuda-toolkit"
        );
    }
}

//! Command execution helpers for probing.

use std::process::Command;

/// Run `cmd` with `args` and return stdout, or stderr when stdout is blank.
///
/// `None` when the command is missing or exits non-zero.
pub fn get_command_output(cmd: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(cmd).args(args).output().ok()?;

    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    // Some tools print their banner on stderr
    let text = if stdout.trim().is_empty() {
        stderr
    } else {
        stdout
    };

    Some(text.into_owned())
}

/// Check if a command exists in the system PATH.
pub fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

//! Package manager commands as data.
//!
//! Building commands separately from running them keeps the apt and dnf
//! sequences testable without root or network.

use std::fmt;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::{RuntimeError, RuntimeResult};

/// Lines of stderr kept in error messages.
const STDERR_TAIL_LINES: usize = 5;

/// One external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    /// Needs root; prefixed with `sudo` when not already root.
    pub privileged: bool,
}

impl ShellCommand {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            env: Vec::new(),
            privileged: false,
        }
    }

    #[must_use]
    pub const fn privileged(mut self) -> Self {
        self.privileged = true;
        self
    }

    #[must_use]
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    /// Full argument vector as executed.
    ///
    /// With `elevate`, privileged commands run through `sudo` and their
    /// environment is passed as `KEY=value` arguments, which `sudo` keeps.
    pub fn argv(&self, elevate: bool) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + self.env.len() + 2);
        if elevate && self.privileged {
            argv.push("sudo".to_string());
            argv.extend(self.env.iter().map(|(k, v)| format!("{k}={v}")));
        }
        argv.push(self.program.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// Run to completion and return stdout.
    pub async fn run(&self, elevate: bool) -> RuntimeResult<String> {
        let argv = self.argv(elevate);
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| RuntimeError::SpawnFailed {
                command: String::new(),
                reason: "empty command".to_string(),
            })?;

        debug!(command = %self, elevate, "Running command");

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if !(elevate && self.privileged) {
            cmd.envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        let output = cmd.output().await.map_err(|e| RuntimeError::SpawnFailed {
            command: self.to_string(),
            reason: e.to_string(),
        })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(RuntimeError::CommandFailed {
                command: self.to_string(),
                stderr: stderr_tail(&String::from_utf8_lossy(&output.stderr)),
            })
        }
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv(false).join(" "))
    }
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

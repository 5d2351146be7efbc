//! Progress reporting abstraction for provisioning steps.
//!
//! Lets the package manager adapter report each repository and package step
//! without coupling to a terminal.
//!
//! # Feature Flags
//!
//! - `cli`: Enables `CliProgress` which uses `indicatif` for a terminal spinner.
//!   Without this feature, only `NoopProgress` is available.

/// Trait for receiving progress updates during long-running operations.
pub trait ProgressReporter: Send + Sync {
    /// Called when an operation starts.
    fn start(&self, message: &str);

    /// Replaces the status text of the running operation.
    fn message(&self, msg: &str);

    /// Called when the operation completes successfully.
    fn finish(&self, message: &str);

    /// Called when the operation fails.
    fn finish_with_error(&self, message: &str);
}

/// A no-op progress reporter that ignores all updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn start(&self, _message: &str) {}
    fn message(&self, _msg: &str) {}
    fn finish(&self, _message: &str) {}
    fn finish_with_error(&self, _message: &str) {}
}

/// CLI progress reporter using indicatif.
///
/// This is only available with the `cli` feature flag.
#[cfg(feature = "cli")]
pub mod cli_progress {
    use super::ProgressReporter;
    use indicatif::{ProgressBar, ProgressStyle};
    use std::sync::Mutex;
    use std::time::Duration;

    /// CLI progress reporter with a terminal spinner.
    pub struct CliProgress {
        bar: Mutex<Option<ProgressBar>>,
    }

    impl CliProgress {
        pub fn new() -> Self {
            Self {
                bar: Mutex::new(None),
            }
        }

        fn create_spinner() -> ProgressBar {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) =
                ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")
            {
                pb.set_style(style);
            }
            pb.enable_steady_tick(Duration::from_millis(120));
            pb
        }
    }

    impl Default for CliProgress {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ProgressReporter for CliProgress {
        fn start(&self, message: &str) {
            let pb = Self::create_spinner();
            pb.set_message(message.to_string());

            if let Ok(mut guard) = self.bar.lock() {
                *guard = Some(pb);
            }
        }

        fn message(&self, msg: &str) {
            match self.bar.lock() {
                Ok(guard) if guard.is_some() => {
                    if let Some(ref pb) = *guard {
                        pb.set_message(msg.to_string());
                    }
                }
                _ => println!("{msg}"),
            }
        }

        fn finish(&self, message: &str) {
            if let Ok(mut guard) = self.bar.lock()
                && let Some(pb) = guard.take()
            {
                pb.finish_with_message(message.to_string());
            }
        }

        fn finish_with_error(&self, message: &str) {
            if let Ok(mut guard) = self.bar.lock()
                && let Some(pb) = guard.take()
            {
                pb.abandon_with_message(message.to_string());
            }
        }
    }
}

#[cfg(feature = "cli")]
pub use cli_progress::CliProgress;

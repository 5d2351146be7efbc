//! Host adapters for gpuprov.
//!
//! Implements the `gpuprov-core` ports against the real machine:
//!
//! - [`system::DefaultSystemProbe`] reads `nvidia-smi`, `nvcc` and `/etc/os-release`
//! - [`pkg::SystemPackageManager`] drives apt or dnf
//! - [`release_index::HttpReleaseIndex`] reads the NVIDIA repository listings
//!
//! Terminal interaction is abstracted by [`prompt::InstallPrompt`] and
//! [`progress::ProgressReporter`]; the `cli` feature adds stdin and
//! `indicatif` implementations.

#![deny(unsafe_code)]

pub mod error;
pub mod pkg;
pub mod progress;
pub mod prompt;
pub mod release_index;
pub mod system;

pub use error::{RuntimeError, RuntimeResult};
pub use pkg::SystemPackageManager;
pub use release_index::HttpReleaseIndex;
pub use system::DefaultSystemProbe;

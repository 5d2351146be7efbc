//! Path utilities for gpuprov data files and the shell profile.
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O - adapters handle user prompts separately
//! - OS-specific logic is kept private in `platform`

mod config;
mod error;
mod platform;
mod profile;
mod resolver;

#[cfg(test)]
mod test_utils;

pub use error::PathError;

pub use platform::{DATA_DIR_ENV, data_root};

pub use config::{PROFILE_ENV, env_file_path, manifest_path, profile_path};

pub use profile::{merge_exports, persist_exports};

pub use resolver::ResolvedPaths;

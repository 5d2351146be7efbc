//! `gpuprov` command-line adapter.
//!
//! Parses arguments, composes the runtime adapters with the core services
//! in [`bootstrap`], and renders results for the terminal.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary target.
use anyhow as _;
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliContext, bootstrap, bootstrap_from_env};
pub use commands::{ChoiceArgs, Commands};
pub use error::CliError;
pub use parser::Cli;

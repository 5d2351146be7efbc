//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub fn execute(ctx: &CliContext, ...) -> Result<(), CliError>`
//!   (async where the command touches the network or the package manager)
//! - Thin wrappers that:
//!   1. Parse/validate CLI-specific input
//!   2. Call core services through the context
//!   3. Format output for the terminal
//!
//! Handlers should NOT contain planning logic; that lives in `gpuprov-core`.

pub mod classify;
pub mod detect;
pub mod install;
pub mod outcome;
pub mod paths;
pub mod plan;

//! Paths command handler.
//!
//! Displays all resolved paths for diagnostics and debugging.

use gpuprov_core::paths::ResolvedPaths;

use crate::error::CliError;

/// Execute the paths command.
///
/// Resolves and displays every file location gpuprov reads or writes,
/// in `key = value` format.
pub fn execute() -> Result<(), CliError> {
    let paths = ResolvedPaths::resolve()?;
    println!("{paths}");
    Ok(())
}

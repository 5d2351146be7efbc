//! Outcome command handler.
//!
//! Shows the manifest written by the last `gpuprov install`.

use gpuprov_core::{InstallOutcome, manifest_path};

use crate::error::CliError;
use crate::presentation::render_outcome;

/// Execute the outcome command.
pub fn execute(json: bool) -> Result<(), CliError> {
    let path = manifest_path()?;
    if !path.exists() {
        println!("No install recorded yet ({} does not exist)", path.display());
        return Ok(());
    }

    let outcome = InstallOutcome::load(&path)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", render_outcome(&outcome));
    }
    Ok(())
}

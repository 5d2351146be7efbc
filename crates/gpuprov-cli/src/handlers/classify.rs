//! Classify command handler.

use gpuprov_core::classify;

/// Print the compute capability for `name`, or `unknown`.
pub fn execute(name: &str) {
    println!("{}", describe(name));
}

fn describe(name: &str) -> String {
    classify(name).map_or_else(
        || "unknown".to_string(),
        |c| format!("{c} ({}, {})", c.family(), c.sm_name()),
    )
}

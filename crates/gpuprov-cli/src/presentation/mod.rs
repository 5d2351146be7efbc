//! Shared CLI presentation utilities.
//!
//! Format-only helpers: handlers pass domain values in and print the
//! returned strings. Nothing here decides anything.

pub mod plan_display;
pub mod tables;

pub use plan_display::{render_detection, render_outcome, render_plan};
pub use tables::format_optional;

//! Table formatting utilities for CLI output.

/// Format an optional value for table display, returning a default if None.
///
/// # Examples
///
/// ```rust
/// use gpuprov_cli::presentation::format_optional;
///
/// assert_eq!(format_optional(&Some(12), "none"), "12");
/// assert_eq!(format_optional::<u32>(&None, "none"), "none");
/// ```
pub fn format_optional<T: std::fmt::Display>(value: &Option<T>, default: &str) -> String {
    match value {
        Some(v) => v.to_string(),
        None => default.to_string(),
    }
}

/// A `label: value` row padded to a fixed label column.
pub fn row(label: &str, value: impl std::fmt::Display) -> String {
    format!("{label:<18} {value}")
}

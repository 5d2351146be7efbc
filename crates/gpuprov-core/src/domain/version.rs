//! CUDA toolkit version targets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::ProvisionError;

/// A CUDA toolkit version expressed as `major.minor`.
///
/// Ordering is lexicographic on `(major, minor)`, so `12.10 > 12.9`.
/// Serialized as the dotted string (`"12.9"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionTarget {
    pub major: u32,
    pub minor: u32,
}

impl VersionTarget {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse a version string into a target.
    ///
    /// Accepts `12.9`, `12.9.1`, `v12.9` and `12.0-rc1`; only the leading
    /// numeric portion of each component is used.
    pub fn parse(raw: &str) -> Result<Self, ProvisionError> {
        parse_version_tuple(raw.trim().trim_start_matches('v'))
            .map(|(major, minor)| Self::new(major, minor))
            .ok_or_else(|| ProvisionError::InvalidVersion(raw.to_string()))
    }

    /// Package-name suffix used by the NVIDIA repositories (`12-9`).
    pub fn package_suffix(&self) -> String {
        format!("{}-{}", self.major, self.minor)
    }
}

impl fmt::Display for VersionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for VersionTarget {
    type Err = ProvisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VersionTarget {
    type Error = ProvisionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VersionTarget> for String {
    fn from(value: VersionTarget) -> Self {
        value.to_string()
    }
}

/// Parse a version string into a (major, minor) tuple.
fn parse_version_tuple(version_str: &str) -> Option<(u32, u32)> {
    let mut parts = version_str.split('.');
    let parse_numeric = |part: &str| -> Option<u32> {
        let numeric_str: String = part.chars().take_while(char::is_ascii_digit).collect();
        numeric_str.parse::<u32>().ok()
    };
    let major = parse_numeric(parts.next()?)?;
    let minor = parse_numeric(parts.next()?)?;
    Some((major, minor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_common_forms() {
        assert_eq!(VersionTarget::parse("12.9").unwrap(), VersionTarget::new(12, 9));
        assert_eq!(VersionTarget::parse("12.4.1").unwrap(), VersionTarget::new(12, 4));
        assert_eq!(VersionTarget::parse("v11.8").unwrap(), VersionTarget::new(11, 8));
        assert_eq!(VersionTarget::parse("12.0-rc1").unwrap(), VersionTarget::new(12, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(VersionTarget::parse("twelve").is_err());
        assert!(VersionTarget::parse("12").is_err());
        assert!(VersionTarget::parse("").is_err());
    }

    #[test]
    fn test_ordering_is_numeric() {
        assert!(VersionTarget::new(12, 10) > VersionTarget::new(12, 9));
        assert!(VersionTarget::new(13, 0) > VersionTarget::new(12, 9));
        assert!(VersionTarget::new(11, 8) < VersionTarget::new(12, 0));
    }

    #[test]
    fn test_package_suffix() {
        assert_eq!(VersionTarget::new(12, 9).package_suffix(), "12-9");
    }

    #[test]
    fn test_serializes_as_dotted_string() {
        let json = serde_json::to_string(&VersionTarget::new(12, 6)).unwrap();
        assert_eq!(json, "\"12.6\"");
        let back: VersionTarget = serde_json::from_str(&json).unwrap();
        assert_eq!(back, VersionTarget::new(12, 6));
    }
}

//! `/etc/os-release` discovery.

use std::fs;

use gpuprov_core::OsProfile;
use gpuprov_core::ports::{SystemProbeError, SystemProbeResult};

const OS_RELEASE_PATHS: [&str; 2] = ["/etc/os-release", "/usr/lib/os-release"];

/// Read the first available os-release file and build the profile.
pub fn detect_os_profile() -> SystemProbeResult<OsProfile> {
    let content = OS_RELEASE_PATHS
        .iter()
        .find_map(|path| fs::read_to_string(path).ok())
        .ok_or_else(|| {
            SystemProbeError::OsDetectionFailed(format!(
                "none of {} is readable",
                OS_RELEASE_PATHS.join(", ")
            ))
        })?;

    OsProfile::from_os_release(&content)
        .map_err(|e| SystemProbeError::OsDetectionFailed(e.to_string()))
}

//! Operating system profile and CUDA repository naming.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::ProvisionError;

/// Oldest Ubuntu LTS year the NVIDIA repositories are probed for.
pub const UBUNTU_FLOOR_MAJOR: u32 = 22;

/// Oldest RHEL-family major release the NVIDIA repositories are probed for.
pub const RHEL_FLOOR_MAJOR: u32 = 9;

const MANUAL_INSTALL_BASE: &str = "https://developer.nvidia.com/cuda-downloads";

/// Distribution family; decides package manager and repository naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsFamily {
    /// Ubuntu (apt, `ubuntuYYMM` repositories)
    Ubuntu,
    /// RHEL, Rocky, Alma, CentOS Stream, Oracle Linux (dnf, `rhelN` repositories)
    RhelFamily,
}

impl OsFamily {
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Ubuntu => "Ubuntu",
            Self::RhelFamily => "RHEL",
        }
    }

    /// Package manager command used for this family.
    pub const fn package_manager(&self) -> &'static str {
        match self {
            Self::Ubuntu => "apt-get",
            Self::RhelFamily => "dnf",
        }
    }
}

/// Target machine operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsProfile {
    pub family: OsFamily,
    pub version_major: u32,
    pub version_minor: u32,
}

impl OsProfile {
    pub const fn ubuntu(major: u32, minor: u32) -> Self {
        Self {
            family: OsFamily::Ubuntu,
            version_major: major,
            version_minor: minor,
        }
    }

    pub const fn rhel(major: u32, minor: u32) -> Self {
        Self {
            family: OsFamily::RhelFamily,
            version_major: major,
            version_minor: minor,
        }
    }

    /// Repository id for exactly this release (`ubuntu2404`, `rhel9`).
    pub fn exact_repo(&self) -> CudaRepoCandidate {
        match self.family {
            OsFamily::Ubuntu => ubuntu_repo(self.version_major, self.version_minor),
            OsFamily::RhelFamily => CudaRepoCandidate(format!("rhel{}", self.version_major)),
        }
    }

    /// Repository candidates to try, newest first.
    ///
    /// Ubuntu walks back two years at a time through the LTS releases down
    /// to 22.04, emitting the `YY.10` and `YY.04` releases of each skipped
    /// year on the way, so every entry is older than the one before it.
    /// RHEL-family walks back one major release at a time down to 9. The
    /// exact release is always first, even when it is below the floor.
    pub fn repo_candidates(&self) -> Vec<CudaRepoCandidate> {
        let mut candidates = vec![self.exact_repo()];

        match self.family {
            OsFamily::Ubuntu => {
                let exact = (self.version_major, self.version_minor);
                let mut year = self.version_major;
                while year >= UBUNTU_FLOOR_MAJOR {
                    let releases: &[u32] = if year % 2 == 0 { &[4] } else { &[10, 4] };
                    for &minor in releases {
                        if (year, minor) < exact {
                            candidates.push(ubuntu_repo(year, minor));
                        }
                    }
                    year -= 1;
                }
            }
            OsFamily::RhelFamily => {
                let mut major = self.version_major;
                while major > RHEL_FLOOR_MAJOR {
                    major -= 1;
                    candidates.push(CudaRepoCandidate(format!("rhel{major}")));
                }
            }
        }

        dedup_preserving_order(candidates)
    }

    /// NVIDIA download page preselected for this OS, shown when every
    /// automatic attempt failed.
    pub fn manual_install_url(&self, arch: PackageArch) -> String {
        match self.family {
            OsFamily::Ubuntu => format!(
                "{MANUAL_INSTALL_BASE}?target_os=Linux&target_arch={}&Distribution=Ubuntu&target_version={}.{:02}&target_type=deb_network",
                arch.download_arch(),
                self.version_major,
                self.version_minor
            ),
            OsFamily::RhelFamily => format!(
                "{MANUAL_INSTALL_BASE}?target_os=Linux&target_arch={}&Distribution=RHEL&target_version={}&target_type=rpm_network",
                arch.download_arch(),
                self.version_major
            ),
        }
    }

    /// Build a profile from the contents of `/etc/os-release`.
    pub fn from_os_release(content: &str) -> Result<Self, ProvisionError> {
        let mut id = String::new();
        let mut id_like = String::new();
        let mut version_id = String::new();

        for line in content.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').trim_matches('\'');
            match key.trim() {
                "ID" => id = value.to_lowercase(),
                "ID_LIKE" => id_like = value.to_lowercase(),
                "VERSION_ID" => version_id = value.to_string(),
                _ => {}
            }
        }

        let family = family_for(&id, &id_like)
            .ok_or_else(|| ProvisionError::UnsupportedOs(format!("{id} {version_id}").trim().to_string()))?;
        let (major, minor) = parse_os_version(&version_id)
            .ok_or_else(|| ProvisionError::UnsupportedOs(format!("{id} (VERSION_ID '{version_id}')")))?;

        Ok(Self {
            family,
            version_major: major,
            version_minor: minor,
        })
    }
}

impl fmt::Display for OsProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.family {
            OsFamily::Ubuntu => write!(
                f,
                "Ubuntu {}.{:02}",
                self.version_major, self.version_minor
            ),
            OsFamily::RhelFamily => write!(
                f,
                "RHEL-family {}.{}",
                self.version_major, self.version_minor
            ),
        }
    }
}

/// Parses `ubuntu:24.04`, `rhel:9`, `rocky:9.3` and similar.
impl FromStr for OsProfile {
    type Err = ProvisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, version) = s
            .split_once(':')
            .ok_or_else(|| ProvisionError::UnsupportedOs(format!("{s} (expected ID:VERSION)")))?;
        let id = id.trim().to_lowercase();
        let family =
            family_for(&id, "").ok_or_else(|| ProvisionError::UnsupportedOs(id.clone()))?;
        let (major, minor) = parse_os_version(version.trim())
            .ok_or_else(|| ProvisionError::UnsupportedOs(s.to_string()))?;
        Ok(Self {
            family,
            version_major: major,
            version_minor: minor,
        })
    }
}

/// An OS-version-scoped NVIDIA package repository id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CudaRepoCandidate(pub String);

impl CudaRepoCandidate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CudaRepoCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// CPU architecture as named by the NVIDIA repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageArch {
    X86_64,
    Sbsa,
}

impl PackageArch {
    /// Architecture of the running binary.
    pub fn current() -> Self {
        if cfg!(target_arch = "aarch64") {
            Self::Sbsa
        } else {
            Self::X86_64
        }
    }

    /// Directory name inside a repository (`.../ubuntu2204/x86_64/`).
    pub const fn repo_dir(&self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Sbsa => "sbsa",
        }
    }

    /// `target_arch` value on the NVIDIA download page.
    pub const fn download_arch(&self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Sbsa => "arm64-sbsa",
        }
    }
}

fn ubuntu_repo(major: u32, minor: u32) -> CudaRepoCandidate {
    CudaRepoCandidate(format!("ubuntu{major}{minor:02}"))
}

fn family_for(id: &str, id_like: &str) -> Option<OsFamily> {
    match id {
        "ubuntu" => Some(OsFamily::Ubuntu),
        "rhel" | "rocky" | "almalinux" | "centos" | "ol" => Some(OsFamily::RhelFamily),
        _ if id_like.split_whitespace().any(|like| like == "rhel") => Some(OsFamily::RhelFamily),
        _ => None,
    }
}

fn parse_os_version(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.split('.');
    let major = parts.next()?.trim().parse().ok()?;
    let minor = match parts.next() {
        Some(minor) => minor.trim().parse().ok()?,
        None => 0,
    };
    Some((major, minor))
}

fn dedup_preserving_order(candidates: Vec<CudaRepoCandidate>) -> Vec<CudaRepoCandidate> {
    let mut seen = std::collections::HashSet::new();
    candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate.clone()))
        .collect()
}

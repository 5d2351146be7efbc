//! GPU architecture classification.
//!
//! Maps the free-form GPU name reported by the driver to a CUDA compute
//! capability using an ordered rule table. The first matching rule wins,
//! so more specific names must be listed before their generic prefixes
//! (an "RTX 6000 Ada" is 8.9, a plain "Quadro RTX 6000" is 7.5).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::version::VersionTarget;

/// What the driver utility reported about the installed GPU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpuProbe {
    /// GPU model string, e.g. "NVIDIA GeForce RTX 4090".
    pub raw_name: String,
    /// Highest CUDA version the installed driver advertises.
    pub driver_cuda_version: Option<VersionTarget>,
}

impl GpuProbe {
    pub fn new(raw_name: impl Into<String>, driver_cuda_version: Option<VersionTarget>) -> Self {
        Self {
            raw_name: raw_name.into(),
            driver_cuda_version,
        }
    }

    /// Classify this GPU. See [`classify`].
    pub fn compute_capability(&self) -> Option<ComputeCapability> {
        classify(&self.raw_name)
    }
}

/// CUDA compute capability levels the resolver knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComputeCapability {
    /// Volta (V100)
    #[serde(rename = "7.0")]
    Sm70,
    /// Turing (T4, Quadro RTX)
    #[serde(rename = "7.5")]
    Sm75,
    /// Ampere data center (A100, A30)
    #[serde(rename = "8.0")]
    Sm80,
    /// Ampere consumer and workstation (RTX 30xx, RTX A-series, A10, A40)
    #[serde(rename = "8.6")]
    Sm86,
    /// Ada Lovelace (RTX 40xx, L4, L40, RTX Ada)
    #[serde(rename = "8.9")]
    Sm89,
    /// Hopper (H100, H200, GH200)
    #[serde(rename = "9.0")]
    Sm90,
    /// Blackwell data center (B200)
    #[serde(rename = "10.0")]
    Sm100,
    /// Blackwell consumer (RTX 5090)
    #[serde(rename = "12.0")]
    Sm120,
}

impl ComputeCapability {
    /// Dotted capability string, as consumed by `TORCH_CUDA_ARCH_LIST`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sm70 => "7.0",
            Self::Sm75 => "7.5",
            Self::Sm80 => "8.0",
            Self::Sm86 => "8.6",
            Self::Sm89 => "8.9",
            Self::Sm90 => "9.0",
            Self::Sm100 => "10.0",
            Self::Sm120 => "12.0",
        }
    }

    /// Compiler target name (`sm_89`).
    pub fn sm_name(&self) -> String {
        format!("sm_{}", self.as_str().replace('.', ""))
    }

    /// Marketing name of the architecture family.
    pub const fn family(&self) -> &'static str {
        match self {
            Self::Sm70 => "Volta",
            Self::Sm75 => "Turing",
            Self::Sm80 | Self::Sm86 => "Ampere",
            Self::Sm89 => "Ada Lovelace",
            Self::Sm90 => "Hopper",
            Self::Sm100 | Self::Sm120 => "Blackwell",
        }
    }
}

impl fmt::Display for ComputeCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Substring predicate over an upper-cased GPU name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePredicate {
    /// Name contains the needle.
    Contains(&'static str),
    /// Name contains at least one of the needles.
    ContainsAny(&'static [&'static str]),
    /// Name contains every needle.
    ContainsAll(&'static [&'static str]),
    /// Name contains one of `any` and does not contain `excluded`.
    ContainsButNot {
        any: &'static [&'static str],
        excluded: &'static str,
    },
    /// At least one nested predicate matches.
    AnyOf(&'static [NamePredicate]),
}

impl NamePredicate {
    /// Evaluate against a name that has already been upper-cased.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Contains(needle) => name.contains(needle),
            Self::ContainsAny(needles) => needles.iter().any(|n| name.contains(n)),
            Self::ContainsAll(needles) => needles.iter().all(|n| name.contains(n)),
            Self::ContainsButNot { any, excluded } => {
                any.iter().any(|n| name.contains(n)) && !name.contains(excluded)
            }
            Self::AnyOf(predicates) => predicates.iter().any(|p| p.matches(name)),
        }
    }
}

/// One row of the classification table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityRule {
    pub predicate: NamePredicate,
    pub capability: ComputeCapability,
}

const QUADRO_RTX: &[&str] = &["RTX 5000", "RTX 4000", "RTX 6000"];

/// Ordered classification rules. Do not reorder: several needles overlap.
pub const CAPABILITY_RULES: &[CapabilityRule] = &[
    CapabilityRule {
        predicate: NamePredicate::Contains("V100"),
        capability: ComputeCapability::Sm70,
    },
    CapabilityRule {
        predicate: NamePredicate::AnyOf(&[
            NamePredicate::Contains("T4"),
            NamePredicate::ContainsButNot {
                any: QUADRO_RTX,
                excluded: "ADA",
            },
        ]),
        capability: ComputeCapability::Sm75,
    },
    CapabilityRule {
        predicate: NamePredicate::ContainsAny(&["A100", "A30"]),
        capability: ComputeCapability::Sm80,
    },
    CapabilityRule {
        predicate: NamePredicate::ContainsAny(&[
            "RTX 3090", "3090", "RTX 3080", "3080", "RTX 3070", "3070", "RTX A6000", "A6000",
            "RTX A5000", "A5000", "RTX A4500", "A4500", "RTX A4000", "A4000", "RTX A2000",
            "A2000", "A10", "A40",
        ]),
        capability: ComputeCapability::Sm86,
    },
    CapabilityRule {
        predicate: NamePredicate::AnyOf(&[
            NamePredicate::ContainsAny(&[
                "RTX 4090",
                "4090",
                "RTX 4070 TI",
                "4070 TI",
                "L40S",
                "L40",
                "L4",
            ]),
            NamePredicate::ContainsAll(&["RTX 6000", "ADA"]),
            NamePredicate::ContainsAll(&["RTX 5000", "ADA"]),
            NamePredicate::ContainsAll(&["RTX 4000", "ADA"]),
        ]),
        capability: ComputeCapability::Sm89,
    },
    CapabilityRule {
        predicate: NamePredicate::ContainsAny(&["H100", "H200", "GH200"]),
        capability: ComputeCapability::Sm90,
    },
    CapabilityRule {
        predicate: NamePredicate::Contains("B200"),
        capability: ComputeCapability::Sm100,
    },
    CapabilityRule {
        predicate: NamePredicate::ContainsAny(&["RTX 5090", "5090"]),
        capability: ComputeCapability::Sm120,
    },
];

/// Classify a GPU name into a compute capability.
///
/// Returns `None` when no rule matches; callers fall back to toolchain
/// defaults and do not export an architecture flag.
pub fn classify(raw_gpu_name: &str) -> Option<ComputeCapability> {
    classify_with(CAPABILITY_RULES, raw_gpu_name)
}

/// Classify against an explicit rule table.
pub fn classify_with(rules: &[CapabilityRule], raw_gpu_name: &str) -> Option<ComputeCapability> {
    let name = raw_gpu_name.to_uppercase();
    rules
        .iter()
        .find(|rule| rule.predicate.matches(&name))
        .map(|rule| rule.capability)
}

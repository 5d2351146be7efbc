//! Core domain types.
//!
//! These types represent the pure domain model, independent of any
//! infrastructure concerns (subprocesses, HTTP, package managers).
//!
//! # Structure
//!
//! - `gpu` - GPU probe and compute capability classification
//! - `os` - OS profile and CUDA repository candidates
//! - `version` - CUDA toolkit version targets
//! - `plan` - Version ladder and provisioning plans
//! - `outcome` - Record of an executed plan
//! - `environment` - Shell exports proposed after an install

pub mod environment;
pub mod errors;
pub mod gpu;
pub mod os;
pub mod outcome;
pub mod plan;
pub mod version;

pub use environment::{EnvExport, ToolkitEnvironment};
pub use errors::{ProvisionError, ProvisionResult};
pub use gpu::{
    CAPABILITY_RULES, CapabilityRule, ComputeCapability, GpuProbe, NamePredicate, classify,
    classify_with,
};
pub use os::{CudaRepoCandidate, OsFamily, OsProfile, PackageArch};
pub use outcome::{AttemptRecord, AttemptStep, InstallOutcome, SuccessPoint};
pub use plan::{
    LadderEntry, PlanRequest, PlanStatus, PlanWarning, ProvisioningPlan, TargetSource,
    UserChoice, build_plan, fallback_versions, version_ladder,
};
pub use version::VersionTarget;

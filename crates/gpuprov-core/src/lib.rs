//! Core domain for gpuprov: GPU classification, CUDA repository and version
//! resolution, and the plan executor.
//!
//! This crate is pure. It owns the domain types, the ports that adapters
//! implement, and the services that orchestrate them. Subprocesses, HTTP
//! and terminal I/O live in `gpuprov-runtime` and `gpuprov-cli`.
//!
//! ```ignore
//! let resolver = ResolverService::new(index, settings.effective_default_cuda_version());
//! let plan = resolver.plan(&request).await;
//! let outcome = PlanExecutor::new(packages).execute(&plan).await;
//! outcome.ensure_succeeded(PackageArch::current())?;
//! ```

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod paths;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    AttemptRecord, AttemptStep, ComputeCapability, CudaRepoCandidate, EnvExport, GpuProbe,
    InstallOutcome, LadderEntry, OsFamily, OsProfile, PackageArch, PlanRequest, PlanStatus,
    PlanWarning, ProvisionError, ProvisionResult, ProvisioningPlan, SuccessPoint, TargetSource,
    ToolkitEnvironment, UserChoice, VersionTarget, build_plan, classify,
};
pub use ports::{
    PackageManagerError, PackageManagerPort, ReleaseIndexError, ReleaseIndexPort,
    SystemProbeError, SystemProbePort, SystemProbeResult,
};
pub use services::{PlanExecutor, ResolverService};
pub use settings::{Settings, SettingsError, SettingsUpdate, validate_settings};

// Re-export path utilities
pub use paths::{
    PathError, ResolvedPaths, data_root, env_file_path, manifest_path, persist_exports,
    profile_path,
};

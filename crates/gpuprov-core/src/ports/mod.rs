//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No process or HTTP types in any signature
//! - One intent per method; adapters decide how to carry it out
//! - Per-step failures are values, never panics

pub mod package_manager;
pub mod release_index;
pub mod system_probe;

pub use package_manager::{PackageManagerError, PackageManagerPort};
pub use release_index::{ReleaseIndexError, ReleaseIndexPort};
pub use system_probe::{SystemProbeError, SystemProbePort, SystemProbeResult};

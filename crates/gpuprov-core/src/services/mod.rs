//! Core services - the application's business logic layer.
//!
//! This module contains high-level service abstractions that orchestrate
//! between ports (trait interfaces) and domain logic. Services here are
//! pure orchestrators - they don't know about concrete implementations.

mod executor;
mod resolver;

pub use executor::PlanExecutor;
pub use resolver::ResolverService;

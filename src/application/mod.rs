//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `ConvergeUseCase` - Drives bucket, objects, policy, distribution and
//!   invalidation to the site manifest (plan, dry run, apply)

pub mod converge;

pub use converge::{
    ConvergeOptions, ConvergePlan, ConvergeReport, ConvergeUseCase, DistributionAction,
    InvalidationOutcome, Mutation,
};

//! Domain Services
//!
//! Pure business logic services that operate on domain entities.
//! These services have no I/O dependencies and are easily testable.

mod invalidation_planner;
mod publish_planner;

pub use invalidation_planner::{FingerprintDelta, InvalidationPlanner};
pub use publish_planner::{ObjectAction, PlannedObject, PublishPlan, PublishPlanner};

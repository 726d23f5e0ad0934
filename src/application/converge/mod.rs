//! Converge Module
//!
//! Orchestrates a convergence run for Sitefront.
//!
//! ## Structure
//!
//! - `options` - Configuration types (`ConvergeOptions`)
//! - `plan` - Read-only plan (`ConvergePlan`)
//! - `result` - Result types (`ConvergeReport`, `Mutation`)
//! - `use_case` - Core use case logic (`ConvergeUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use sitefront::application::converge::{ConvergeOptions, ConvergeUseCase};
//!
//! let use_case = ConvergeUseCase::new(assets, store, network, state_repo);
//! let report = use_case.execute(&ConvergeOptions::new(source, state_path, settings))?;
//! ```

mod options;
mod plan;
mod result;
mod use_case;

pub use options::{ConvergeOptions, DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT};
pub use plan::{ConvergePlan, DistributionAction};
pub use result::{ConvergeReport, InvalidationOutcome, Mutation};
pub use use_case::ConvergeUseCase;

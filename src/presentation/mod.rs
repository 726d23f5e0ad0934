//! Presentation Layer
//!
//! This layer handles:
//! - Choosing the provider named by the configuration
//! - Creating use cases with infrastructure dependencies
//!
//! ## Usage
//!
//! ```ignore
//! use sitefront::presentation::factory::{self, Provider};
//!
//! match factory::open_provider(&config, &root)? {
//!     Provider::Local(cloud) => {
//!         let use_case = factory::create_converge_use_case(cloud.clone(), cloud);
//!         use_case.execute(&options)?;
//!     }
//! }
//! ```

pub mod factory;

pub use factory::{create_converge_use_case, open_provider, Provider};

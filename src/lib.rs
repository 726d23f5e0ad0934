//! Sitefront - static site convergence onto object storage behind a CDN
//!
//! Sitefront fingerprints a local site directory, publishes changed files to
//! a private bucket, binds the bucket to a single CDN distribution through an
//! origin access control, and invalidates only the paths whose content
//! changed. Running it twice without changes makes no remote writes.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{ConvergeOptions, ConvergePlan, ConvergeReport, ConvergeUseCase};
pub use config::Config;
pub use domain::entities::{SiteManifest, SiteSettings};
pub use error::{SitefrontError, SitefrontResult};

//! Configuration module for Sitefront
//!
//! Configuration precedence:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (SITEFRONT_*)
//! 3. Project config (site.toml)
//! 4. Built-in defaults (lowest priority)

mod env_validator;
mod loader;
mod types;

pub use crate::domain::value_objects::ConfigWarning;
pub use env_validator::{nearest_match, EnvChoice};
pub use loader::{template, with_env_overrides};

pub use types::{
    BucketConfig, Config, DistributionConfig, InvalidationConfig, ProviderConfig, ProviderKind,
    SiteConfig, StateConfig, CONFIG_FILE,
};

//! End-to-end scenarios for Sitefront.
//!
//! Each scenario drives the CLI through several runs against the local
//! provider, the way a site owner would over time.
//!
//! Run with: `cargo test --test scenarios`

mod common;

#[path = "scenarios/site_lifecycle.rs"]
mod site_lifecycle;

#[path = "scenarios/ci_pipeline.rs"]
mod ci_pipeline;

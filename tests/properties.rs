//! Property tests for Sitefront.
//!
//! Properties use randomized input generation to explore edge cases and
//! protect invariants like "never panics" and "same content, same fingerprint".
//!
//! Run with: `cargo test --test properties`

#[path = "properties/fingerprint.rs"]
mod fingerprint;

#[path = "properties/object_key.rs"]
mod object_key;

#[path = "properties/invalidation_scope.rs"]
mod invalidation_scope;

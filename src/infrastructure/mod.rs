//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Local file system access
//! - `repositories/` - Site source and state file
//! - `cloud/` - Object store and delivery network providers
//! - `events/` - Converge event sinks

pub mod cloud;
pub mod events;
pub mod fs;
pub mod repositories;

pub use cloud::SimulatedCloud;
#[cfg(feature = "aws")]
pub use cloud::AwsCloud;
pub use events::{ConsoleEventSink, JsonEventSink};
pub use fs::LocalFs;
pub use repositories::{FsAssetSource, StateLock, TomlStateRepository, DEFAULT_STATE_PATH};

//! Repository Implementations
//!
//! Concrete implementations of domain repository ports.

mod asset;
mod state;

pub use asset::{FsAssetSource, SITE_IGNORE_FILE};
pub use state::{StateLock, TomlStateRepository, DEFAULT_STATE_PATH};

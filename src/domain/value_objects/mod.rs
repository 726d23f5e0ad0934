//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod config_warning;
mod fingerprint;
mod media_type;
mod object_key;

pub use config_warning::ConfigWarning;
pub use fingerprint::Fingerprint;
pub use media_type::{MediaType, OCTET_STREAM};
pub use object_key::{KeyError, ObjectKey};

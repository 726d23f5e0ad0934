//! Content Fingerprint Value Object
//!
//! A validated, immutable hash representing the content of an asset.
//! Used for change detection against published objects and recorded state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Content fingerprint value object
///
/// Wraps a SHA-256 hash string with the `sha256:` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Prefix for SHA-256 fingerprints
    pub const PREFIX: &'static str = "sha256:";

    /// Create a Fingerprint from a raw hash string (with or without prefix)
    pub fn new(raw_hash: &str) -> Self {
        if raw_hash.starts_with(Self::PREFIX) {
            Self(raw_hash.to_string())
        } else {
            Self(format!("{}{}", Self::PREFIX, raw_hash))
        }
    }

    /// Compute the fingerprint of raw bytes
    pub fn from_bytes(content: &[u8]) -> Self {
        use sha2::{Digest, Sha256};
        let hash = Sha256::digest(content);
        Self(format!("{}{:x}", Self::PREFIX, hash))
    }

    /// Full fingerprint string with prefix
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hex digest without prefix
    pub fn hex(&self) -> &str {
        self.0.strip_prefix(Self::PREFIX).unwrap_or(&self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Fingerprint {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<&str> for Fingerprint {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

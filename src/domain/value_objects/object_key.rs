//! Object Key Value Object
//!
//! A validated remote object key derived from a path relative to the site root:
//! - Forward slashes only
//! - No traversal components
//! - No leading slash

use std::fmt;
use std::path::{Component, Path};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

/// Characters left as-is in a CDN path; `*` is encoded so a key never reads as a wildcard
const PATH_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Error when key validation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// Path contains traversal components (..)
    ContainsTraversal,
    /// Path is absolute
    AbsoluteNotAllowed,
    /// Path is empty
    Empty,
    /// Component is not valid UTF-8
    NotUtf8,
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyError::ContainsTraversal => write!(f, "Path contains traversal components (..)"),
            KeyError::AbsoluteNotAllowed => write!(f, "Absolute paths are not allowed"),
            KeyError::Empty => write!(f, "Path is empty"),
            KeyError::NotUtf8 => write!(f, "Path is not valid UTF-8"),
        }
    }
}

impl std::error::Error for KeyError {}

/// A deterministic object key (e.g. `images/logo.png`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Build a key from a path relative to the site root
    pub fn from_relative_path(path: &Path) -> Result<Self, KeyError> {
        if path.as_os_str().is_empty() {
            return Err(KeyError::Empty);
        }
        if path.is_absolute() || path.has_root() {
            return Err(KeyError::AbsoluteNotAllowed);
        }

        let mut parts = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_str().ok_or(KeyError::NotUtf8)?),
                Component::CurDir => {}
                Component::ParentDir => return Err(KeyError::ContainsTraversal),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(KeyError::AbsoluteNotAllowed)
                }
            }
        }

        if parts.is_empty() {
            return Err(KeyError::Empty);
        }
        Ok(Self(parts.join("/")))
    }

    /// Parse a key as stored remotely or in state
    pub fn parse(key: &str) -> Result<Self, KeyError> {
        Self::from_relative_path(Path::new(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URL path served by the CDN (`/images/logo.png`), percent-encoded
    pub fn url_path(&self) -> String {
        format!("/{}", utf8_percent_encode(&self.0, PATH_SET))
    }

    /// Wildcard over the key's top-level directory (`/images/*`)
    pub fn dir_wildcard(&self) -> Option<String> {
        self.top_level_dir()
            .map(|dir| format!("/{}/*", utf8_percent_encode(dir, PATH_SET)))
    }

    /// First path segment when the key lives inside a directory
    pub fn top_level_dir(&self) -> Option<&str> {
        self.0.split_once('/').map(|(dir, _)| dir)
    }

    /// Lowercased file extension, if any
    pub fn extension(&self) -> Option<String> {
        let name = self.0.rsplit('/').next().unwrap_or(&self.0);
        name.rsplit_once('.')
            .filter(|(stem, _)| !stem.is_empty())
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//! Asset entity - a local file that becomes one published object
//!
//! Assets are fingerprinted at construction and never change afterwards.

use std::path::{Path, PathBuf};

use crate::domain::value_objects::{Fingerprint, MediaType, ObjectKey};

/// A site file read from the local asset directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Remote key (path relative to the site root)
    key: ObjectKey,
    /// Absolute or source-relative path the content was read from
    source_path: PathBuf,
    /// Raw file content
    content: Vec<u8>,
    /// Content fingerprint
    fingerprint: Fingerprint,
    /// Content type sent with the upload
    media_type: MediaType,
}

impl Asset {
    /// Create an asset, computing its fingerprint and media type
    pub fn new(key: ObjectKey, source_path: impl Into<PathBuf>, content: Vec<u8>) -> Self {
        let fingerprint = Fingerprint::from_bytes(&content);
        let media_type = MediaType::for_key(&key);
        Self {
            key,
            source_path: source_path.into(),
            content,
            fingerprint,
            media_type,
        }
    }

    /// Override the detected media type
    pub fn with_media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = media_type;
        self
    }

    pub fn key(&self) -> &ObjectKey {
        &self.key
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    pub fn is_document(&self) -> bool {
        self.media_type.is_document()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(key: &str, content: &[u8]) -> Asset {
        Asset::new(ObjectKey::parse(key).unwrap(), key, content.to_vec())
    }

    #[test]
    fn fingerprint_follows_content() {
        let a = asset("index.html", b"<h1>hi</h1>");
        let b = asset("copy.html", b"<h1>hi</h1>");
        let c = asset("index.html", b"<h1>bye</h1>");

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn media_type_detected_from_key() {
        assert!(asset("index.html", b"").is_document());
        assert_eq!(asset("images/logo.png", b"").media_type().as_str(), "image/png");
    }

    #[test]
    fn media_type_override() {
        let a = asset("feed", b"{}").with_media_type(MediaType::new("application/json"));
        assert_eq!(a.media_type().as_str(), "application/json");
        assert_eq!(a.size(), 2);
    }
}

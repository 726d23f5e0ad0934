//! Media type detection by file extension

use std::fmt;

use super::ObjectKey;

/// Fallback for unknown extensions
pub const OCTET_STREAM: &str = "application/octet-stream";

const KNOWN_TYPES: &[(&str, &str)] = &[
    ("html", "text/html; charset=utf-8"),
    ("htm", "text/html; charset=utf-8"),
    ("css", "text/css; charset=utf-8"),
    ("js", "text/javascript; charset=utf-8"),
    ("mjs", "text/javascript; charset=utf-8"),
    ("json", "application/json"),
    ("map", "application/json"),
    ("txt", "text/plain; charset=utf-8"),
    ("xml", "application/xml"),
    ("webmanifest", "application/manifest+json"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("webp", "image/webp"),
    ("avif", "image/avif"),
    ("ico", "image/x-icon"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
    ("otf", "font/otf"),
    ("pdf", "application/pdf"),
    ("wasm", "application/wasm"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("mp3", "audio/mpeg"),
];

/// Content type sent with an uploaded object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType(String);

impl MediaType {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Guess from the key's extension
    pub fn for_key(key: &ObjectKey) -> Self {
        let found = key.extension().and_then(|ext| {
            KNOWN_TYPES
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, mime)| *mime)
        });
        Self(found.unwrap_or(OCTET_STREAM).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Essence without parameters (`text/html`)
    pub fn essence(&self) -> &str {
        self.0.split(';').next().unwrap_or(&self.0).trim()
    }

    /// HTML documents are invalidated by exact path
    pub fn is_document(&self) -> bool {
        self.essence() == "text/html"
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guess(key: &str) -> MediaType {
        MediaType::for_key(&ObjectKey::parse(key).unwrap())
    }

    #[test]
    fn html_is_document() {
        let mt = guess("index.html");
        assert_eq!(mt.essence(), "text/html");
        assert!(mt.is_document());
    }

    #[test]
    fn images_are_not_documents() {
        let mt = guess("images/logo.png");
        assert_eq!(mt.as_str(), "image/png");
        assert!(!mt.is_document());
    }

    #[test]
    fn uppercase_extension_is_recognized() {
        assert_eq!(guess("photo.JPG").as_str(), "image/jpeg");
    }

    #[test]
    fn unknown_extension_falls_back() {
        assert_eq!(guess("data.bin").as_str(), OCTET_STREAM);
        assert_eq!(guess("LICENSE").as_str(), OCTET_STREAM);
    }
}

//! Reusable site content and configuration.

pub const INDEX_HTML: &str = "<!doctype html><title>Home</title><h1>Hello</h1>\n";
pub const ABOUT_HTML: &str = "<!doctype html><title>About</title>\n";
pub const STYLE_CSS: &str = "body { margin: 0; }\n";
pub const LOGO_PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 13];

pub const BUCKET: &str = "my-site";

/// Minimal configuration for the local provider
pub fn basic_config() -> String {
    format!("[bucket]\nname = \"{BUCKET}\"\nregion = \"us-east-1\"\n")
}

//! Local File System
//!
//! Whole-file reads and atomic writes for state and config files.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// Local file system helper
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }

    pub fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    pub fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    /// Write through a sibling temp file and rename over the target
    pub fn write_atomic(&self, path: &Path, content: &[u8]) -> std::io::Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(content)?;
        temp.flush()?;
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

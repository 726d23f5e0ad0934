//! File System Asset Source
//!
//! Walks the site directory and fingerprints every file. Hidden files are
//! skipped and `.siteignore` patterns (gitignore syntax) are honored.

use std::path::Path;

use ignore::WalkBuilder;
use tracing::trace;

use crate::domain::entities::Asset;
use crate::domain::ports::{AssetSource, SourceError};
use crate::domain::value_objects::ObjectKey;

/// Per-site ignore file, gitignore syntax
pub const SITE_IGNORE_FILE: &str = ".siteignore";

/// Asset source that reads the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssetSource;

impl FsAssetSource {
    pub fn new() -> Self {
        Self
    }
}

fn unreadable(path: &Path, err: impl std::fmt::Display) -> SourceError {
    SourceError::Unreadable {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

impl AssetSource for FsAssetSource {
    fn load_all(&self, root: &Path) -> Result<Vec<Asset>, SourceError> {
        if !root.is_dir() {
            return Err(SourceError::NotFound(root.to_path_buf()));
        }

        let walker = WalkBuilder::new(root)
            .hidden(true)
            .parents(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .follow_links(false)
            .add_custom_ignore_filename(SITE_IGNORE_FILE)
            .build();

        let mut assets = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| unreadable(root, e))?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = entry.path();
            let relative = path.strip_prefix(root).map_err(|e| unreadable(path, e))?;
            let key = ObjectKey::from_relative_path(relative).map_err(|e| unreadable(path, e))?;
            let content = std::fs::read(path).map_err(|e| unreadable(path, e))?;
            trace!(key = %key, bytes = content.len(), "asset loaded");
            assets.push(Asset::new(key, path, content));
        }

        assets.sort_by(|a, b| a.key().cmp(b.key()));
        Ok(assets)
    }
}

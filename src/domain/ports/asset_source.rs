//! AssetSource port - where local site files come from
//!
//! Every asset is read in full before any remote call is made, so a file
//! that vanishes or cannot be read aborts the run with nothing published.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::entities::Asset;

#[derive(Debug, Error)]
pub enum SourceError {
    /// The asset directory does not exist
    #[error("asset directory not found: {}", .0.display())]
    NotFound(PathBuf),
    /// A file was listed but could not be read
    #[error("cannot read {}: {message}", path.display())]
    Unreadable { path: PathBuf, message: String },
}

/// Loads the complete asset set of a site
pub trait AssetSource {
    /// Read every asset under `root`, sorted by key
    fn load_all(&self, root: &Path) -> Result<Vec<Asset>, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_error_display() {
        let err = SourceError::Unreadable {
            path: PathBuf::from("site/a.css"),
            message: "denied".to_string(),
        };
        assert_eq!(err.to_string(), "cannot read site/a.css: denied");
    }
}

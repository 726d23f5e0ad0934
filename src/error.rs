//! Error types for Sitefront
//!
//! Uses `thiserror` for library errors. The binary wraps these in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::entities::PolicyValidationError;
use crate::domain::ports::{DeliveryError, SourceError, StateError, StoreError};

/// Result type alias for Sitefront operations
pub type SitefrontResult<T> = Result<T, SitefrontError>;

/// Main error type for Sitefront operations
#[derive(Error, Debug)]
pub enum SitefrontError {
    /// Local asset could not be read (aborts before any remote mutation)
    #[error("cannot read asset {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// Upload or delete of a remote object failed
    #[error("failed to publish '{key}': {source}")]
    Publish {
        key: String,
        #[source]
        source: StoreError,
    },

    /// Policy document or public access block was malformed or rejected
    #[error("bucket policy error: {message}")]
    Policy { message: String },

    /// Distribution or origin access control could not be converged
    #[error("delivery network error: {0}")]
    Delivery(#[from] DeliveryError),

    /// Invalidation request was rejected or throttled
    #[error("invalidation failed for {paths:?}: {message}")]
    Invalidation { paths: Vec<String>, message: String },

    /// Bucket could not be created or inspected
    #[error("bucket '{bucket}' unavailable: {source}")]
    Bucket {
        bucket: String,
        #[source]
        source: StoreError,
    },

    /// Invalid configuration
    #[error("invalid configuration in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// Persisted convergence state could not be loaded or saved
    #[error("convergence state error: {0}")]
    State(StateError),

    /// Another convergence run holds the state lock
    #[error("state {path} is locked by another run")]
    StateLocked { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SourceError> for SitefrontError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotFound(path) => SitefrontError::Read {
                message: "directory not found".to_string(),
                path,
            },
            SourceError::Unreadable { path, message } => SitefrontError::Read { path, message },
        }
    }
}

impl From<PolicyValidationError> for SitefrontError {
    fn from(err: PolicyValidationError) -> Self {
        SitefrontError::Policy {
            message: err.to_string(),
        }
    }
}

impl From<StateError> for SitefrontError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::Locked(path) => SitefrontError::StateLocked { path },
            other => SitefrontError::State(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_mentions_path() {
        let err = SitefrontError::Read {
            path: PathBuf::from("site/index.html"),
            message: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot read asset site/index.html: permission denied"
        );
    }

    #[test]
    fn locked_state_maps_to_state_locked() {
        let err: SitefrontError = StateError::Locked(PathBuf::from(".sitefront/state.toml")).into();
        assert!(matches!(err, SitefrontError::StateLocked { .. }));
    }

    #[test]
    fn source_not_found_maps_to_read_error() {
        let err: SitefrontError = SourceError::NotFound(PathBuf::from("missing")).into();
        assert!(matches!(err, SitefrontError::Read { .. }));
    }
}

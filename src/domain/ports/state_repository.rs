//! StateRepository port - persistence of what the last run converged
//!
//! This trait allows the domain layer to load/save convergence state
//! without knowing about TOML serialization details.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::entities::ConvergenceState;

pub type StateResult<T> = Result<T, StateError>;

#[derive(Debug, Error)]
pub enum StateError {
    /// Invalid state file format
    #[error("invalid state file: {0}")]
    Parse(String),
    /// State written by an incompatible version
    #[error("state version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },
    /// Another run holds the exclusive lock
    #[error("state {} is locked by another run", .0.display())]
    Locked(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Abstract repository for convergence state
pub trait StateRepository {
    /// Held for the duration of a run; released on drop
    type Guard;

    /// Take the exclusive run lock for the state at `path` without blocking
    fn lock(&self, path: &Path) -> StateResult<Self::Guard>;

    /// Load state from path; a missing file yields an empty state
    fn load(&self, path: &Path) -> StateResult<ConvergenceState>;

    /// Save state to path
    fn save(&self, state: &ConvergenceState, path: &Path) -> StateResult<()>;
}

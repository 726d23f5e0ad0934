//! TOML State Repository
//!
//! Implements the StateRepository port using TOML format, plus the
//! exclusive run lock (`fs2`) kept next to the state file.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::entities::{ConvergenceState, Distribution, StateEntry};
use crate::domain::ports::{StateError, StateRepository, StateResult};
use crate::domain::value_objects::Fingerprint;
use crate::infrastructure::fs::LocalFs;

/// Default state location, relative to the project root
pub const DEFAULT_STATE_PATH: &str = ".sitefront/state.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TomlObjectEntry {
    fingerprint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    media_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TomlState {
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_converged: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    origin_access_control_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pending_invalidation: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    distribution: Option<Distribution>,
    #[serde(default)]
    objects: BTreeMap<String, TomlObjectEntry>,
}

#[derive(Debug, Deserialize)]
struct VersionProbe {
    version: u32,
}

/// Exclusive lock on a state file, released on drop
#[derive(Debug)]
pub struct StateLock {
    file: File,
    path: PathBuf,
}

impl StateLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// TOML-based state repository
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlStateRepository {
    fs: LocalFs,
}

impl TomlStateRepository {
    pub fn new() -> Self {
        Self { fs: LocalFs::new() }
    }

    /// Lock file guarding `state_path`
    pub fn lock_path(state_path: &Path) -> PathBuf {
        state_path.with_extension("lock")
    }
}

impl StateRepository for TomlStateRepository {
    type Guard = StateLock;

    fn lock(&self, path: &Path) -> StateResult<StateLock> {
        let lock_path = Self::lock_path(path);
        if let Some(parent) = lock_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;
        match file.try_lock_exclusive() {
            Ok(()) => {
                debug!(path = %lock_path.display(), "state lock acquired");
                Ok(StateLock {
                    file,
                    path: lock_path,
                })
            }
            Err(err) if err.kind() == fs2::lock_contended_error().kind() => {
                Err(StateError::Locked(path.to_path_buf()))
            }
            Err(err) => Err(StateError::Io(err)),
        }
    }

    fn load(&self, path: &Path) -> StateResult<ConvergenceState> {
        if !self.fs.exists(path) {
            return Ok(ConvergenceState::new());
        }

        let content = self.fs.read_to_string(path)?;
        let probe: VersionProbe =
            toml::from_str(&content).map_err(|e| StateError::Parse(e.to_string()))?;
        if probe.version != ConvergenceState::VERSION {
            return Err(StateError::VersionMismatch {
                found: probe.version,
                expected: ConvergenceState::VERSION,
            });
        }
        let stored: TomlState =
            toml::from_str(&content).map_err(|e| StateError::Parse(e.to_string()))?;

        let mut state = ConvergenceState::new();
        if let Some(bucket) = stored.bucket {
            state.set_bucket(bucket);
        }
        for (key, entry) in stored.objects {
            let mut recorded = StateEntry::new(Fingerprint::new(&entry.fingerprint));
            if let Some(media_type) = entry.media_type {
                recorded = recorded.with_media_type(media_type);
            }
            state.set_entry(key, recorded);
        }
        if let Some(distribution) = stored.distribution {
            state.set_distribution(distribution);
        }
        if let Some(id) = stored.origin_access_control_id {
            state.set_origin_access_control_id(id);
        }
        state.set_pending_invalidation(stored.pending_invalidation);
        if let Some(at) = stored.last_converged {
            state.set_last_converged(at);
        }
        Ok(state)
    }

    fn save(&self, state: &ConvergenceState, path: &Path) -> StateResult<()> {
        let objects = state
            .entries()
            .map(|(key, entry)| {
                (
                    key.to_string(),
                    TomlObjectEntry {
                        fingerprint: entry.fingerprint().to_string(),
                        media_type: entry.media_type().map(str::to_string),
                    },
                )
            })
            .collect();

        let stored = TomlState {
            version: state.version(),
            bucket: state.bucket().map(str::to_string),
            last_converged: state.last_converged(),
            origin_access_control_id: state.origin_access_control_id().map(str::to_string),
            pending_invalidation: state.pending_invalidation().iter().cloned().collect(),
            distribution: state.distribution().cloned(),
            objects,
        };

        let content =
            toml::to_string_pretty(&stored).map_err(|e| StateError::Parse(e.to_string()))?;
        self.fs.write_atomic(path, content.as_bytes())?;
        debug!(path = %path.display(), objects = state.object_count(), "state saved");
        Ok(())
    }
}

//! Invalidation entities
//!
//! An `InvalidationRequest` is built once per run when fingerprints changed and
//! discarded afterwards. Only its paths survive, as pending paths in state, when
//! submission fails.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Fingerprint;

/// Path pattern matching every object
pub const WILDCARD_ALL: &str = "/*";

/// Request to purge cached copies of specific paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidationRequest {
    /// Sorted, deduplicated path patterns
    paths: Vec<String>,
    /// Fingerprints whose change triggered the request
    trigger_fingerprints: BTreeSet<Fingerprint>,
}

impl InvalidationRequest {
    pub fn new(
        paths: impl IntoIterator<Item = String>,
        trigger_fingerprints: BTreeSet<Fingerprint>,
    ) -> Self {
        let paths: BTreeSet<String> = paths.into_iter().collect();
        Self {
            paths: paths.into_iter().collect(),
            trigger_fingerprints,
        }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn trigger_fingerprints(&self) -> &BTreeSet<Fingerprint> {
        &self.trigger_fingerprints
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Collapse to `/*` when there are more patterns than the provider allows
    pub fn capped(mut self, max_paths: usize) -> Self {
        if self.paths.len() > max_paths {
            self.paths = vec![WILDCARD_ALL.to_string()];
        }
        self
    }

    /// Caller reference for the provider; unique per submission time and content
    pub fn caller_reference(&self, issued_at_millis: i64) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        for path in &self.paths {
            hasher.update(path.as_bytes());
            hasher.update(b"\n");
        }
        for fp in &self.trigger_fingerprints {
            hasher.update(fp.as_str().as_bytes());
            hasher.update(b"\n");
        }
        let digest = format!("{:x}", hasher.finalize());
        format!("sitefront-{issued_at_millis}-{}", &digest[..12])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationStatus {
    InProgress,
    Completed,
}

/// Provider acknowledgement of a submitted invalidation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidationTicket {
    pub id: String,
    pub status: InvalidationStatus,
}

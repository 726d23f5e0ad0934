//! Convergence state entity - what the last successful run recorded
//!
//! The recorded fingerprint set is the baseline the invalidator diffs against.
//! It's a pure data structure - I/O is handled by StateRepository.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::domain::entities::{Distribution, PublishedObject};
use crate::domain::value_objects::Fingerprint;

/// Recorded entry for one published object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEntry {
    fingerprint: Fingerprint,
    media_type: Option<String>,
}

impl StateEntry {
    pub fn new(fingerprint: Fingerprint) -> Self {
        Self {
            fingerprint,
            media_type: None,
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }
}

/// State persisted between convergence runs
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceState {
    version: u32,
    bucket: Option<String>,
    objects: BTreeMap<String, StateEntry>,
    distribution: Option<Distribution>,
    origin_access_control_id: Option<String>,
    pending_invalidation: BTreeSet<String>,
    last_converged: Option<DateTime<Utc>>,
}

impl Default for ConvergenceState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConvergenceState {
    /// Current format version
    pub const VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::VERSION,
            bucket: None,
            objects: BTreeMap::new(),
            distribution: None,
            origin_access_control_id: None,
            pending_invalidation: BTreeSet::new(),
            last_converged: None,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    pub fn set_bucket(&mut self, bucket: impl Into<String>) {
        self.bucket = Some(bucket.into());
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.distribution.is_none()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn get(&self, key: &str) -> Option<&StateEntry> {
        self.objects.get(key)
    }

    pub fn fingerprint(&self, key: &str) -> Option<&Fingerprint> {
        self.objects.get(key).map(StateEntry::fingerprint)
    }

    pub fn set_entry(&mut self, key: impl Into<String>, entry: StateEntry) {
        self.objects.insert(key.into(), entry);
    }

    /// Record an object as published
    pub fn record_published(&mut self, object: &PublishedObject, media_type: &str) {
        self.set_entry(
            object.key().as_str(),
            StateEntry::new(object.fingerprint().clone()).with_media_type(media_type),
        );
    }

    pub fn remove(&mut self, key: &str) -> Option<StateEntry> {
        self.objects.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &StateEntry)> {
        self.objects.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The recorded fingerprint set
    pub fn fingerprints(&self) -> BTreeMap<String, Fingerprint> {
        self.objects
            .iter()
            .map(|(k, v)| (k.clone(), v.fingerprint.clone()))
            .collect()
    }

    pub fn distribution(&self) -> Option<&Distribution> {
        self.distribution.as_ref()
    }

    pub fn set_distribution(&mut self, distribution: Distribution) {
        self.distribution = Some(distribution);
    }

    pub fn origin_access_control_id(&self) -> Option<&str> {
        self.origin_access_control_id.as_deref()
    }

    pub fn set_origin_access_control_id(&mut self, id: impl Into<String>) {
        self.origin_access_control_id = Some(id.into());
    }

    /// Paths whose invalidation failed on an earlier run
    pub fn pending_invalidation(&self) -> &BTreeSet<String> {
        &self.pending_invalidation
    }

    pub fn set_pending_invalidation(&mut self, paths: impl IntoIterator<Item = String>) {
        self.pending_invalidation = paths.into_iter().collect();
    }

    pub fn clear_pending_invalidation(&mut self) {
        self.pending_invalidation.clear();
    }

    pub fn last_converged(&self) -> Option<DateTime<Utc>> {
        self.last_converged
    }

    pub fn set_last_converged(&mut self, at: DateTime<Utc>) {
        self.last_converged = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ObjectKey;

    #[test]
    fn new_state_is_empty() {
        let state = ConvergenceState::new();
        assert!(state.is_empty());
        assert_eq!(state.version(), ConvergenceState::VERSION);
        assert!(state.pending_invalidation().is_empty());
    }

    #[test]
    fn record_published_tracks_fingerprint_and_media_type() {
        let mut state = ConvergenceState::new();
        let object = PublishedObject::new(
            ObjectKey::parse("index.html").unwrap(),
            Fingerprint::new("abc"),
        );
        state.record_published(&object, "text/html; charset=utf-8");

        let entry = state.get("index.html").unwrap();
        assert_eq!(entry.fingerprint().as_str(), "sha256:abc");
        assert_eq!(entry.media_type(), Some("text/html; charset=utf-8"));
        assert_eq!(state.object_count(), 1);
    }

    #[test]
    fn fingerprints_snapshot() {
        let mut state = ConvergenceState::new();
        state.set_entry("a.css", StateEntry::new(Fingerprint::new("1")));
        state.set_entry("b.js", StateEntry::new(Fingerprint::new("2")));
        state.remove("a.css");

        let fps = state.fingerprints();
        assert_eq!(fps.len(), 1);
        assert_eq!(fps["b.js"].as_str(), "sha256:2");
    }

    #[test]
    fn pending_invalidation_roundtrip() {
        let mut state = ConvergenceState::new();
        state.set_pending_invalidation(vec!["/index.html".to_string(), "/index.html".to_string()]);
        assert_eq!(state.pending_invalidation().len(), 1);
        state.clear_pending_invalidation();
        assert!(state.pending_invalidation().is_empty());
    }
}

//! Publish planning service
//!
//! Pure domain logic deciding which assets to upload and which recorded
//! objects to delete. Remote fingerprints are gathered by the caller; this
//! service performs no I/O.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::entities::Asset;
use crate::domain::value_objects::{Fingerprint, ObjectKey};

/// The action to take for an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectAction {
    /// Upload (new object or fingerprint differs)
    Upload,
    /// Remote object already carries this fingerprint
    Skip,
}

/// A planned action for a single asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedObject {
    pub key: ObjectKey,
    pub fingerprint: Fingerprint,
    /// Fingerprint found on the remote object, if any
    pub remote: Option<Fingerprint>,
    pub action: ObjectAction,
}

impl PlannedObject {
    pub fn should_upload(&self) -> bool {
        self.action == ObjectAction::Upload
    }

    pub fn is_new(&self) -> bool {
        self.remote.is_none()
    }
}

/// Result of planning a publish
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishPlan {
    pub objects: Vec<PlannedObject>,
    /// Recorded keys with no local asset left
    pub deletions: Vec<ObjectKey>,
}

impl PublishPlan {
    pub fn uploads(&self) -> impl Iterator<Item = &PlannedObject> {
        self.objects.iter().filter(|o| o.should_upload())
    }

    pub fn upload_count(&self) -> usize {
        self.uploads().count()
    }

    pub fn unchanged(&self) -> impl Iterator<Item = &PlannedObject> {
        self.objects.iter().filter(|o| !o.should_upload())
    }

    pub fn unchanged_count(&self) -> usize {
        self.unchanged().count()
    }

    pub fn has_changes(&self) -> bool {
        self.upload_count() > 0 || !self.deletions.is_empty()
    }
}

/// Pure planning service
pub struct PublishPlanner;

impl PublishPlanner {
    /// Plan a single asset against the fingerprint found remotely
    pub fn plan_object(asset: &Asset, remote: Option<&Fingerprint>) -> ObjectAction {
        match remote {
            Some(fp) if fp == asset.fingerprint() => ObjectAction::Skip,
            _ => ObjectAction::Upload,
        }
    }

    /// Plan every asset, plus deletions for recorded keys that disappeared
    pub fn plan<'a>(
        assets: &[Asset],
        remote: &BTreeMap<String, Fingerprint>,
        recorded_keys: impl IntoIterator<Item = &'a str>,
    ) -> PublishPlan {
        let objects = assets
            .iter()
            .map(|asset| {
                let remote_fp = remote.get(asset.key().as_str());
                PlannedObject {
                    key: asset.key().clone(),
                    fingerprint: asset.fingerprint().clone(),
                    remote: remote_fp.cloned(),
                    action: Self::plan_object(asset, remote_fp),
                }
            })
            .collect();

        let local: BTreeSet<&str> = assets.iter().map(|a| a.key().as_str()).collect();
        let deletions = recorded_keys
            .into_iter()
            .filter(|key| !local.contains(key))
            .filter_map(|key| ObjectKey::parse(key).ok())
            .collect();

        PublishPlan { objects, deletions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(key: &str, content: &str) -> Asset {
        Asset::new(ObjectKey::parse(key).unwrap(), key, content.as_bytes().to_vec())
    }

    #[test]
    fn missing_remote_object_is_uploaded() {
        let a = asset("index.html", "v1");
        assert_eq!(PublishPlanner::plan_object(&a, None), ObjectAction::Upload);
    }

    #[test]
    fn matching_fingerprint_is_skipped() {
        let a = asset("index.html", "v1");
        let fp = a.fingerprint().clone();
        assert_eq!(PublishPlanner::plan_object(&a, Some(&fp)), ObjectAction::Skip);
    }

    #[test]
    fn stale_fingerprint_is_uploaded() {
        let a = asset("index.html", "v2");
        let old = Fingerprint::from_bytes(b"v1");
        assert_eq!(PublishPlanner::plan_object(&a, Some(&old)), ObjectAction::Upload);
    }

    #[test]
    fn plan_counts_and_deletions() {
        let assets = vec![asset("index.html", "v1"), asset("images/logo.png", "png")];
        let mut remote = BTreeMap::new();
        remote.insert("index.html".to_string(), assets[0].fingerprint().clone());

        let plan = PublishPlanner::plan(&assets, &remote, ["index.html", "old.css"]);

        assert_eq!(plan.upload_count(), 1);
        assert_eq!(plan.unchanged_count(), 1);
        assert!(plan.uploads().all(|o| o.key.as_str() == "images/logo.png" && o.is_new()));
        assert_eq!(plan.deletions, vec![ObjectKey::parse("old.css").unwrap()]);
        assert!(plan.has_changes());
    }

    #[test]
    fn nothing_to_do_when_everything_matches() {
        let assets = vec![asset("index.html", "v1")];
        let remote: BTreeMap<_, _> = assets
            .iter()
            .map(|a| (a.key().to_string(), a.fingerprint().clone()))
            .collect();

        let plan = PublishPlanner::plan(&assets, &remote, ["index.html"]);
        assert!(!plan.has_changes());
    }
}

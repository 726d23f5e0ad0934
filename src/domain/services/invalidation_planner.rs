//! Invalidation planning service
//!
//! Diffs the recorded fingerprint set against the current one and maps every
//! affected key to a path scope:
//!
//! - HTML documents: exact path (`/index.html`)
//! - other assets in a directory: wildcard over the top-level directory (`/images/*`)
//! - other assets at the root: exact path

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::entities::{InvalidationRequest, SiteManifest};
use crate::domain::value_objects::{Fingerprint, MediaType, ObjectKey};

/// Keys that differ between two fingerprint sets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintDelta {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
    pub changed: BTreeSet<String>,
}

impl FingerprintDelta {
    pub fn compute(
        previous: &BTreeMap<String, Fingerprint>,
        current: &BTreeMap<String, Fingerprint>,
    ) -> Self {
        let mut delta = Self::default();
        for (key, fp) in current {
            match previous.get(key) {
                None => {
                    delta.added.insert(key.clone());
                }
                Some(old) if old != fp => {
                    delta.changed.insert(key.clone());
                }
                Some(_) => {}
            }
        }
        for key in previous.keys() {
            if !current.contains_key(key) {
                delta.removed.insert(key.clone());
            }
        }
        delta
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    pub fn affected(&self) -> impl Iterator<Item = &str> {
        self.added
            .iter()
            .chain(&self.changed)
            .chain(&self.removed)
            .map(String::as_str)
    }
}

/// Pure planning service
pub struct InvalidationPlanner;

impl InvalidationPlanner {
    /// Path pattern that covers `key`
    pub fn scope_for(key: &ObjectKey) -> String {
        if MediaType::for_key(key).is_document() {
            return key.url_path();
        }
        key.dir_wildcard().unwrap_or_else(|| key.url_path())
    }

    /// Build the request for this run, or `None` when nothing changed and
    /// nothing is pending
    pub fn plan(
        previous: &BTreeMap<String, Fingerprint>,
        manifest: &SiteManifest,
        pending: &BTreeSet<String>,
    ) -> Option<InvalidationRequest> {
        let current: BTreeMap<String, Fingerprint> = manifest
            .assets
            .iter()
            .map(|a| (a.key().to_string(), a.fingerprint().clone()))
            .collect();
        let delta = FingerprintDelta::compute(previous, &current);

        if delta.is_empty() && pending.is_empty() {
            return None;
        }

        let mut paths: BTreeSet<String> = pending.clone();
        let mut triggers = BTreeSet::new();
        for key in delta.affected() {
            if let Ok(parsed) = ObjectKey::parse(key) {
                paths.insert(Self::scope_for(&parsed));
            }
            if let Some(fp) = current.get(key).or_else(|| previous.get(key)) {
                triggers.insert(fp.clone());
            }
        }

        let request =
            InvalidationRequest::new(paths, triggers).capped(manifest.max_invalidation_paths);
        (!request.is_empty()).then_some(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Asset, SiteSettings, WILDCARD_ALL};

    fn manifest(files: &[(&str, &str)], max_paths: usize) -> SiteManifest {
        let settings = SiteSettings {
            max_invalidation_paths: max_paths,
            ..SiteSettings::new("my-site", "us-east-1")
        };
        let assets = files
            .iter()
            .map(|(k, c)| Asset::new(ObjectKey::parse(k).unwrap(), *k, c.as_bytes().to_vec()))
            .collect();
        SiteManifest::build(&settings, assets).unwrap()
    }

    fn recorded(files: &[(&str, &str)]) -> BTreeMap<String, Fingerprint> {
        files
            .iter()
            .map(|(k, c)| (k.to_string(), Fingerprint::from_bytes(c.as_bytes())))
            .collect()
    }

    #[test]
    fn scopes() {
        let scope = |k: &str| InvalidationPlanner::scope_for(&ObjectKey::parse(k).unwrap());
        assert_eq!(scope("index.html"), "/index.html");
        assert_eq!(scope("blog/post.html"), "/blog/post.html");
        assert_eq!(scope("images/logo.png"), "/images/*");
        assert_eq!(scope("images/icons/x.svg"), "/images/*");
        assert_eq!(scope("favicon.ico"), "/favicon.ico");
    }

    #[test]
    fn scopes_are_percent_encoded() {
        let scope = |k: &str| InvalidationPlanner::scope_for(&ObjectKey::parse(k).unwrap());
        assert_eq!(scope("my page.html"), "/my%20page.html");
        assert_eq!(scope("press kit/logo.png"), "/press%20kit/*");
        assert_eq!(scope("résumé.pdf"), "/r%C3%A9sum%C3%A9.pdf");
    }

    #[test]
    fn delta_classifies_keys() {
        let prev = recorded(&[("a", "1"), ("b", "1"), ("c", "1")]);
        let cur = recorded(&[("a", "1"), ("b", "2"), ("d", "1")]);
        let delta = FingerprintDelta::compute(&prev, &cur);

        assert_eq!(delta.added, BTreeSet::from(["d".to_string()]));
        assert_eq!(delta.changed, BTreeSet::from(["b".to_string()]));
        assert_eq!(delta.removed, BTreeSet::from(["c".to_string()]));
    }

    #[test]
    fn first_run_covers_every_scope_in_one_request() {
        let files = [("index.html", "h1"), ("images/logo.png", "h2")];
        let req = InvalidationPlanner::plan(&BTreeMap::new(), &manifest(&files, 15), &BTreeSet::new())
            .unwrap();
        assert_eq!(req.paths(), ["/images/*", "/index.html"]);
        assert_eq!(req.trigger_fingerprints().len(), 2);
    }

    #[test]
    fn unchanged_content_needs_no_invalidation() {
        let files = [("index.html", "h1"), ("images/logo.png", "h2")];
        let req = InvalidationPlanner::plan(&recorded(&files), &manifest(&files, 15), &BTreeSet::new());
        assert!(req.is_none());
    }

    #[test]
    fn html_change_invalidates_only_that_document() {
        let before = [("index.html", "h1"), ("images/logo.png", "h2")];
        let after = [("index.html", "h1-edited"), ("images/logo.png", "h2")];
        let req = InvalidationPlanner::plan(&recorded(&before), &manifest(&after, 15), &BTreeSet::new())
            .unwrap();
        assert_eq!(req.paths(), ["/index.html"]);
    }

    #[test]
    fn removed_image_invalidates_its_directory() {
        let before = [("index.html", "h1"), ("images/old.png", "x")];
        let after = [("index.html", "h1")];
        let req = InvalidationPlanner::plan(&recorded(&before), &manifest(&after, 15), &BTreeSet::new())
            .unwrap();
        assert_eq!(req.paths(), ["/images/*"]);
    }

    #[test]
    fn pending_paths_are_retried() {
        let files = [("index.html", "h1")];
        let pending = BTreeSet::from(["/about.html".to_string()]);
        let req = InvalidationPlanner::plan(&recorded(&files), &manifest(&files, 15), &pending).unwrap();
        assert_eq!(req.paths(), ["/about.html"]);
    }

    #[test]
    fn too_many_scopes_collapse_to_wildcard() {
        let files = [("a.html", "1"), ("b.html", "1"), ("c.html", "1")];
        let req = InvalidationPlanner::plan(&BTreeMap::new(), &manifest(&files, 2), &BTreeSet::new())
            .unwrap();
        assert_eq!(req.paths(), [WILDCARD_ALL]);
    }
}

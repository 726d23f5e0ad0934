//! PublishedObject entity - the remote counterpart of an Asset

use crate::domain::entities::Asset;
use crate::domain::value_objects::{Fingerprint, ObjectKey};

/// Who may read an object directly from the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Only reachable through the delivery network's origin access control
    #[default]
    Private,
}

/// An object in the remote store, tagged with the fingerprint it was uploaded with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedObject {
    key: ObjectKey,
    fingerprint: Fingerprint,
    visibility: Visibility,
}

impl PublishedObject {
    pub fn new(key: ObjectKey, fingerprint: Fingerprint) -> Self {
        Self {
            key,
            fingerprint,
            visibility: Visibility::Private,
        }
    }

    /// The object that results from publishing `asset`
    pub fn from_asset(asset: &Asset) -> Self {
        Self::new(asset.key().clone(), asset.fingerprint().clone())
    }

    pub fn key(&self) -> &ObjectKey {
        &self.key
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Whether this object is stale relative to `asset`
    pub fn is_stale_for(&self, asset: &Asset) -> bool {
        self.key != *asset.key() || self.fingerprint != *asset.fingerprint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_asset_is_private_and_current() {
        let asset = Asset::new(ObjectKey::parse("a.css").unwrap(), "a.css", b"body{}".to_vec());
        let object = PublishedObject::from_asset(&asset);

        assert_eq!(object.visibility(), Visibility::Private);
        assert!(!object.is_stale_for(&asset));
    }

    #[test]
    fn changed_content_makes_object_stale() {
        let old = Asset::new(ObjectKey::parse("a.css").unwrap(), "a.css", b"v1".to_vec());
        let new = Asset::new(ObjectKey::parse("a.css").unwrap(), "a.css", b"v2".to_vec());

        assert!(PublishedObject::from_asset(&old).is_stale_for(&new));
    }
}

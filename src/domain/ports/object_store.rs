//! ObjectStore port - the bucket side of the provider
//!
//! Covers bucket lifecycle, object upload/delete, the public access block
//! and the bucket policy. Fingerprints travel as object metadata so a later
//! run can compare without downloading bodies.

use thiserror::Error;

use crate::domain::entities::{BucketSpec, PublicAccessBlock};
use crate::domain::value_objects::{Fingerprint, ObjectKey};

/// Metadata key carrying the content fingerprint of an uploaded object
pub const FINGERPRINT_METADATA_KEY: &str = "sitefront-fingerprint";

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("bucket or object not found")]
    NotFound,
    #[error("request rejected: {message}")]
    Rejected { message: String },
    #[error("request throttled")]
    Throttled,
    #[error("transport failure: {0}")]
    Transport(String),
}

/// A single object write
#[derive(Debug, Clone, Copy)]
pub struct ObjectUpload<'a> {
    pub key: &'a ObjectKey,
    pub body: &'a [u8],
    pub content_type: &'a str,
    pub cache_control: Option<&'a str>,
    pub fingerprint: &'a Fingerprint,
}

/// Bucket operations of a storage provider
pub trait ObjectStore {
    fn bucket_exists(&self, bucket: &str) -> StoreResult<bool>;

    /// Create a private bucket
    fn create_bucket(&self, spec: &BucketSpec) -> StoreResult<()>;

    /// Fingerprint recorded on the remote object, `None` when absent
    fn head_fingerprint(&self, bucket: &str, key: &ObjectKey) -> StoreResult<Option<Fingerprint>>;

    fn put_object(&self, bucket: &str, upload: &ObjectUpload<'_>) -> StoreResult<()>;

    /// Delete an object; deleting a missing object succeeds
    fn delete_object(&self, bucket: &str, key: &ObjectKey) -> StoreResult<()>;

    fn public_access_block(&self, bucket: &str) -> StoreResult<Option<PublicAccessBlock>>;

    fn put_public_access_block(&self, bucket: &str, block: &PublicAccessBlock) -> StoreResult<()>;

    /// Current bucket policy JSON, `None` when no policy is attached
    fn bucket_policy(&self, bucket: &str) -> StoreResult<Option<String>>;

    fn put_bucket_policy(&self, bucket: &str, policy_json: &str) -> StoreResult<()>;
}

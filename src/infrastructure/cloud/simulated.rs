//! Simulated Provider
//!
//! Implements both provider ports against an in-process model of a bucket
//! store and a delivery network. Backs the `local` provider (persisted under
//! a directory) and the use case tests (in memory).
//!
//! Every write is appended to a mutation log so callers can assert on what a
//! run changed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::entities::{
    BucketSpec, Distribution, DistributionSpec, InvalidationRequest, InvalidationStatus,
    InvalidationTicket, LiveDistribution, OriginAccessControlSpec, PublicAccessBlock,
};
use crate::domain::ports::{
    DeliveryError, DeliveryNetwork, DeliveryResult, ObjectStore, ObjectUpload, StoreError,
    StoreResult,
};
use crate::domain::value_objects::{Fingerprint, ObjectKey};

/// Account id used in simulated ARNs
pub const SIMULATED_ACCOUNT: &str = "123456789012";

const STATE_FILE: &str = "cloud.json";
const OBJECTS_DIR: &str = "objects";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SimObject {
    fingerprint: Fingerprint,
    content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cache_control: Option<String>,
    size: usize,
    #[serde(skip)]
    body: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SimBucket {
    region: String,
    #[serde(default)]
    public_access_block: Option<PublicAccessBlock>,
    #[serde(default)]
    policy: Option<String>,
    #[serde(default)]
    objects: BTreeMap<String, SimObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SimDistribution {
    identity: Distribution,
    spec: DistributionSpec,
    version: u64,
}

impl SimDistribution {
    fn etag(&self) -> String {
        format!("ETAG{}", self.version)
    }

    fn live(&self) -> LiveDistribution {
        LiveDistribution {
            identity: self.identity.clone(),
            spec: self.spec.clone(),
            etag: Some(self.etag()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SimInvalidation {
    id: String,
    distribution_id: String,
    caller_reference: String,
    paths: Vec<String>,
    /// Status polls left before reporting completion
    polls_remaining: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CloudState {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    buckets: BTreeMap<String, SimBucket>,
    #[serde(default)]
    origin_access_controls: BTreeMap<String, OriginAccessControlSpec>,
    #[serde(default)]
    distributions: BTreeMap<String, SimDistribution>,
    #[serde(default)]
    invalidations: Vec<SimInvalidation>,
}

impl CloudState {
    fn next_id(&mut self, prefix: char) -> String {
        self.next_id += 1;
        format!("{prefix}{:013X}", 0xA5_0000_0000 + self.next_id)
    }
}

#[derive(Debug, Default)]
struct Faults {
    reject_uploads: Vec<String>,
    reject_invalidations: bool,
    invalidation_polls: u32,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<CloudState>,
    faults: Mutex<Faults>,
    log: Mutex<Vec<String>>,
    root: Option<PathBuf>,
}

/// In-process provider; clones share the same cloud
#[derive(Debug, Clone, Default)]
pub struct SimulatedCloud {
    shared: Arc<Shared>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SimulatedCloud {
    /// A cloud that lives only as long as this value
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// A cloud persisted under `root` (created on first write)
    pub fn open(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        let state_path = root.join(STATE_FILE);
        let state = if state_path.exists() {
            let content = fs::read_to_string(&state_path)?;
            serde_json::from_str(&content)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?
        } else {
            CloudState::default()
        };
        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                root: Some(root),
                ..Shared::default()
            }),
        })
    }

    /// Reject uploads of `key` with an error
    pub fn reject_uploads_for(&self, key: impl Into<String>) {
        lock(&self.shared.faults).reject_uploads.push(key.into());
    }

    /// Reject (or stop rejecting) invalidation requests
    pub fn reject_invalidations(&self, reject: bool) {
        lock(&self.shared.faults).reject_invalidations = reject;
    }

    /// Report new invalidations in progress for `polls` status calls
    pub fn complete_invalidations_after(&self, polls: u32) {
        lock(&self.shared.faults).invalidation_polls = polls;
    }

    /// Remote writes so far, oldest first
    pub fn mutations(&self) -> Vec<String> {
        lock(&self.shared.log).clone()
    }

    pub fn mutation_count(&self) -> usize {
        lock(&self.shared.log).len()
    }

    pub fn clear_mutations(&self) {
        lock(&self.shared.log).clear();
    }

    /// Paths of every invalidation received, oldest first
    pub fn invalidations(&self) -> Vec<Vec<String>> {
        lock(&self.shared.state)
            .invalidations
            .iter()
            .map(|inv| inv.paths.clone())
            .collect()
    }

    pub fn object_keys(&self, bucket: &str) -> Vec<String> {
        lock(&self.shared.state)
            .buckets
            .get(bucket)
            .map(|b| b.objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Content type and cache control stored with an object
    pub fn object_headers(&self, bucket: &str, key: &str) -> Option<(String, Option<String>)> {
        lock(&self.shared.state)
            .buckets
            .get(bucket)
            .and_then(|b| b.objects.get(key))
            .map(|o| (o.content_type.clone(), o.cache_control.clone()))
    }

    pub fn object_body(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        let state = lock(&self.shared.state);
        let object = state.buckets.get(bucket)?.objects.get(key)?;
        if !object.body.is_empty() || object.size == 0 {
            return Some(object.body.clone());
        }
        let root = self.shared.root.as_ref()?;
        fs::read(root.join(OBJECTS_DIR).join(bucket).join(key)).ok()
    }

    /// Overwrite the public access block out of band
    pub fn tamper_public_access_block(&self, bucket: &str, block: PublicAccessBlock) {
        if let Some(b) = lock(&self.shared.state).buckets.get_mut(bucket) {
            b.public_access_block = Some(block);
        }
    }

    /// Overwrite the bucket policy out of band
    pub fn tamper_bucket_policy(&self, bucket: &str, policy: &str) {
        if let Some(b) = lock(&self.shared.state).buckets.get_mut(bucket) {
            b.policy = Some(policy.to_string());
        }
    }

    /// Remove a distribution out of band
    pub fn drop_distribution(&self, id: &str) {
        lock(&self.shared.state).distributions.remove(id);
    }

    pub fn distribution_count(&self) -> usize {
        lock(&self.shared.state).distributions.len()
    }

    fn record(&self, entry: String) {
        debug!(mutation = %entry, "simulated write");
        lock(&self.shared.log).push(entry);
    }

    /// Persist state (and optionally one object body) when rooted
    fn commit(&self, state: &CloudState, body: Option<(&str, &str, &[u8])>) -> Result<(), String> {
        let Some(root) = &self.shared.root else {
            return Ok(());
        };
        if let Some((bucket, key, bytes)) = body {
            let path = root.join(OBJECTS_DIR).join(bucket).join(key);
            write_file(&path, bytes).map_err(|e| e.to_string())?;
        }
        let json = serde_json::to_string_pretty(state).map_err(|e| e.to_string())?;
        write_file(&root.join(STATE_FILE), json.as_bytes()).map_err(|e| e.to_string())
    }

    fn remove_body(&self, bucket: &str, key: &str) {
        if let Some(root) = &self.shared.root {
            let _ = fs::remove_file(root.join(OBJECTS_DIR).join(bucket).join(key));
        }
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)
}

fn missing_bucket() -> StoreError {
    StoreError::NotFound
}

impl ObjectStore for SimulatedCloud {
    fn bucket_exists(&self, bucket: &str) -> StoreResult<bool> {
        Ok(lock(&self.shared.state).buckets.contains_key(bucket))
    }

    fn create_bucket(&self, spec: &BucketSpec) -> StoreResult<()> {
        let mut state = lock(&self.shared.state);
        if state.buckets.contains_key(&spec.name) {
            return Err(StoreError::Rejected {
                message: format!("BucketAlreadyOwnedByYou: {}", spec.name),
            });
        }
        state.buckets.insert(
            spec.name.clone(),
            SimBucket {
                region: spec.region.clone(),
                ..SimBucket::default()
            },
        );
        self.commit(&state, None).map_err(StoreError::Transport)?;
        self.record(format!("create_bucket {}", spec.name));
        Ok(())
    }

    fn head_fingerprint(&self, bucket: &str, key: &ObjectKey) -> StoreResult<Option<Fingerprint>> {
        let state = lock(&self.shared.state);
        let bucket = state.buckets.get(bucket).ok_or_else(missing_bucket)?;
        Ok(bucket
            .objects
            .get(key.as_str())
            .map(|o| o.fingerprint.clone()))
    }

    fn put_object(&self, bucket: &str, upload: &ObjectUpload<'_>) -> StoreResult<()> {
        if lock(&self.shared.faults)
            .reject_uploads
            .iter()
            .any(|k| k == upload.key.as_str())
        {
            return Err(StoreError::Rejected {
                message: format!("AccessDenied: {}", upload.key),
            });
        }

        let mut state = lock(&self.shared.state);
        let target = state.buckets.get_mut(bucket).ok_or_else(missing_bucket)?;
        target.objects.insert(
            upload.key.to_string(),
            SimObject {
                fingerprint: upload.fingerprint.clone(),
                content_type: upload.content_type.to_string(),
                cache_control: upload.cache_control.map(str::to_string),
                size: upload.body.len(),
                body: upload.body.to_vec(),
            },
        );
        self.commit(&state, Some((bucket, upload.key.as_str(), upload.body)))
            .map_err(StoreError::Transport)?;
        self.record(format!("put_object {bucket}/{}", upload.key));
        Ok(())
    }

    fn delete_object(&self, bucket: &str, key: &ObjectKey) -> StoreResult<()> {
        let mut state = lock(&self.shared.state);
        let target = state.buckets.get_mut(bucket).ok_or_else(missing_bucket)?;
        target.objects.remove(key.as_str());
        self.remove_body(bucket, key.as_str());
        self.commit(&state, None).map_err(StoreError::Transport)?;
        self.record(format!("delete_object {bucket}/{key}"));
        Ok(())
    }

    fn public_access_block(&self, bucket: &str) -> StoreResult<Option<PublicAccessBlock>> {
        let state = lock(&self.shared.state);
        let bucket = state.buckets.get(bucket).ok_or_else(missing_bucket)?;
        Ok(bucket.public_access_block)
    }

    fn put_public_access_block(&self, bucket: &str, block: &PublicAccessBlock) -> StoreResult<()> {
        let mut state = lock(&self.shared.state);
        let target = state.buckets.get_mut(bucket).ok_or_else(missing_bucket)?;
        target.public_access_block = Some(*block);
        self.commit(&state, None).map_err(StoreError::Transport)?;
        self.record(format!("put_public_access_block {bucket}"));
        Ok(())
    }

    fn bucket_policy(&self, bucket: &str) -> StoreResult<Option<String>> {
        let state = lock(&self.shared.state);
        let bucket = state.buckets.get(bucket).ok_or_else(missing_bucket)?;
        Ok(bucket.policy.clone())
    }

    fn put_bucket_policy(&self, bucket: &str, policy_json: &str) -> StoreResult<()> {
        if serde_json::from_str::<serde_json::Value>(policy_json).is_err() {
            return Err(StoreError::Rejected {
                message: "MalformedPolicy".to_string(),
            });
        }
        let mut state = lock(&self.shared.state);
        let target = state.buckets.get_mut(bucket).ok_or_else(missing_bucket)?;
        target.policy = Some(policy_json.to_string());
        self.commit(&state, None).map_err(StoreError::Transport)?;
        self.record(format!("put_bucket_policy {bucket}"));
        Ok(())
    }
}

impl DeliveryNetwork for SimulatedCloud {
    fn find_origin_access_control(&self, name: &str) -> DeliveryResult<Option<String>> {
        Ok(lock(&self.shared.state)
            .origin_access_controls
            .iter()
            .find(|(_, spec)| spec.name == name)
            .map(|(id, _)| id.clone()))
    }

    fn create_origin_access_control(
        &self,
        spec: &OriginAccessControlSpec,
    ) -> DeliveryResult<String> {
        let mut state = lock(&self.shared.state);
        if state
            .origin_access_controls
            .values()
            .any(|existing| existing.name == spec.name)
        {
            return Err(DeliveryError::Rejected {
                message: format!("OriginAccessControlAlreadyExists: {}", spec.name),
            });
        }
        let id = state.next_id('O');
        state.origin_access_controls.insert(id.clone(), spec.clone());
        self.commit(&state, None).map_err(DeliveryError::Transport)?;
        self.record(format!("create_origin_access_control {}", spec.name));
        Ok(id)
    }

    fn get_distribution(&self, id: &str) -> DeliveryResult<Option<LiveDistribution>> {
        Ok(lock(&self.shared.state)
            .distributions
            .get(id)
            .map(SimDistribution::live))
    }

    fn find_distribution_by_comment(
        &self,
        comment: &str,
    ) -> DeliveryResult<Option<LiveDistribution>> {
        Ok(lock(&self.shared.state)
            .distributions
            .values()
            .find(|d| d.spec.comment == comment)
            .map(SimDistribution::live))
    }

    fn create_distribution(&self, spec: &DistributionSpec) -> DeliveryResult<Distribution> {
        let mut state = lock(&self.shared.state);
        let id = state.next_id('E');
        let identity = Distribution {
            arn: format!("arn:aws:cloudfront::{SIMULATED_ACCOUNT}:distribution/{id}"),
            domain_name: format!("d{}.cloudfront.net", id[1..].to_ascii_lowercase()),
            id: id.clone(),
        };
        state.distributions.insert(
            id,
            SimDistribution {
                identity: identity.clone(),
                spec: spec.clone(),
                version: 1,
            },
        );
        self.commit(&state, None).map_err(DeliveryError::Transport)?;
        self.record(format!("create_distribution {}", identity.id));
        Ok(identity)
    }

    fn update_distribution(
        &self,
        id: &str,
        etag: Option<&str>,
        spec: &DistributionSpec,
    ) -> DeliveryResult<Distribution> {
        let mut state = lock(&self.shared.state);
        let existing = state
            .distributions
            .get_mut(id)
            .ok_or_else(|| DeliveryError::DistributionNotFound(id.to_string()))?;
        if etag != Some(existing.etag().as_str()) {
            return Err(DeliveryError::PreconditionFailed { id: id.to_string() });
        }
        existing.spec = spec.clone();
        existing.version += 1;
        let identity = existing.identity.clone();
        self.commit(&state, None).map_err(DeliveryError::Transport)?;
        self.record(format!("update_distribution {id}"));
        Ok(identity)
    }

    fn create_invalidation(
        &self,
        distribution_id: &str,
        request: &InvalidationRequest,
        caller_reference: &str,
    ) -> DeliveryResult<InvalidationTicket> {
        let (reject, polls) = {
            let faults = lock(&self.shared.faults);
            (faults.reject_invalidations, faults.invalidation_polls)
        };
        if reject {
            return Err(DeliveryError::Throttled);
        }

        let mut state = lock(&self.shared.state);
        if !state.distributions.contains_key(distribution_id) {
            return Err(DeliveryError::DistributionNotFound(
                distribution_id.to_string(),
            ));
        }
        if let Some(existing) = state
            .invalidations
            .iter()
            .find(|inv| inv.caller_reference == caller_reference)
        {
            return Ok(InvalidationTicket {
                id: existing.id.clone(),
                status: InvalidationStatus::InProgress,
            });
        }

        let id = state.next_id('I');
        state.invalidations.push(SimInvalidation {
            id: id.clone(),
            distribution_id: distribution_id.to_string(),
            caller_reference: caller_reference.to_string(),
            paths: request.paths().to_vec(),
            polls_remaining: polls,
        });
        self.commit(&state, None).map_err(DeliveryError::Transport)?;
        self.record(format!(
            "create_invalidation {distribution_id} {}",
            request.paths().join(",")
        ));
        Ok(InvalidationTicket {
            id,
            status: InvalidationStatus::InProgress,
        })
    }

    fn invalidation_status(
        &self,
        distribution_id: &str,
        invalidation_id: &str,
    ) -> DeliveryResult<InvalidationStatus> {
        let mut state = lock(&self.shared.state);
        let invalidation = state
            .invalidations
            .iter_mut()
            .find(|inv| inv.id == invalidation_id && inv.distribution_id == distribution_id)
            .ok_or_else(|| DeliveryError::Rejected {
                message: format!("NoSuchInvalidation: {invalidation_id}"),
            })?;
        if invalidation.polls_remaining == 0 {
            return Ok(InvalidationStatus::Completed);
        }
        invalidation.polls_remaining -= 1;
        Ok(InvalidationStatus::InProgress)
    }
}

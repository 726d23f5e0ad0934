//! Converge Use Case
//!
//! Orchestrates a convergence run:
//! 1. Load and fingerprint local assets, build the manifest
//! 2. Read recorded state and remote state, compute the plan
//! 3. Ensure the bucket and lock down public access
//! 4. Upload changed assets, delete removed ones
//! 5. Ensure the origin access control and distribution
//! 6. Bind the bucket policy to the distribution
//! 7. Invalidate changed paths
//! 8. Save convergence state
//!
//! A local read failure aborts before any remote call. A publish failure
//! aborts without saving state, so the next run retries. An invalidation
//! failure is only a warning; its paths stay pending.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::entities::{
    ConvergenceState, Distribution, InvalidationRequest, InvalidationStatus, LiveDistribution,
    PolicyDocument, PublishedObject, SiteManifest,
};
use crate::domain::ports::{
    AssetSource, ConvergeEvent, ConvergeEventSink, DeliveryNetwork, DistributionChange,
    NoopEventSink, ObjectStore, ObjectUpload, StateRepository,
};
use crate::domain::services::{InvalidationPlanner, PublishPlanner};
use crate::domain::value_objects::Fingerprint;
use crate::error::{SitefrontError, SitefrontResult};

use super::options::ConvergeOptions;
use super::plan::{ConvergePlan, DistributionAction};
use super::result::{ConvergeReport, InvalidationOutcome, Mutation};

/// Converge use case - drives remote infrastructure to the site manifest
///
/// Parameterized by its ports so tests run against the simulated provider.
pub struct ConvergeUseCase<AS, OS, DN, SR>
where
    AS: AssetSource,
    OS: ObjectStore,
    DN: DeliveryNetwork,
    SR: StateRepository,
{
    asset_source: AS,
    store: OS,
    network: DN,
    state_repo: SR,
}

impl<AS, OS, DN, SR> ConvergeUseCase<AS, OS, DN, SR>
where
    AS: AssetSource,
    OS: ObjectStore,
    DN: DeliveryNetwork,
    SR: StateRepository,
{
    pub fn new(asset_source: AS, store: OS, network: DN, state_repo: SR) -> Self {
        Self {
            asset_source,
            store,
            network,
            state_repo,
        }
    }

    /// Execute a run without event reporting
    pub fn execute(&self, options: &ConvergeOptions) -> SitefrontResult<ConvergeReport> {
        self.execute_with_events(options, Arc::new(NoopEventSink))
    }

    /// Execute a run, emitting progress events
    pub fn execute_with_events(
        &self,
        options: &ConvergeOptions,
        event_sink: Arc<dyn ConvergeEventSink>,
    ) -> SitefrontResult<ConvergeReport> {
        let _guard = if options.dry_run {
            None
        } else {
            Some(self.state_repo.lock(&options.state_path)?)
        };

        let plan = self.plan(options)?;

        event_sink.on_event(ConvergeEvent::Started {
            source: options.source.clone(),
            bucket: plan.manifest.bucket.name.clone(),
            asset_count: plan.manifest.assets.len(),
        });
        event_sink.on_event(ConvergeEvent::Planned {
            uploads: plan.publish.upload_count(),
            deletions: plan.publish.deletions.len(),
            unchanged: plan.publish.unchanged_count(),
        });

        let report = if options.dry_run {
            Self::dry_run_report(&plan)
        } else {
            self.apply(plan, options, event_sink.as_ref())?
        };

        event_sink.on_event(ConvergeEvent::Completed {
            uploaded: report.uploaded.len(),
            deleted: report.deleted.len(),
            mutations: report.mutation_count(),
        });
        Ok(report)
    }

    /// Compute the plan using only reads
    pub fn plan(&self, options: &ConvergeOptions) -> SitefrontResult<ConvergePlan> {
        let assets = self.asset_source.load_all(&options.source)?;
        let manifest = SiteManifest::build(&options.settings, assets)?;
        let bucket = manifest.bucket.name.clone();
        debug!(bucket = %bucket, assets = manifest.assets.len(), "manifest built");

        let mut state = self.state_repo.load(&options.state_path)?;
        if state.bucket().is_some_and(|recorded| recorded != bucket) {
            warn!(
                recorded = ?state.bucket(),
                bucket = %bucket,
                "state was recorded for a different bucket; starting fresh"
            );
            state = ConvergenceState::new();
        }

        let bucket_exists = self
            .store
            .bucket_exists(&bucket)
            .map_err(|source| SitefrontError::Bucket {
                bucket: bucket.clone(),
                source,
            })?;

        let (remote, access_block, remote_policy) = if bucket_exists {
            let access_block = self
                .store
                .public_access_block(&bucket)
                .map_err(|e| SitefrontError::Policy {
                    message: e.to_string(),
                })?;
            let policy = self
                .store
                .bucket_policy(&bucket)
                .map_err(|e| SitefrontError::Policy {
                    message: e.to_string(),
                })?;
            (self.remote_fingerprints(&manifest)?, access_block, policy)
        } else {
            (BTreeMap::new(), None, None)
        };

        let publish = PublishPlanner::plan(&manifest.assets, &remote, state.keys());
        let secure_bucket = !access_block.is_some_and(|b| b.is_fully_restrictive());

        let origin_access_control_id = self
            .network
            .find_origin_access_control(&manifest.origin_access_control.name)?;

        let live = self.find_distribution(&state, &manifest)?;
        let desired_distribution = match &origin_access_control_id {
            Some(id) => manifest.distribution.clone().with_origin_access_control(id),
            None => manifest.distribution.clone(),
        };
        let distribution = match live {
            None => DistributionAction::Create,
            Some(live)
                if origin_access_control_id.is_some() && live.spec == desired_distribution =>
            {
                DistributionAction::Keep { live }
            }
            Some(live) => DistributionAction::Update { live },
        };

        let policy_change = match distribution.live() {
            Some(live) => {
                let desired = PolicyDocument::cdn_read_only(&bucket, &live.identity.arn)?;
                remote_policy.map_or(true, |current| !desired.matches_json(&current))
            }
            None => true,
        };

        let invalidation = InvalidationPlanner::plan(
            &state.fingerprints(),
            &manifest,
            state.pending_invalidation(),
        );

        Ok(ConvergePlan {
            manifest,
            state,
            publish,
            create_bucket: !bucket_exists,
            secure_bucket,
            origin_access_control_id,
            distribution,
            desired_distribution,
            policy_change,
            invalidation,
        })
    }

    fn remote_fingerprints(
        &self,
        manifest: &SiteManifest,
    ) -> SitefrontResult<BTreeMap<String, Fingerprint>> {
        let bucket = &manifest.bucket.name;
        let mut remote = BTreeMap::new();
        for asset in &manifest.assets {
            let found = self
                .store
                .head_fingerprint(bucket, asset.key())
                .map_err(|source| SitefrontError::Publish {
                    key: asset.key().to_string(),
                    source,
                })?;
            if let Some(fp) = found {
                remote.insert(asset.key().to_string(), fp);
            }
        }
        Ok(remote)
    }

    /// Recorded distribution first, then the comment marker
    fn find_distribution(
        &self,
        state: &ConvergenceState,
        manifest: &SiteManifest,
    ) -> SitefrontResult<Option<LiveDistribution>> {
        if let Some(recorded) = state.distribution() {
            if let Some(live) = self.network.get_distribution(&recorded.id)? {
                return Ok(Some(live));
            }
            warn!(id = %recorded.id, "recorded distribution no longer exists");
        }
        Ok(self
            .network
            .find_distribution_by_comment(&manifest.distribution.comment)?)
    }

    fn dry_run_report(plan: &ConvergePlan) -> ConvergeReport {
        let mut report = ConvergeReport::new(true);
        report.uploaded = plan.publish.uploads().map(|o| o.key.to_string()).collect();
        report.unchanged = plan.publish.unchanged().map(|o| o.key.to_string()).collect();
        report.deleted = plan.publish.deletions.iter().map(|k| k.to_string()).collect();
        if let Some(live) = plan.distribution.live() {
            report.distribution = Some(live.identity.clone());
        }
        report.policy_changed = plan.policy_change;
        report.invalidation = plan
            .invalidation
            .as_ref()
            .map(|request| InvalidationOutcome::Planned {
                paths: request.paths().to_vec(),
            });
        report.mutations = plan.mutations();
        report
    }

    fn apply(
        &self,
        plan: ConvergePlan,
        options: &ConvergeOptions,
        event_sink: &dyn ConvergeEventSink,
    ) -> SitefrontResult<ConvergeReport> {
        let ConvergePlan {
            manifest,
            mut state,
            publish,
            create_bucket,
            secure_bucket,
            origin_access_control_id,
            distribution,
            invalidation,
            ..
        } = plan;
        let bucket = manifest.bucket.name.clone();
        let mut report = ConvergeReport::new(false);

        // Bucket
        if create_bucket {
            self.store
                .create_bucket(&manifest.bucket)
                .map_err(|source| SitefrontError::Bucket {
                    bucket: bucket.clone(),
                    source,
                })?;
            info!(bucket = %bucket, "bucket created");
            report.mutations.push(Mutation::CreateBucket {
                bucket: bucket.clone(),
            });
        }
        if secure_bucket {
            self.store
                .put_public_access_block(&bucket, &manifest.public_access_block)
                .map_err(|e| SitefrontError::Policy {
                    message: e.to_string(),
                })?;
            info!(bucket = %bucket, "public access blocked");
            report.mutations.push(Mutation::PutPublicAccessBlock {
                bucket: bucket.clone(),
            });
            event_sink.on_event(ConvergeEvent::BucketSecured {
                bucket: bucket.clone(),
            });
        }

        // Objects
        for (asset, planned) in manifest.assets.iter().zip(&publish.objects) {
            let key = asset.key().to_string();
            if !planned.should_upload() {
                if event_sink.wants_detailed_events() {
                    event_sink.on_event(ConvergeEvent::ObjectSkipped { key: key.clone() });
                }
                report.unchanged.push(key);
                continue;
            }
            let upload = ObjectUpload {
                key: asset.key(),
                body: asset.content(),
                content_type: asset.media_type().as_str(),
                cache_control: manifest.cache_control_for(asset),
                fingerprint: asset.fingerprint(),
            };
            self.store
                .put_object(&bucket, &upload)
                .map_err(|source| SitefrontError::Publish {
                    key: key.clone(),
                    source,
                })?;
            debug!(key = %key, fingerprint = %asset.fingerprint(), "uploaded");
            event_sink.on_event(ConvergeEvent::ObjectUploaded {
                key: key.clone(),
                bytes: asset.size(),
            });
            report.mutations.push(Mutation::PutObject { key: key.clone() });
            report.uploaded.push(key);
        }
        for key in &publish.deletions {
            self.store
                .delete_object(&bucket, key)
                .map_err(|source| SitefrontError::Publish {
                    key: key.to_string(),
                    source,
                })?;
            debug!(key = %key, "deleted");
            event_sink.on_event(ConvergeEvent::ObjectDeleted {
                key: key.to_string(),
            });
            report.mutations.push(Mutation::DeleteObject {
                key: key.to_string(),
            });
            report.deleted.push(key.to_string());
        }

        // Origin access control and distribution
        let origin_access_control_id = match origin_access_control_id {
            Some(id) => id,
            None => {
                let spec = &manifest.origin_access_control;
                let id = self.network.create_origin_access_control(spec)?;
                info!(name = %spec.name, id = %id, "origin access control created");
                report.mutations.push(Mutation::CreateOriginAccessControl {
                    name: spec.name.clone(),
                });
                id
            }
        };
        let desired = manifest
            .distribution
            .clone()
            .with_origin_access_control(&origin_access_control_id);

        let (identity, change) = match distribution {
            DistributionAction::Create => {
                let created = self.network.create_distribution(&desired)?;
                info!(id = %created.id, domain = %created.domain_name, "distribution created");
                report.mutations.push(Mutation::CreateDistribution {
                    comment: desired.comment.clone(),
                });
                (created, DistributionChange::Created)
            }
            DistributionAction::Update { live } if live.spec == desired => {
                (live.identity, DistributionChange::Unchanged)
            }
            DistributionAction::Update { live } => {
                let updated = self.network.update_distribution(
                    &live.identity.id,
                    live.etag.as_deref(),
                    &desired,
                )?;
                info!(id = %updated.id, "distribution updated");
                report.mutations.push(Mutation::UpdateDistribution {
                    id: updated.id.clone(),
                });
                (updated, DistributionChange::Updated)
            }
            DistributionAction::Keep { live } => (live.identity, DistributionChange::Unchanged),
        };
        event_sink.on_event(ConvergeEvent::DistributionReady {
            id: identity.id.clone(),
            domain: identity.domain_name.clone(),
            change,
        });

        // Policy
        report.policy_changed = self.bind_policy(&bucket, &identity)?;
        if report.policy_changed {
            report.mutations.push(Mutation::PutBucketPolicy {
                bucket: bucket.clone(),
            });
        }
        event_sink.on_event(ConvergeEvent::PolicyBound {
            changed: report.policy_changed,
        });

        // Invalidation
        if let Some(request) = invalidation {
            let outcome = self.invalidate(&identity, &request, options, &mut report, event_sink);
            match &outcome {
                InvalidationOutcome::Failed { paths, .. } => {
                    state.set_pending_invalidation(paths.iter().cloned());
                }
                _ => state.clear_pending_invalidation(),
            }
            report.invalidation = Some(outcome);
        }

        // State
        for key in &publish.deletions {
            state.remove(key.as_str());
        }
        for asset in &manifest.assets {
            state.record_published(&PublishedObject::from_asset(asset), asset.media_type().as_str());
        }
        state.set_bucket(bucket);
        state.set_distribution(identity.clone());
        state.set_origin_access_control_id(origin_access_control_id);
        state.set_last_converged(Utc::now());
        self.state_repo.save(&state, &options.state_path)?;

        report.set_distribution(identity, change);
        info!(mutations = report.mutation_count(), "converged");
        Ok(report)
    }

    /// Put the policy unless the bucket already carries it
    fn bind_policy(&self, bucket: &str, distribution: &Distribution) -> SitefrontResult<bool> {
        let desired = PolicyDocument::cdn_read_only(bucket, &distribution.arn)?;
        let current = self
            .store
            .bucket_policy(bucket)
            .map_err(|e| SitefrontError::Policy {
                message: e.to_string(),
            })?;
        if current.is_some_and(|json| desired.matches_json(&json)) {
            return Ok(false);
        }
        self.store
            .put_bucket_policy(bucket, &desired.to_json())
            .map_err(|e| SitefrontError::Policy {
                message: e.to_string(),
            })?;
        info!(bucket = %bucket, arn = %distribution.arn, "bucket policy bound");
        Ok(true)
    }

    fn invalidate(
        &self,
        distribution: &Distribution,
        request: &InvalidationRequest,
        options: &ConvergeOptions,
        report: &mut ConvergeReport,
        event_sink: &dyn ConvergeEventSink,
    ) -> InvalidationOutcome {
        let paths = request.paths().to_vec();
        let caller_reference = request.caller_reference(Utc::now().timestamp_millis());

        let ticket =
            match self
                .network
                .create_invalidation(&distribution.id, request, &caller_reference)
            {
                Ok(ticket) => ticket,
                Err(err) => {
                    let err = SitefrontError::Invalidation {
                        paths: paths.clone(),
                        message: err.to_string(),
                    };
                    warn!(error = %err, "invalidation failed; paths kept pending");
                    report.warnings.push(err.to_string());
                    event_sink.on_event(ConvergeEvent::InvalidationFailed {
                        paths: paths.clone(),
                        error: err.to_string(),
                    });
                    return InvalidationOutcome::Failed {
                        paths,
                        error: err.to_string(),
                    };
                }
            };

        info!(id = %ticket.id, paths = ?paths, "invalidation submitted");
        report.mutations.push(Mutation::CreateInvalidation {
            paths: paths.clone(),
        });
        event_sink.on_event(ConvergeEvent::InvalidationSubmitted {
            id: ticket.id.clone(),
            paths: paths.clone(),
        });

        let completed = if ticket.status == InvalidationStatus::Completed {
            true
        } else if options.wait {
            self.wait_for_invalidation(&distribution.id, &ticket.id, options, report)
        } else {
            false
        };
        if completed {
            event_sink.on_event(ConvergeEvent::InvalidationCompleted {
                id: ticket.id.clone(),
            });
        }

        InvalidationOutcome::Submitted {
            id: ticket.id,
            paths,
            completed,
        }
    }

    /// Poll until completed; a timeout or status error is only a warning
    fn wait_for_invalidation(
        &self,
        distribution_id: &str,
        invalidation_id: &str,
        options: &ConvergeOptions,
        report: &mut ConvergeReport,
    ) -> bool {
        let deadline = Instant::now() + options.wait_timeout;
        loop {
            match self
                .network
                .invalidation_status(distribution_id, invalidation_id)
            {
                Ok(InvalidationStatus::Completed) => return true,
                Ok(InvalidationStatus::InProgress) => {}
                Err(err) => {
                    warn!(id = %invalidation_id, error = %err, "cannot read invalidation status");
                    report
                        .warnings
                        .push(format!("invalidation {invalidation_id}: {err}"));
                    return false;
                }
            }
            if Instant::now() >= deadline {
                warn!(id = %invalidation_id, "invalidation still in progress after timeout");
                report.warnings.push(format!(
                    "invalidation {invalidation_id} still in progress after {}s",
                    options.wait_timeout.as_secs()
                ));
                return false;
            }
            std::thread::sleep(options.poll_interval);
        }
    }
}

//! Converge Plan
//!
//! Everything a run would change, computed from the manifest, the recorded
//! state and read-only provider calls.

use serde_json::json;

use crate::domain::entities::{
    ConvergenceState, DistributionSpec, InvalidationRequest, LiveDistribution, SiteManifest,
};
use crate::domain::services::PublishPlan;

use super::result::Mutation;

/// How the distribution will be converged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistributionAction {
    Create,
    Update { live: LiveDistribution },
    Keep { live: LiveDistribution },
}

impl DistributionAction {
    pub fn live(&self) -> Option<&LiveDistribution> {
        match self {
            DistributionAction::Create => None,
            DistributionAction::Update { live } | DistributionAction::Keep { live } => Some(live),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            DistributionAction::Create => "create",
            DistributionAction::Update { .. } => "update",
            DistributionAction::Keep { .. } => "keep",
        }
    }
}

/// Computed convergence plan
#[derive(Debug, Clone)]
pub struct ConvergePlan {
    pub manifest: SiteManifest,
    /// State recorded by the previous run
    pub state: ConvergenceState,
    pub publish: PublishPlan,
    pub create_bucket: bool,
    /// Public access block is missing or not fully restrictive
    pub secure_bucket: bool,
    /// Existing origin access control, `None` when it must be created
    pub origin_access_control_id: Option<String>,
    pub distribution: DistributionAction,
    /// Desired distribution configuration, bound to the origin access
    /// control when its id is already known
    pub desired_distribution: DistributionSpec,
    pub policy_change: bool,
    pub invalidation: Option<InvalidationRequest>,
}

impl ConvergePlan {
    /// Remote writes this plan implies, in execution order
    pub fn mutations(&self) -> Vec<Mutation> {
        let bucket = &self.manifest.bucket.name;
        let mut mutations = Vec::new();

        if self.create_bucket {
            mutations.push(Mutation::CreateBucket {
                bucket: bucket.clone(),
            });
        }
        if self.secure_bucket {
            mutations.push(Mutation::PutPublicAccessBlock {
                bucket: bucket.clone(),
            });
        }
        mutations.extend(self.publish.uploads().map(|o| Mutation::PutObject {
            key: o.key.to_string(),
        }));
        mutations.extend(self.publish.deletions.iter().map(|k| Mutation::DeleteObject {
            key: k.to_string(),
        }));
        if self.origin_access_control_id.is_none() {
            mutations.push(Mutation::CreateOriginAccessControl {
                name: self.manifest.origin_access_control.name.clone(),
            });
        }
        match &self.distribution {
            DistributionAction::Create => mutations.push(Mutation::CreateDistribution {
                comment: self.desired_distribution.comment.clone(),
            }),
            DistributionAction::Update { live } => mutations.push(Mutation::UpdateDistribution {
                id: live.identity.id.clone(),
            }),
            DistributionAction::Keep { .. } => {}
        }
        if self.policy_change {
            mutations.push(Mutation::PutBucketPolicy {
                bucket: bucket.clone(),
            });
        }
        if let Some(request) = &self.invalidation {
            mutations.push(Mutation::CreateInvalidation {
                paths: request.paths().to_vec(),
            });
        }
        mutations
    }

    /// Whether remote state already matches the manifest
    pub fn is_converged(&self) -> bool {
        self.mutations().is_empty()
    }

    pub fn invalidation_paths(&self) -> &[String] {
        self.invalidation
            .as_ref()
            .map(InvalidationRequest::paths)
            .unwrap_or_default()
    }

    /// JSON rendering for `plan --json`
    pub fn to_document(&self) -> serde_json::Value {
        json!({
            "bucket": self.manifest.bucket.name,
            "uploads": self.publish.uploads().map(|o| o.key.as_str()).collect::<Vec<_>>(),
            "unchanged": self.publish.unchanged_count(),
            "deletions": self.publish.deletions.iter().map(|k| k.as_str()).collect::<Vec<_>>(),
            "create_bucket": self.create_bucket,
            "secure_bucket": self.secure_bucket,
            "distribution": self.distribution.label(),
            "policy_change": self.policy_change,
            "invalidation": self.invalidation_paths(),
            "mutations": self.mutations(),
            "manifest": self.manifest.to_document(),
        })
    }
}

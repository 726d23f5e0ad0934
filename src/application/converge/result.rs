//! Converge Result
//!
//! Result types for convergence runs.

use std::fmt;

use serde::Serialize;

use crate::domain::entities::Distribution;
use crate::domain::ports::DistributionChange;

/// A single remote write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mutation {
    CreateBucket { bucket: String },
    PutPublicAccessBlock { bucket: String },
    PutObject { key: String },
    DeleteObject { key: String },
    CreateOriginAccessControl { name: String },
    CreateDistribution { comment: String },
    UpdateDistribution { id: String },
    PutBucketPolicy { bucket: String },
    CreateInvalidation { paths: Vec<String> },
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::CreateBucket { bucket } => write!(f, "create bucket {bucket}"),
            Mutation::PutPublicAccessBlock { bucket } => {
                write!(f, "block public access on {bucket}")
            }
            Mutation::PutObject { key } => write!(f, "upload {key}"),
            Mutation::DeleteObject { key } => write!(f, "delete {key}"),
            Mutation::CreateOriginAccessControl { name } => {
                write!(f, "create origin access control {name}")
            }
            Mutation::CreateDistribution { comment } => {
                write!(f, "create distribution ({comment})")
            }
            Mutation::UpdateDistribution { id } => write!(f, "update distribution {id}"),
            Mutation::PutBucketPolicy { bucket } => write!(f, "bind policy on {bucket}"),
            Mutation::CreateInvalidation { paths } => {
                write!(f, "invalidate {}", paths.join(", "))
            }
        }
    }
}

/// What happened to this run's invalidation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvalidationOutcome {
    /// Computed but not submitted (dry run)
    Planned { paths: Vec<String> },
    /// Accepted by the provider
    Submitted {
        id: String,
        paths: Vec<String>,
        completed: bool,
    },
    /// Rejected; paths are kept pending for the next run
    Failed { paths: Vec<String>, error: String },
}

impl InvalidationOutcome {
    pub fn paths(&self) -> &[String] {
        match self {
            InvalidationOutcome::Planned { paths }
            | InvalidationOutcome::Submitted { paths, .. }
            | InvalidationOutcome::Failed { paths, .. } => paths,
        }
    }
}

/// Result of a convergence run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConvergeReport {
    pub dry_run: bool,
    pub uploaded: Vec<String>,
    pub unchanged: Vec<String>,
    pub deleted: Vec<String>,
    pub distribution: Option<Distribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution_change: Option<&'static str>,
    pub policy_changed: bool,
    pub invalidation: Option<InvalidationOutcome>,
    /// Remote writes performed, or planned when `dry_run`
    pub mutations: Vec<Mutation>,
    pub warnings: Vec<String>,
}

impl ConvergeReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    pub fn has_changes(&self) -> bool {
        !self.mutations.is_empty()
    }

    pub fn mutation_count(&self) -> usize {
        self.mutations.len()
    }

    pub(crate) fn set_distribution(&mut self, distribution: Distribution, change: DistributionChange) {
        self.distribution = Some(distribution);
        self.distribution_change = Some(change.as_str());
    }
}

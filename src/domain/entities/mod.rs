//! Domain Entities
//!
//! - `Asset` - A local site file with its fingerprint
//! - `PublishedObject` - The remote counterpart of an Asset
//! - `SiteManifest` - Desired state of bucket, policy and distribution
//! - `ConvergenceState` - What the last run recorded

mod asset;
mod distribution;
mod invalidation;
mod manifest;
pub mod policy;
mod published_object;
mod state;

pub use asset::Asset;
pub use distribution::{
    normalize_methods, read_only_methods, DefaultBehavior, Distribution, DistributionSpec,
    HttpMethod, LiveDistribution, OriginAccessControlSpec, OriginSpec, ViewerProtocolPolicy,
    CACHING_OPTIMIZED_POLICY_ID,
};
pub use invalidation::{
    InvalidationRequest, InvalidationStatus, InvalidationTicket, WILDCARD_ALL,
};
pub use manifest::{
    distribution_marker, BucketSpec, SiteManifest, SiteSettings, DEFAULT_MAX_INVALIDATION_PATHS,
};
pub use policy::{PolicyDocument, PolicyValidationError, PublicAccessBlock};
pub use published_object::{PublishedObject, Visibility};
pub use state::{ConvergenceState, StateEntry};

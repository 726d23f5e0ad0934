//! DeliveryNetwork port - the CDN side of the provider
//!
//! Distribution updates are conditional on the etag returned by
//! `get_distribution`, mirroring how CDN configuration APIs guard against
//! concurrent edits.

use thiserror::Error;

use crate::domain::entities::{
    Distribution, DistributionSpec, InvalidationRequest, InvalidationStatus, InvalidationTicket,
    LiveDistribution, OriginAccessControlSpec,
};

pub type DeliveryResult<T> = Result<T, DeliveryError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("distribution '{0}' not found")]
    DistributionNotFound(String),
    #[error("distribution '{id}' changed concurrently (etag mismatch)")]
    PreconditionFailed { id: String },
    #[error("request rejected: {message}")]
    Rejected { message: String },
    #[error("request throttled")]
    Throttled,
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Distribution, origin access control and invalidation operations
pub trait DeliveryNetwork {
    /// Id of the origin access control with this name, if one exists
    fn find_origin_access_control(&self, name: &str) -> DeliveryResult<Option<String>>;

    /// Create an origin access control and return its id
    fn create_origin_access_control(&self, spec: &OriginAccessControlSpec)
        -> DeliveryResult<String>;

    fn get_distribution(&self, id: &str) -> DeliveryResult<Option<LiveDistribution>>;

    /// Locate a distribution by its comment marker
    fn find_distribution_by_comment(&self, comment: &str)
        -> DeliveryResult<Option<LiveDistribution>>;

    fn create_distribution(&self, spec: &DistributionSpec) -> DeliveryResult<Distribution>;

    fn update_distribution(
        &self,
        id: &str,
        etag: Option<&str>,
        spec: &DistributionSpec,
    ) -> DeliveryResult<Distribution>;

    fn create_invalidation(
        &self,
        distribution_id: &str,
        request: &InvalidationRequest,
        caller_reference: &str,
    ) -> DeliveryResult<InvalidationTicket>;

    fn invalidation_status(
        &self,
        distribution_id: &str,
        invalidation_id: &str,
    ) -> DeliveryResult<InvalidationStatus>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_error_display() {
        let err = DeliveryError::PreconditionFailed {
            id: "E123".to_string(),
        };
        assert!(err.to_string().contains("E123"));
    }
}

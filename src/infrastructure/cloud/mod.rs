//! Provider Implementations
//!
//! Concrete implementations of the ObjectStore and DeliveryNetwork ports:
//! - SimulatedCloud: in-process model, in memory or persisted to a directory
//! - AwsCloud: S3 and CloudFront through the AWS SDK (feature `aws`)

#[cfg(feature = "aws")]
mod aws;
mod simulated;

#[cfg(feature = "aws")]
pub use aws::AwsCloud;
pub use simulated::{SimulatedCloud, SIMULATED_ACCOUNT};

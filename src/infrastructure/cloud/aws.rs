//! AWS Provider
//!
//! Implements the provider ports with the AWS SDK: S3 for the bucket side
//! and CloudFront for the delivery network. The SDK is async; a
//! current-thread tokio runtime owned by `AwsCloud` drives each call to
//! completion so the ports stay synchronous.

use std::sync::Arc;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudfront::types as cf;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types as s3;
use tokio::runtime::Runtime;
use tracing::debug;

use crate::domain::entities::{
    normalize_methods, BucketSpec, DefaultBehavior, Distribution, DistributionSpec, HttpMethod,
    InvalidationRequest, InvalidationStatus, InvalidationTicket, LiveDistribution,
    OriginAccessControlSpec, OriginSpec, PublicAccessBlock, ViewerProtocolPolicy,
};
use crate::domain::ports::object_store::FINGERPRINT_METADATA_KEY;
use crate::domain::ports::{
    DeliveryError, DeliveryNetwork, DeliveryResult, ObjectStore, ObjectUpload, StoreError,
    StoreResult,
};
use crate::domain::value_objects::{Fingerprint, ObjectKey};

/// Region CloudFront and bucket creation without a location constraint use
const DEFAULT_REGION: &str = "us-east-1";

const THROTTLE_CODES: &[&str] = &[
    "SlowDown",
    "Throttling",
    "ThrottlingException",
    "TooManyRequests",
];

/// AWS-backed provider; clones share clients and runtime
#[derive(Clone)]
pub struct AwsCloud {
    runtime: Arc<Runtime>,
    s3: aws_sdk_s3::Client,
    cloudfront: aws_sdk_cloudfront::Client,
}

impl AwsCloud {
    /// Load credentials from the environment and connect in `region`
    pub fn connect(region: &str) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let config = runtime.block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(region.to_string()))
                .load(),
        );
        Ok(Self {
            s3: aws_sdk_s3::Client::new(&config),
            cloudfront: aws_sdk_cloudfront::Client::new(&config),
            runtime: Arc::new(runtime),
        })
    }
}

fn store_error<E, R>(err: SdkError<E, R>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err.as_service_error() {
        Some(service) if service.code().is_some_and(|c| THROTTLE_CODES.contains(&c)) => {
            StoreError::Throttled
        }
        Some(service) => StoreError::Rejected {
            message: format!(
                "{}: {}",
                service.code().unwrap_or("Unknown"),
                service.message().unwrap_or_default()
            ),
        },
        None => StoreError::Transport(DisplayErrorContext(&err).to_string()),
    }
}

fn delivery_error<E, R>(err: SdkError<E, R>) -> DeliveryError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err.as_service_error() {
        Some(service) if service.code().is_some_and(|c| THROTTLE_CODES.contains(&c)) => {
            DeliveryError::Throttled
        }
        Some(service) => DeliveryError::Rejected {
            message: format!(
                "{}: {}",
                service.code().unwrap_or("Unknown"),
                service.message().unwrap_or_default()
            ),
        },
        None => DeliveryError::Transport(DisplayErrorContext(&err).to_string()),
    }
}

fn build_error(err: impl std::fmt::Display) -> DeliveryError {
    DeliveryError::Rejected {
        message: format!("invalid request: {err}"),
    }
}

fn service_code<E, R>(err: &SdkError<E, R>) -> Option<&str>
where
    E: ProvideErrorMetadata,
{
    err.as_service_error().and_then(|e| e.code())
}

impl ObjectStore for AwsCloud {
    fn bucket_exists(&self, bucket: &str) -> StoreResult<bool> {
        let result = self
            .runtime
            .block_on(self.s3.head_bucket().bucket(bucket).send());
        match result {
            Ok(_) => Ok(true),
            Err(err) if err.as_service_error().is_some_and(|e| e.is_not_found()) => Ok(false),
            Err(err) => Err(store_error(err)),
        }
    }

    fn create_bucket(&self, spec: &BucketSpec) -> StoreResult<()> {
        let mut request = self.s3.create_bucket().bucket(&spec.name);
        if spec.region != DEFAULT_REGION {
            request = request.create_bucket_configuration(
                s3::CreateBucketConfiguration::builder()
                    .location_constraint(s3::BucketLocationConstraint::from(spec.region.as_str()))
                    .build(),
            );
        }
        self.runtime
            .block_on(request.send())
            .map_err(store_error)?;
        debug!(bucket = %spec.name, "s3 create_bucket");
        Ok(())
    }

    fn head_fingerprint(&self, bucket: &str, key: &ObjectKey) -> StoreResult<Option<Fingerprint>> {
        let result = self
            .runtime
            .block_on(self.s3.head_object().bucket(bucket).key(key.as_str()).send());
        match result {
            Ok(output) => Ok(output
                .metadata()
                .and_then(|m| m.get(FINGERPRINT_METADATA_KEY))
                .map(|fp| Fingerprint::new(fp))),
            Err(err) if err.as_service_error().is_some_and(|e| e.is_not_found()) => Ok(None),
            Err(err) => Err(store_error(err)),
        }
    }

    fn put_object(&self, bucket: &str, upload: &ObjectUpload<'_>) -> StoreResult<()> {
        let request = self
            .s3
            .put_object()
            .bucket(bucket)
            .key(upload.key.as_str())
            .content_type(upload.content_type)
            .set_cache_control(upload.cache_control.map(str::to_string))
            .metadata(FINGERPRINT_METADATA_KEY, upload.fingerprint.as_str())
            .body(ByteStream::from(upload.body.to_vec()));
        self.runtime
            .block_on(request.send())
            .map_err(store_error)?;
        Ok(())
    }

    fn delete_object(&self, bucket: &str, key: &ObjectKey) -> StoreResult<()> {
        self.runtime
            .block_on(self.s3.delete_object().bucket(bucket).key(key.as_str()).send())
            .map_err(store_error)?;
        Ok(())
    }

    fn public_access_block(&self, bucket: &str) -> StoreResult<Option<PublicAccessBlock>> {
        let result = self
            .runtime
            .block_on(self.s3.get_public_access_block().bucket(bucket).send());
        match result {
            Ok(output) => Ok(output.public_access_block_configuration().map(|c| {
                PublicAccessBlock {
                    block_public_acls: c.block_public_acls().unwrap_or(false),
                    ignore_public_acls: c.ignore_public_acls().unwrap_or(false),
                    block_public_policy: c.block_public_policy().unwrap_or(false),
                    restrict_public_buckets: c.restrict_public_buckets().unwrap_or(false),
                }
            })),
            Err(err) if service_code(&err) == Some("NoSuchPublicAccessBlockConfiguration") => {
                Ok(None)
            }
            Err(err) => Err(store_error(err)),
        }
    }

    fn put_public_access_block(&self, bucket: &str, block: &PublicAccessBlock) -> StoreResult<()> {
        let configuration = s3::PublicAccessBlockConfiguration::builder()
            .block_public_acls(block.block_public_acls)
            .ignore_public_acls(block.ignore_public_acls)
            .block_public_policy(block.block_public_policy)
            .restrict_public_buckets(block.restrict_public_buckets)
            .build();
        self.runtime
            .block_on(
                self.s3
                    .put_public_access_block()
                    .bucket(bucket)
                    .public_access_block_configuration(configuration)
                    .send(),
            )
            .map_err(store_error)?;
        Ok(())
    }

    fn bucket_policy(&self, bucket: &str) -> StoreResult<Option<String>> {
        let result = self
            .runtime
            .block_on(self.s3.get_bucket_policy().bucket(bucket).send());
        match result {
            Ok(output) => Ok(output.policy().map(str::to_string)),
            Err(err) if service_code(&err) == Some("NoSuchBucketPolicy") => Ok(None),
            Err(err) => Err(store_error(err)),
        }
    }

    fn put_bucket_policy(&self, bucket: &str, policy_json: &str) -> StoreResult<()> {
        self.runtime
            .block_on(
                self.s3
                    .put_bucket_policy()
                    .bucket(bucket)
                    .policy(policy_json)
                    .send(),
            )
            .map_err(store_error)?;
        Ok(())
    }
}

fn method_to_cf(method: HttpMethod) -> cf::Method {
    cf::Method::from(method.as_str())
}

fn method_from_cf(method: &cf::Method) -> Option<HttpMethod> {
    match method.as_str() {
        "GET" => Some(HttpMethod::Get),
        "HEAD" => Some(HttpMethod::Head),
        "OPTIONS" => Some(HttpMethod::Options),
        _ => None,
    }
}

fn distribution_config(
    spec: &DistributionSpec,
    caller_reference: &str,
) -> Result<cf::DistributionConfig, DeliveryError> {
    let behavior = &spec.default_behavior;
    let allowed: Vec<cf::Method> = behavior
        .allowed_methods
        .iter()
        .copied()
        .map(method_to_cf)
        .collect();
    let cached: Vec<cf::Method> = behavior
        .cached_methods
        .iter()
        .copied()
        .map(method_to_cf)
        .collect();

    let origin = cf::Origin::builder()
        .id(&spec.origin.id)
        .domain_name(&spec.origin.domain_name)
        .origin_access_control_id(
            spec.origin.origin_access_control_id.clone().unwrap_or_default(),
        )
        .s3_origin_config(
            cf::S3OriginConfig::builder()
                .origin_access_identity("")
                .build(),
        )
        .build()
        .map_err(build_error)?;

    let default_cache_behavior = cf::DefaultCacheBehavior::builder()
        .target_origin_id(&behavior.target_origin_id)
        .viewer_protocol_policy(cf::ViewerProtocolPolicy::from(
            behavior.viewer_protocol_policy.as_str(),
        ))
        .allowed_methods(
            cf::AllowedMethods::builder()
                .quantity(allowed.len() as i32)
                .set_items(Some(allowed))
                .cached_methods(
                    cf::CachedMethods::builder()
                        .quantity(cached.len() as i32)
                        .set_items(Some(cached))
                        .build()
                        .map_err(build_error)?,
                )
                .build()
                .map_err(build_error)?,
        )
        .compress(behavior.compress)
        .cache_policy_id(&behavior.cache_policy_id)
        .build()
        .map_err(build_error)?;

    cf::DistributionConfig::builder()
        .caller_reference(caller_reference)
        .comment(&spec.comment)
        .enabled(spec.enabled)
        .default_root_object(&spec.default_root_object)
        .price_class(cf::PriceClass::from(spec.price_class.as_str()))
        .origins(
            cf::Origins::builder()
                .quantity(1)
                .items(origin)
                .build()
                .map_err(build_error)?,
        )
        .default_cache_behavior(default_cache_behavior)
        .build()
        .map_err(build_error)
}

/// Read back the parts of a live configuration the domain models
///
/// Settings the domain cannot express (extra origins, write methods, other
/// viewer policies) leave the method lists empty so it never matches the desired
/// configuration and the next run rewrites it.
fn spec_from_config(config: &cf::DistributionConfig) -> DistributionSpec {
    let origins = config.origins().map(|o| o.items()).unwrap_or_default();
    let origin = match origins {
        [only] => OriginSpec {
            id: only.id().to_string(),
            domain_name: only.domain_name().to_string(),
            origin_access_control_id: only
                .origin_access_control_id()
                .filter(|id| !id.is_empty())
                .map(str::to_string),
        },
        _ => OriginSpec {
            id: String::new(),
            domain_name: String::new(),
            origin_access_control_id: None,
        },
    };

    let cache = config.default_cache_behavior();
    let methods = |items: &[cf::Method]| -> Option<Vec<HttpMethod>> {
        let parsed: Option<Vec<HttpMethod>> = items.iter().map(method_from_cf).collect();
        parsed.map(normalize_methods)
    };
    let allowed = cache
        .and_then(|c| c.allowed_methods())
        .and_then(|m| methods(m.items()));
    let cached = cache
        .and_then(|c| c.allowed_methods())
        .and_then(|m| m.cached_methods())
        .and_then(|m| methods(m.items()));
    let viewer_protocol_policy = match cache.map(|c| c.viewer_protocol_policy().as_str()) {
        Some("https-only") => Some(ViewerProtocolPolicy::HttpsOnly),
        Some("redirect-to-https") => Some(ViewerProtocolPolicy::RedirectToHttps),
        _ => None,
    };
    let representable = allowed.is_some() && cached.is_some() && viewer_protocol_policy.is_some();

    DistributionSpec {
        comment: config.comment().to_string(),
        enabled: config.enabled(),
        default_root_object: config.default_root_object().unwrap_or_default().to_string(),
        price_class: config
            .price_class()
            .map(|p| p.as_str().to_string())
            .unwrap_or_default(),
        origin,
        default_behavior: DefaultBehavior {
            target_origin_id: cache
                .map(|c| c.target_origin_id().to_string())
                .unwrap_or_default(),
            allowed_methods: if representable {
                allowed.unwrap_or_default()
            } else {
                Vec::new()
            },
            cached_methods: if representable {
                cached.unwrap_or_default()
            } else {
                Vec::new()
            },
            viewer_protocol_policy: viewer_protocol_policy.unwrap_or_default(),
            compress: cache.and_then(|c| c.compress()).unwrap_or(false),
            cache_policy_id: cache
                .and_then(|c| c.cache_policy_id())
                .unwrap_or_default()
                .to_string(),
        },
    }
}

/// Placeholder for a distribution whose configuration was not returned
fn unknown_spec() -> DistributionSpec {
    DistributionSpec {
        comment: String::new(),
        enabled: false,
        default_root_object: String::new(),
        price_class: String::new(),
        origin: OriginSpec {
            id: String::new(),
            domain_name: String::new(),
            origin_access_control_id: None,
        },
        default_behavior: DefaultBehavior {
            target_origin_id: String::new(),
            allowed_methods: Vec::new(),
            cached_methods: Vec::new(),
            viewer_protocol_policy: ViewerProtocolPolicy::default(),
            compress: false,
            cache_policy_id: String::new(),
        },
    }
}

fn identity(distribution: &cf::Distribution) -> Distribution {
    Distribution {
        id: distribution.id().to_string(),
        arn: distribution.arn().to_string(),
        domain_name: distribution.domain_name().to_string(),
    }
}

fn invalidation_status(status: &str) -> InvalidationStatus {
    if status == "Completed" {
        InvalidationStatus::Completed
    } else {
        InvalidationStatus::InProgress
    }
}

impl DeliveryNetwork for AwsCloud {
    fn find_origin_access_control(&self, name: &str) -> DeliveryResult<Option<String>> {
        let mut marker: Option<String> = None;
        loop {
            let output = self
                .runtime
                .block_on(
                    self.cloudfront
                        .list_origin_access_controls()
                        .set_marker(marker.take())
                        .send(),
                )
                .map_err(delivery_error)?;
            let Some(list) = output.origin_access_control_list() else {
                return Ok(None);
            };
            if let Some(found) = list.items().iter().find(|oac| oac.name() == name) {
                return Ok(Some(found.id().to_string()));
            }
            match list.next_marker() {
                Some(next) if list.is_truncated() => marker = Some(next.to_string()),
                _ => return Ok(None),
            }
        }
    }

    fn create_origin_access_control(
        &self,
        spec: &OriginAccessControlSpec,
    ) -> DeliveryResult<String> {
        let config = cf::OriginAccessControlConfig::builder()
            .name(&spec.name)
            .description(&spec.description)
            .signing_protocol(cf::OriginAccessControlSigningProtocols::from(
                spec.signing_protocol.as_str(),
            ))
            .signing_behavior(cf::OriginAccessControlSigningBehaviors::from(
                spec.signing_behavior.as_str(),
            ))
            .origin_access_control_origin_type(cf::OriginAccessControlOriginTypes::from(
                spec.origin_type.as_str(),
            ))
            .build()
            .map_err(build_error)?;
        let output = self
            .runtime
            .block_on(
                self.cloudfront
                    .create_origin_access_control()
                    .origin_access_control_config(config)
                    .send(),
            )
            .map_err(delivery_error)?;
        output
            .origin_access_control()
            .map(|oac| oac.id().to_string())
            .ok_or_else(|| {
                DeliveryError::Transport("response carried no origin access control".to_string())
            })
    }

    fn get_distribution(&self, id: &str) -> DeliveryResult<Option<LiveDistribution>> {
        let result = self
            .runtime
            .block_on(self.cloudfront.get_distribution().id(id).send());
        let output = match result {
            Ok(output) => output,
            Err(err) if err.as_service_error().is_some_and(|e| e.is_no_such_distribution()) => {
                return Ok(None)
            }
            Err(err) => return Err(delivery_error(err)),
        };
        Ok(output.distribution().map(|d| LiveDistribution {
            identity: identity(d),
            spec: d
                .distribution_config()
                .map(spec_from_config)
                .unwrap_or_else(unknown_spec),
            etag: output.e_tag().map(str::to_string),
        }))
    }

    fn find_distribution_by_comment(
        &self,
        comment: &str,
    ) -> DeliveryResult<Option<LiveDistribution>> {
        let mut marker: Option<String> = None;
        loop {
            let output = self
                .runtime
                .block_on(
                    self.cloudfront
                        .list_distributions()
                        .set_marker(marker.take())
                        .send(),
                )
                .map_err(delivery_error)?;
            let Some(list) = output.distribution_list() else {
                return Ok(None);
            };
            if let Some(found) = list.items().iter().find(|d| d.comment() == comment) {
                return self.get_distribution(found.id());
            }
            match list.next_marker() {
                Some(next) if list.is_truncated() => marker = Some(next.to_string()),
                _ => return Ok(None),
            }
        }
    }

    fn create_distribution(&self, spec: &DistributionSpec) -> DeliveryResult<Distribution> {
        let caller_reference = format!("sitefront-{}", chrono::Utc::now().timestamp_millis());
        let config = distribution_config(spec, &caller_reference)?;
        let output = self
            .runtime
            .block_on(
                self.cloudfront
                    .create_distribution()
                    .distribution_config(config)
                    .send(),
            )
            .map_err(delivery_error)?;
        output.distribution().map(identity).ok_or_else(|| {
            DeliveryError::Transport("response carried no distribution".to_string())
        })
    }

    fn update_distribution(
        &self,
        id: &str,
        etag: Option<&str>,
        spec: &DistributionSpec,
    ) -> DeliveryResult<Distribution> {
        let current = self
            .runtime
            .block_on(self.cloudfront.get_distribution_config().id(id).send())
            .map_err(delivery_error)?;
        let caller_reference = current
            .distribution_config()
            .map(|c| c.caller_reference().to_string())
            .ok_or_else(|| DeliveryError::DistributionNotFound(id.to_string()))?;
        let config = distribution_config(spec, &caller_reference)?;

        let result = self.runtime.block_on(
            self.cloudfront
                .update_distribution()
                .id(id)
                .set_if_match(etag.map(str::to_string))
                .distribution_config(config)
                .send(),
        );
        match result {
            Ok(output) => output.distribution().map(identity).ok_or_else(|| {
                DeliveryError::Transport("response carried no distribution".to_string())
            }),
            Err(err) if err.as_service_error().is_some_and(|e| e.is_precondition_failed()) => {
                Err(DeliveryError::PreconditionFailed { id: id.to_string() })
            }
            Err(err) => Err(delivery_error(err)),
        }
    }

    fn create_invalidation(
        &self,
        distribution_id: &str,
        request: &InvalidationRequest,
        caller_reference: &str,
    ) -> DeliveryResult<InvalidationTicket> {
        let paths = cf::Paths::builder()
            .quantity(request.paths().len() as i32)
            .set_items(Some(request.paths().to_vec()))
            .build()
            .map_err(build_error)?;
        let batch = cf::InvalidationBatch::builder()
            .paths(paths)
            .caller_reference(caller_reference)
            .build()
            .map_err(build_error)?;
        let output = self
            .runtime
            .block_on(
                self.cloudfront
                    .create_invalidation()
                    .distribution_id(distribution_id)
                    .invalidation_batch(batch)
                    .send(),
            )
            .map_err(delivery_error)?;
        output
            .invalidation()
            .map(|inv| InvalidationTicket {
                id: inv.id().to_string(),
                status: invalidation_status(inv.status()),
            })
            .ok_or_else(|| {
                DeliveryError::Transport("response carried no invalidation".to_string())
            })
    }

    fn invalidation_status(
        &self,
        distribution_id: &str,
        invalidation_id: &str,
    ) -> DeliveryResult<InvalidationStatus> {
        let output = self
            .runtime
            .block_on(
                self.cloudfront
                    .get_invalidation()
                    .distribution_id(distribution_id)
                    .id(invalidation_id)
                    .send(),
            )
            .map_err(delivery_error)?;
        Ok(output
            .invalidation()
            .map(|inv| invalidation_status(inv.status()))
            .unwrap_or(InvalidationStatus::InProgress))
    }
}

//! Site manifest - the explicit desired-state document
//!
//! Everything that should exist after convergence, built from settings plus the
//! local assets. The convergence use case consumes it and decides how to get
//! there.

use serde::Serialize;

use crate::domain::entities::{
    policy::validate_bucket_name, read_only_methods, Asset, DefaultBehavior, DistributionSpec,
    OriginAccessControlSpec, OriginSpec, PolicyValidationError, PublicAccessBlock,
    ViewerProtocolPolicy, CACHING_OPTIMIZED_POLICY_ID,
};

/// Most invalidation paths sent in one request before collapsing to `/*`
pub const DEFAULT_MAX_INVALIDATION_PATHS: usize = 15;

/// Settings a manifest is built from (resolved configuration)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSettings {
    pub bucket: String,
    pub region: String,
    pub index_document: String,
    pub comment: Option<String>,
    pub price_class: String,
    pub cache_policy_id: String,
    pub viewer_protocol_policy: ViewerProtocolPolicy,
    pub allow_options: bool,
    pub html_cache_control: Option<String>,
    pub asset_cache_control: Option<String>,
    pub max_invalidation_paths: usize,
}

impl SiteSettings {
    /// Settings with every optional value at its default
    pub fn new(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: region.into(),
            index_document: "index.html".to_string(),
            comment: None,
            price_class: "PriceClass_100".to_string(),
            cache_policy_id: CACHING_OPTIMIZED_POLICY_ID.to_string(),
            viewer_protocol_policy: ViewerProtocolPolicy::default(),
            allow_options: false,
            html_cache_control: None,
            asset_cache_control: None,
            max_invalidation_paths: DEFAULT_MAX_INVALIDATION_PATHS,
        }
    }
}

/// Bucket identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketSpec {
    pub name: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct AssetSummary<'a> {
    key: &'a str,
    fingerprint: &'a str,
    media_type: &'a str,
    size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    cache_control: Option<&'a str>,
}

/// Desired state of the whole site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteManifest {
    pub bucket: BucketSpec,
    pub public_access_block: PublicAccessBlock,
    pub origin_access_control: OriginAccessControlSpec,
    pub distribution: DistributionSpec,
    pub assets: Vec<Asset>,
    pub html_cache_control: Option<String>,
    pub asset_cache_control: Option<String>,
    pub max_invalidation_paths: usize,
}

impl SiteManifest {
    pub fn build(settings: &SiteSettings, mut assets: Vec<Asset>) -> Result<Self, PolicyValidationError> {
        validate_bucket_name(&settings.bucket)?;
        assets.sort_by(|a, b| a.key().cmp(b.key()));

        let origin = OriginSpec::for_bucket(&settings.bucket, &settings.region);
        let default_behavior = DefaultBehavior {
            target_origin_id: origin.id.clone(),
            allowed_methods: read_only_methods(settings.allow_options),
            cached_methods: read_only_methods(false),
            viewer_protocol_policy: settings.viewer_protocol_policy,
            compress: true,
            cache_policy_id: settings.cache_policy_id.clone(),
        };
        let distribution = DistributionSpec {
            comment: settings
                .comment
                .clone()
                .unwrap_or_else(|| distribution_marker(&settings.bucket)),
            enabled: true,
            default_root_object: settings.index_document.clone(),
            price_class: settings.price_class.clone(),
            origin,
            default_behavior,
        };

        Ok(Self {
            bucket: BucketSpec {
                name: settings.bucket.clone(),
                region: settings.region.clone(),
            },
            public_access_block: PublicAccessBlock::fully_restrictive(),
            origin_access_control: OriginAccessControlSpec::for_bucket(&settings.bucket),
            distribution,
            assets,
            html_cache_control: settings.html_cache_control.clone(),
            asset_cache_control: settings.asset_cache_control.clone(),
            max_invalidation_paths: settings.max_invalidation_paths.max(1),
        })
    }

    pub fn asset(&self, key: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.key().as_str() == key)
    }

    /// Cache-Control header for an asset's class
    pub fn cache_control_for(&self, asset: &Asset) -> Option<&str> {
        if asset.is_document() {
            self.html_cache_control.as_deref()
        } else {
            self.asset_cache_control.as_deref()
        }
    }

    /// JSON rendering of the desired state
    pub fn to_document(&self) -> serde_json::Value {
        let assets: Vec<AssetSummary<'_>> = self
            .assets
            .iter()
            .map(|a| AssetSummary {
                key: a.key().as_str(),
                fingerprint: a.fingerprint().as_str(),
                media_type: a.media_type().as_str(),
                size: a.size(),
                cache_control: self.cache_control_for(a),
            })
            .collect();

        serde_json::json!({
            "bucket": self.bucket,
            "public_access_block": self.public_access_block,
            "origin_access_control": self.origin_access_control,
            "distribution": self.distribution,
            "assets": assets,
        })
    }
}

/// Default distribution comment, used to find it again without recorded state
pub fn distribution_marker(bucket: &str) -> String {
    format!("sitefront:{bucket}")
}

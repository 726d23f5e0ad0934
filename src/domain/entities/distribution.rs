//! Delivery network configuration
//!
//! The configuration always carries exactly one origin and one default
//! behavior; there is no way to express more.

use serde::{Deserialize, Serialize};

/// Managed "CachingOptimized" cache policy
pub const CACHING_OPTIMIZED_POLICY_ID: &str = "658327ea-f89d-4fab-a63d-7e88639e58f6";

/// HTTP methods a behavior may allow
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

/// How viewers reach the edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewerProtocolPolicy {
    #[default]
    RedirectToHttps,
    HttpsOnly,
}

impl ViewerProtocolPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewerProtocolPolicy::RedirectToHttps => "redirect-to-https",
            ViewerProtocolPolicy::HttpsOnly => "https-only",
        }
    }
}

/// Signed-request credential letting one distribution read a private bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginAccessControlSpec {
    pub name: String,
    pub description: String,
    /// Always `sigv4`
    pub signing_protocol: String,
    /// Always `always`
    pub signing_behavior: String,
    /// Always `s3`
    pub origin_type: String,
}

impl OriginAccessControlSpec {
    pub fn for_bucket(bucket: &str) -> Self {
        Self {
            name: format!("{bucket}-oac"),
            description: format!("Origin access control for {bucket}"),
            signing_protocol: "sigv4".to_string(),
            signing_behavior: "always".to_string(),
            origin_type: "s3".to_string(),
        }
    }
}

/// The single origin: the bucket's regional endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginSpec {
    pub id: String,
    pub domain_name: String,
    /// Filled in once the origin access control exists
    pub origin_access_control_id: Option<String>,
}

impl OriginSpec {
    pub fn for_bucket(bucket: &str, region: &str) -> Self {
        Self {
            id: format!("s3-{bucket}"),
            domain_name: format!("{bucket}.s3.{region}.amazonaws.com"),
            origin_access_control_id: None,
        }
    }
}

/// The single default cache behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultBehavior {
    pub target_origin_id: String,
    pub allowed_methods: Vec<HttpMethod>,
    pub cached_methods: Vec<HttpMethod>,
    pub viewer_protocol_policy: ViewerProtocolPolicy,
    pub compress: bool,
    pub cache_policy_id: String,
}

/// Desired configuration of the delivery network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionSpec {
    /// Also used to find the distribution when no identity is recorded
    pub comment: String,
    pub enabled: bool,
    pub default_root_object: String,
    pub price_class: String,
    pub origin: OriginSpec,
    pub default_behavior: DefaultBehavior,
}

impl DistributionSpec {
    /// Bind the origin to an origin access control
    pub fn with_origin_access_control(mut self, id: impl Into<String>) -> Self {
        self.origin.origin_access_control_id = Some(id.into());
        self
    }
}

/// Identity of a live distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub id: String,
    pub arn: String,
    pub domain_name: String,
}

/// A distribution as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveDistribution {
    pub identity: Distribution,
    pub spec: DistributionSpec,
    /// Version tag required for updates
    pub etag: Option<String>,
}

/// Build the allowed method list, keeping only read-only methods
pub fn read_only_methods(with_options: bool) -> Vec<HttpMethod> {
    let mut methods = vec![HttpMethod::Get, HttpMethod::Head];
    if with_options {
        methods.push(HttpMethod::Options);
    }
    normalize_methods(methods)
}

/// Sorted, deduplicated method list; providers report methods in any order
pub fn normalize_methods(methods: impl IntoIterator<Item = HttpMethod>) -> Vec<HttpMethod> {
    let mut methods: Vec<HttpMethod> = methods.into_iter().collect();
    methods.sort();
    methods.dedup();
    methods
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_points_at_regional_endpoint() {
        let origin = OriginSpec::for_bucket("my-site", "eu-west-1");
        assert_eq!(origin.domain_name, "my-site.s3.eu-west-1.amazonaws.com");
        assert_eq!(origin.origin_access_control_id, None);
    }

    #[test]
    fn origin_access_control_signs_every_request() {
        let oac = OriginAccessControlSpec::for_bucket("my-site");
        assert_eq!(oac.signing_protocol, "sigv4");
        assert_eq!(oac.signing_behavior, "always");
        assert_eq!(oac.origin_type, "s3");
    }

    #[test]
    fn read_only_methods_never_include_writes() {
        assert_eq!(
            read_only_methods(false),
            vec![HttpMethod::Get, HttpMethod::Head]
        );
        assert_eq!(read_only_methods(true).len(), 3);
    }

    #[test]
    fn method_order_does_not_matter() {
        let reported = normalize_methods([HttpMethod::Head, HttpMethod::Get, HttpMethod::Head]);
        assert_eq!(reported, read_only_methods(false));
    }

    #[test]
    fn http_method_serializes_uppercase() {
        let json = serde_json::to_string(&HttpMethod::Options).unwrap();
        assert_eq!(json, "\"OPTIONS\"");
    }
}

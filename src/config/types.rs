//! Configuration type definitions

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::entities::policy::validate_bucket_name;
use crate::domain::entities::{
    SiteSettings, ViewerProtocolPolicy, CACHING_OPTIMIZED_POLICY_ID,
    DEFAULT_MAX_INVALIDATION_PATHS,
};
use crate::error::{SitefrontError, SitefrontResult};

use super::loader::{self, ConfigWarning};

/// Default configuration file name
pub const CONFIG_FILE: &str = "site.toml";

/// Local site settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Directory holding the built site, relative to the config file
    #[serde(default = "default_source")]
    pub source: PathBuf,

    #[serde(default = "default_index_document")]
    pub index_document: String,

    #[serde(default)]
    pub html_cache_control: Option<String>,

    #[serde(default)]
    pub asset_cache_control: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            index_document: default_index_document(),
            html_cache_control: None,
            asset_cache_control: None,
        }
    }
}

fn default_source() -> PathBuf {
    PathBuf::from("public")
}

fn default_index_document() -> String {
    "index.html".to_string()
}

/// Bucket settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketConfig {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default = "default_region")]
    pub region: String,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            name: None,
            region: default_region(),
        }
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}

/// Distribution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// Marker used to find the distribution again; derived from the bucket when unset
    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default = "default_price_class")]
    pub price_class: String,

    #[serde(default = "default_cache_policy_id")]
    pub cache_policy_id: String,

    #[serde(default)]
    pub viewer_protocol_policy: ViewerProtocolPolicy,

    /// Also allow OPTIONS on the default behavior
    #[serde(default)]
    pub allow_options: bool,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            comment: None,
            price_class: default_price_class(),
            cache_policy_id: default_cache_policy_id(),
            viewer_protocol_policy: ViewerProtocolPolicy::default(),
            allow_options: false,
        }
    }
}

fn default_price_class() -> String {
    "PriceClass_100".to_string()
}

fn default_cache_policy_id() -> String {
    CACHING_OPTIMIZED_POLICY_ID.to_string()
}

/// Invalidation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidationConfig {
    /// Above this many paths a single `/*` is sent instead
    #[serde(default = "default_max_paths")]
    pub max_paths: usize,

    /// Poll until the invalidation completes
    #[serde(default)]
    pub wait: bool,

    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for InvalidationConfig {
    fn default() -> Self {
        Self {
            max_paths: default_max_paths(),
            wait: false,
            wait_timeout_secs: default_wait_timeout_secs(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl InvalidationConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

fn default_max_paths() -> usize {
    DEFAULT_MAX_INVALIDATION_PATHS
}

fn default_wait_timeout_secs() -> u64 {
    600
}

fn default_poll_interval_secs() -> u64 {
    10
}

/// Which backend the ports talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Simulated cloud persisted in a local directory
    #[default]
    Local,
    /// S3 and CloudFront (requires the `aws` feature)
    Aws,
}

impl ProviderKind {
    pub const VALID: &'static [&'static str] = &["local", "aws"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Some(ProviderKind::Local),
            "aws" => Some(ProviderKind::Aws),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Local => "local",
            ProviderKind::Aws => "aws",
        }
    }
}

/// Provider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,

    /// Where the `local` provider keeps its buckets and distributions
    #[serde(default = "default_local_dir")]
    pub local_dir: PathBuf,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            local_dir: default_local_dir(),
        }
    }
}

fn default_local_dir() -> PathBuf {
    PathBuf::from(".sitefront/cloud")
}

/// State file settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(default = "default_state_path")]
    pub path: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: default_state_path(),
        }
    }
}

fn default_state_path() -> PathBuf {
    PathBuf::from(crate::infrastructure::DEFAULT_STATE_PATH)
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub bucket: BucketConfig,

    #[serde(default)]
    pub distribution: DistributionConfig,

    #[serde(default)]
    pub invalidation: InvalidationConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub state: StateConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> SitefrontResult<Self> {
        Ok(loader::load_with_warnings(path)?.0)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys)
    pub fn load_with_warnings(path: &Path) -> SitefrontResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load from `path` when it exists, then apply environment overrides
    pub fn load_or_default(path: &Path) -> SitefrontResult<(Self, Vec<ConfigWarning>)> {
        loader::load_or_default(path)
    }

    /// Check the values a run depends on
    pub fn validate(&self, file: &Path) -> SitefrontResult<()> {
        let invalid = |message: String| SitefrontError::Config {
            file: file.to_path_buf(),
            message,
        };

        match &self.bucket.name {
            Some(name) => validate_bucket_name(name).map_err(|e| invalid(e.to_string()))?,
            None => {
                return Err(invalid(
                    "bucket.name is not set (or set SITEFRONT_BUCKET)".to_string(),
                ))
            }
        }
        if self.bucket.region.trim().is_empty() {
            return Err(invalid("bucket.region must not be empty".to_string()));
        }
        if self.invalidation.max_paths == 0 {
            return Err(invalid("invalidation.max_paths must be at least 1".to_string()));
        }
        if self.site.index_document.trim().is_empty() {
            return Err(invalid("site.index_document must not be empty".to_string()));
        }
        Ok(())
    }

    /// Settings the manifest is built from; validates first
    pub fn site_settings(&self, file: &Path) -> SitefrontResult<SiteSettings> {
        self.validate(file)?;
        let bucket = self.bucket.name.clone().unwrap_or_default();
        Ok(SiteSettings {
            index_document: self.site.index_document.clone(),
            comment: self.distribution.comment.clone(),
            price_class: self.distribution.price_class.clone(),
            cache_policy_id: self.distribution.cache_policy_id.clone(),
            viewer_protocol_policy: self.distribution.viewer_protocol_policy,
            allow_options: self.distribution.allow_options,
            html_cache_control: self.site.html_cache_control.clone(),
            asset_cache_control: self.site.asset_cache_control.clone(),
            max_invalidation_paths: self.invalidation.max_paths,
            ..SiteSettings::new(bucket, self.bucket.region.clone())
        })
    }

    /// Resolve a configured path against the directory holding the config file
    pub fn resolve(root: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        }
    }
}

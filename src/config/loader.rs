//! Configuration loading

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{SitefrontError, SitefrontResult};

use super::env_validator::{nearest_match, EnvChoice};
use super::types::{Config, ProviderKind};

pub use crate::domain::value_objects::ConfigWarning;

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> SitefrontResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| SitefrontError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .iter()
        .map(|ignored| {
            let warning = ConfigWarning::unknown_key(path, &content, ignored);
            let suggestion = nearest_match(&warning.key, KNOWN_KEYS);
            warning.with_suggestion(suggestion)
        })
        .collect();

    Ok((config, warnings))
}

/// Load `path` if present (defaults otherwise) and apply `SITEFRONT_*` overrides
pub fn load_or_default(path: &Path) -> SitefrontResult<(Config, Vec<ConfigWarning>)> {
    let (config, warnings) = if path.exists() {
        load_with_warnings(path)?
    } else {
        (Config::default(), Vec::new())
    };
    Ok((with_env_overrides(config), warnings))
}

/// Apply environment variable overrides (SITEFRONT_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    apply_env(config, |key| std::env::var(key).ok(), &mut std::io::stderr())
}

pub(crate) fn apply_env<W: Write>(
    mut config: Config,
    get_env: impl Fn(&str) -> Option<String>,
    warnings: &mut W,
) -> Config {
    if let Some(bucket) = get_env("SITEFRONT_BUCKET").filter(|v| !v.is_empty()) {
        config.bucket.name = Some(bucket);
    }

    if let Some(region) = get_env("SITEFRONT_REGION").filter(|v| !v.is_empty()) {
        config.bucket.region = region;
    }

    if let Some(provider) = get_env("SITEFRONT_PROVIDER") {
        config.provider.kind = EnvChoice::new("SITEFRONT_PROVIDER", ProviderKind::VALID)
            .resolve(&provider, ProviderKind::parse, config.provider.kind, warnings);
    }

    if let Some(source) = get_env("SITEFRONT_SOURCE").filter(|v| !v.is_empty()) {
        config.site.source = PathBuf::from(source);
    }

    config
}

/// Commented starting point written by `sitefront init`
pub fn template(bucket: Option<&str>) -> String {
    let bucket_line = match bucket {
        Some(name) => format!("name = \"{name}\""),
        None => "# name = \"my-site-bucket\"".to_string(),
    };
    format!(
        r#"# Sitefront configuration

[site]
# Directory holding the built site
source = "public"
index_document = "index.html"
# html_cache_control = "no-cache"
# asset_cache_control = "public, max-age=31536000, immutable"

[bucket]
{bucket_line}
region = "us-east-1"

[distribution]
price_class = "PriceClass_100"
viewer_protocol_policy = "redirect-to-https"
# comment = "sitefront:my-site-bucket"

[invalidation]
# Above this many paths a single "/*" is sent instead
max_paths = 15
# Poll until the invalidation completes
wait = false

[provider]
# "local" keeps a simulated cloud under local_dir; "aws" needs the aws feature
kind = "local"
local_dir = ".sitefront/cloud"

[state]
path = ".sitefront/state.toml"
"#
    )
}

/// Every key and table name `site.toml` understands
const KNOWN_KEYS: &[&str] = &[
    "site",
    "source",
    "index_document",
    "html_cache_control",
    "asset_cache_control",
    "bucket",
    "name",
    "region",
    "distribution",
    "comment",
    "price_class",
    "cache_policy_id",
    "viewer_protocol_policy",
    "allow_options",
    "invalidation",
    "max_paths",
    "wait",
    "wait_timeout_secs",
    "poll_interval_secs",
    "provider",
    "kind",
    "local_dir",
    "state",
    "path",
];

use std::path::Path;

use anyhow::{bail, Result};

use sitefront::domain::entities::PolicyDocument;
use sitefront::domain::ports::StateRepository;
use sitefront::infrastructure::TomlStateRepository;

use super::SiteContext;

pub fn cmd_policy(config_path: &Path, json: bool) -> Result<()> {
    let site = SiteContext::load(config_path, json)?;
    let settings = site.config.site_settings(&site.config_path)?;
    let state = TomlStateRepository::new()
        .load(&site.state_path())
        .map_err(sitefront::SitefrontError::from)?;

    let Some(distribution) = state.distribution() else {
        bail!(
            "no distribution recorded for bucket '{}'; run `sitefront converge` first",
            settings.bucket
        );
    };
    let document = PolicyDocument::cdn_read_only(&settings.bucket, &distribution.arn)
        .map_err(sitefront::SitefrontError::from)?;

    if json {
        crate::ui::json::emit(serde_json::json!({
            "event": "policy",
            "command": "policy",
            "bucket": settings.bucket,
            "distribution_arn": distribution.arn,
            "policy": document,
        }))?;
        return Ok(());
    }

    println!("{}", document.to_json());
    Ok(())
}

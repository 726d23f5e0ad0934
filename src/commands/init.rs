//! Init command - write a starter site.toml

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use sitefront::config::template;
use sitefront::domain::entities::policy::validate_bucket_name;

use crate::ui::primitives::icon::Icon;
use crate::ui::terminal::detect_capabilities;

pub fn cmd_init(config_path: &Path, bucket: Option<&str>, force: bool, json: bool) -> Result<()> {
    if let Some(bucket) = bucket {
        validate_bucket_name(bucket).map_err(sitefront::SitefrontError::from)?;
    }
    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    fs::write(config_path, template(bucket))
        .with_context(|| format!("writing {}", config_path.display()))?;

    if json {
        crate::ui::json::emit(serde_json::json!({
            "event": "init",
            "command": "init",
            "path": config_path.display().to_string(),
        }))?;
        return Ok(());
    }

    let caps = detect_capabilities();
    println!(
        "{} Created {}",
        Icon::Success.colored(caps.supports_color, caps.supports_unicode),
        config_path.display()
    );
    if bucket.is_none() {
        println!("  Set [bucket] name, then run `sitefront plan`.");
    } else {
        println!("  Run `sitefront plan` to preview the first converge.");
    }
    Ok(())
}

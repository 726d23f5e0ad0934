//! Command handlers for the CLI

pub mod converge;
pub mod init;
pub mod plan;
pub mod policy;
pub mod status;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use sitefront::config::Config;
use sitefront::ConvergeOptions;

use crate::ui::output::print_config_warnings;
use crate::ui::terminal::{detect_capabilities, TerminalCapabilities};

/// Configuration loaded for one command, with paths anchored at its directory
pub struct SiteContext {
    pub config: Config,
    pub config_path: PathBuf,
    pub root: PathBuf,
    pub caps: TerminalCapabilities,
}

impl SiteContext {
    pub fn load(config_path: &Path, json: bool) -> Result<Self> {
        let (config, warnings) = Config::load_or_default(config_path)?;
        let caps = detect_capabilities();
        if !json {
            print_config_warnings(&warnings, caps.supports_unicode);
        }

        let root = match config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        debug!(config = %config_path.display(), root = %root.display(), "configuration loaded");

        Ok(Self {
            config,
            config_path: config_path.to_path_buf(),
            root,
            caps,
        })
    }

    pub fn state_path(&self) -> PathBuf {
        Config::resolve(&self.root, &self.config.state.path)
    }

    pub fn converge_options(&self, dry_run: bool, wait: bool) -> Result<ConvergeOptions> {
        let settings = self.config.site_settings(&self.config_path)?;
        let invalidation = &self.config.invalidation;
        Ok(ConvergeOptions::new(
            Config::resolve(&self.root, &self.config.site.source),
            self.state_path(),
            settings,
        )
        .with_dry_run(dry_run)
        .with_wait(wait || invalidation.wait)
        .with_wait_timeout(invalidation.wait_timeout())
        .with_poll_interval(invalidation.poll_interval()))
    }
}

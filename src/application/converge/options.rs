//! Converge Options
//!
//! Configuration types for convergence runs.

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::entities::SiteSettings;

/// Default time to wait for an invalidation to complete
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(600);
/// Default interval between invalidation status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Options for the converge use case
#[derive(Debug, Clone)]
pub struct ConvergeOptions {
    /// Local asset directory
    pub source: PathBuf,
    /// Convergence state file
    pub state_path: PathBuf,
    /// Resolved site settings the manifest is built from
    pub settings: SiteSettings,
    /// Compute the plan without mutating anything
    pub dry_run: bool,
    /// Poll the invalidation until it completes
    pub wait: bool,
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
}

impl ConvergeOptions {
    pub fn new(
        source: impl Into<PathBuf>,
        state_path: impl Into<PathBuf>,
        settings: SiteSettings,
    ) -> Self {
        Self {
            source: source.into(),
            state_path: state_path.into(),
            settings,
            dry_run: false,
            wait: false,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::path::Path;

use tracing::debug;

use crate::application::ConvergeUseCase;
use crate::config::{Config, ProviderKind};
use crate::domain::ports::{DeliveryNetwork, ObjectStore};
use crate::error::SitefrontResult;
#[cfg(feature = "aws")]
use crate::infrastructure::AwsCloud;
use crate::infrastructure::{FsAssetSource, SimulatedCloud, TomlStateRepository};

/// Converge use case over the local site directory and TOML state
pub type SiteConvergeUseCase<OS, DN> =
    ConvergeUseCase<FsAssetSource, OS, DN, TomlStateRepository>;

/// Backend selected by `[provider] kind`
pub enum Provider {
    Local(SimulatedCloud),
    #[cfg(feature = "aws")]
    Aws(AwsCloud),
}

impl Provider {
    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::Local(_) => ProviderKind::Local,
            #[cfg(feature = "aws")]
            Provider::Aws(_) => ProviderKind::Aws,
        }
    }
}

/// Open the configured provider; relative paths resolve against `root`
pub fn open_provider(config: &Config, root: &Path) -> SitefrontResult<Provider> {
    match config.provider.kind {
        ProviderKind::Local => {
            let dir = Config::resolve(root, &config.provider.local_dir);
            debug!(dir = %dir.display(), "opening local provider");
            Ok(Provider::Local(SimulatedCloud::open(dir)?))
        }
        #[cfg(feature = "aws")]
        ProviderKind::Aws => {
            debug!(region = %config.bucket.region, "connecting to AWS");
            Ok(Provider::Aws(AwsCloud::connect(&config.bucket.region)?))
        }
        #[cfg(not(feature = "aws"))]
        ProviderKind::Aws => Err(crate::error::SitefrontError::Config {
            file: root.join(crate::config::CONFIG_FILE),
            message: "provider 'aws' requires a build with the `aws` feature".to_string(),
        }),
    }
}

/// Create a converge use case with all dependencies wired up
pub fn create_converge_use_case<OS, DN>(store: OS, network: DN) -> SiteConvergeUseCase<OS, DN>
where
    OS: ObjectStore,
    DN: DeliveryNetwork,
{
    ConvergeUseCase::new(
        FsAssetSource::new(),
        store,
        network,
        TomlStateRepository::new(),
    )
}

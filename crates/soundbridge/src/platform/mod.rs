//! Platform registry.
//!
//! A platform turns one configured device into accessories and publishes them
//! to the host. Platforms register a factory in `REGISTRY`; the binary walks
//! it with the loaded configuration.

use async_trait::async_trait;
use linkme::distributed_slice;

use crate::config::Config;
use crate::hap::AccessoryHost;

/// Result type for platform factory functions
///
/// `Ok(None)` means the platform is not configured and should be skipped.
pub type PlatformFactoryResult = anyhow::Result<Option<Box<dyn Platform>>>;

pub struct PlatformContext<'a> {
    pub config: &'a Config,
}

#[distributed_slice]
pub static REGISTRY: [fn(&PlatformContext) -> PlatformFactoryResult];

/// Platform trait that all platforms must implement
#[async_trait]
pub trait Platform: Send + Sync {
    /// Get the name/identifier of this platform
    fn name(&self) -> &str;

    /// Build the platform's accessories and publish them to the host.
    async fn setup(&self, host: &dyn AccessoryHost) -> anyhow::Result<()>;
}

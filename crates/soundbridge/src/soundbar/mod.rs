//! Vizio SmartCast soundbar platform.

mod config;
mod inputs;
#[allow(clippy::module_inception)]
mod soundbar;

use std::sync::Arc;

pub use config::SoundbarConfig;
pub use inputs::InputTable;
use linkme::distributed_slice;
pub use soundbar::PLATFORM_NAME;
pub use soundbar::PLUGIN_NAME;
pub use soundbar::SPEAKER_SUBTYPE;
pub use soundbar::SoundbarControls;
pub use soundbar::SoundbarPlatform;
pub use soundbar::TELEVISION_SUBTYPE;
use tracing::info;

use crate::device::SmartCastClient;
use crate::platform;

#[distributed_slice(platform::REGISTRY)]
fn init_soundbar(ctx: &platform::PlatformContext) -> platform::PlatformFactoryResult {
    let soundbar_config = if let Some(c) = &ctx.config.soundbar {
        c
    } else {
        return Ok(None);
    };

    info!("Initializing soundbar platform for {}", soundbar_config.ip);
    let client = SmartCastClient::new(soundbar_config);
    Ok(Some(Box::new(SoundbarPlatform::new(
        soundbar_config.clone(),
        Arc::new(client),
    ))))
}

pub mod api;
pub mod config;
pub mod device;
pub mod hap;
pub mod platform;
#[cfg(feature = "platform_soundbar")]
pub mod soundbar;

pub use config::Config;
pub use config::ConfigError;
pub use config::LogLevel;
pub use hap::Accessory;
pub use hap::AccessoryHost;
pub use hap::AccessoryStore;
pub use platform::Platform;
pub use platform::PlatformContext;

//! Device control for the soundbar.
//!
//! `SoundbarDevice` is the capability set the platform needs from the vendor
//! API. `SmartCastClient` implements it on top of the `smartcast` crate.

#[cfg(test)]
mod mock;
#[cfg(feature = "platform_soundbar")]
mod client;

use async_trait::async_trait;

#[cfg(test)]
pub use mock::DeviceCall;
#[cfg(test)]
pub use mock::MockSoundbar;
#[cfg(feature = "platform_soundbar")]
pub use client::SmartCastClient;

/// Errors returned by device operations.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[cfg(feature = "platform_soundbar")]
    #[error("SmartCast request failed: {0}")]
    SmartCast(smartcast::Error),

    #[error("Unexpected value for {setting}: {reason}")]
    UnexpectedResponse { setting: String, reason: String },
}

#[cfg(feature = "platform_soundbar")]
impl From<smartcast::Error> for DeviceError {
    fn from(err: smartcast::Error) -> Self {
        DeviceError::SmartCast(err)
    }
}

/// Remote-control operations of the soundbar.
///
/// Every call is a live round trip to the device. Commands resolve once the
/// device has accepted them; nothing is read back.
#[async_trait]
pub trait SoundbarDevice: Send + Sync {
    /// Names of the device's inputs, in device order.
    async fn list_inputs(&self) -> Result<Vec<String>, DeviceError>;

    /// Switch to the input with the given name.
    async fn set_input(&self, name: &str) -> Result<(), DeviceError>;

    /// Current volume as reported by the device.
    async fn get_volume(&self) -> Result<i64, DeviceError>;

    async fn set_volume(&self, level: u8) -> Result<(), DeviceError>;

    /// Raw mute setting, e.g. "On" or "Off".
    async fn get_mute_state(&self) -> Result<String, DeviceError>;

    async fn mute(&self) -> Result<(), DeviceError>;

    async fn unmute(&self) -> Result<(), DeviceError>;

    async fn volume_up(&self) -> Result<(), DeviceError>;

    async fn volume_down(&self) -> Result<(), DeviceError>;

    /// Raw power mode; 1 means on.
    async fn current_power_mode(&self) -> Result<i64, DeviceError>;

    async fn power_on(&self) -> Result<(), DeviceError>;

    async fn power_off(&self) -> Result<(), DeviceError>;
}

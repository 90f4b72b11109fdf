use async_trait::async_trait;
use serde_json::Value;
use smartcast::Button;
use smartcast::Device;
use smartcast::SubSetting;
use tokio::sync::OnceCell;
use tracing::debug;
use tracing::info;

use super::DeviceError;
use super::SoundbarDevice;
use crate::soundbar::SoundbarConfig;

const AUDIO_MENU: &str = "audio";
const VOLUME_SETTING: &str = "volume";
const MUTE_SETTING: &str = "mute";

/// Power mode reported for a device that is on
const POWER_MODE_ON: i64 = 1;
const POWER_MODE_OFF: i64 = 0;

/// `SoundbarDevice` backed by the `smartcast` crate.
///
/// The device handle is resolved on first use, so creating a client performs
/// no network traffic; an unreachable device only shows up on the first call
/// and is retried on the next one.
pub struct SmartCastClient {
    ip: String,
    device: OnceCell<Device>,
}

impl SmartCastClient {
    pub fn new(config: &SoundbarConfig) -> Self {
        Self {
            ip: config.ip.clone(),
            device: OnceCell::new(),
        }
    }

    async fn device(&self) -> Result<&Device, DeviceError> {
        self.device
            .get_or_try_init(|| async {
                info!("Connecting to SmartCast device at {}", self.ip);
                Device::from_ip(self.ip.as_str()).await
            })
            .await
            .map_err(DeviceError::from)
    }

    /// Look up a setting under the audio menu.
    async fn audio_setting(&self, name: &str) -> Result<SubSetting, DeviceError> {
        let device = self.device().await?;
        let audio = find_setting(device.settings().await?, AUDIO_MENU)?;
        find_setting(audio.expand().await?, name)
    }

    async fn press(&self, button: Button) -> Result<(), DeviceError> {
        debug!("SmartCast key press: {:?}", button);
        self.device()
            .await?
            .key_press(button)
            .await?;
        Ok(())
    }
}

fn find_setting(settings: Vec<SubSetting>, name: &str) -> Result<SubSetting, DeviceError> {
    settings
        .into_iter()
        .find(|s| s.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| DeviceError::UnexpectedResponse {
            setting: name.to_string(),
            reason: "setting not found".to_string(),
        })
}

/// Setting value as an integer. Fractional numbers are rounded.
fn number_value(setting: &str, value: Option<Value>) -> Result<i64, DeviceError> {
    let number = match &value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
        _ => None,
    };
    number.ok_or_else(|| DeviceError::UnexpectedResponse {
        setting: setting.to_string(),
        reason: format!("expected a number, got {:?}", value),
    })
}

fn string_value(setting: &str, value: Option<Value>) -> Result<String, DeviceError> {
    match value {
        Some(Value::String(s)) => Ok(s),
        other => Err(DeviceError::UnexpectedResponse {
            setting: setting.to_string(),
            reason: format!("expected a string, got {:?}", other),
        }),
    }
}

fn power_mode(powered_on: bool) -> i64 {
    if powered_on {
        POWER_MODE_ON
    } else {
        POWER_MODE_OFF
    }
}

#[async_trait]
impl SoundbarDevice for SmartCastClient {
    async fn list_inputs(&self) -> Result<Vec<String>, DeviceError> {
        let inputs = self.device().await?.list_inputs().await?;
        Ok(inputs.iter().map(|input| input.name().to_string()).collect())
    }

    async fn set_input(&self, name: &str) -> Result<(), DeviceError> {
        self.device().await?.change_input(name).await?;
        Ok(())
    }

    async fn get_volume(&self) -> Result<i64, DeviceError> {
        let setting = self.audio_setting(VOLUME_SETTING).await?;
        number_value(VOLUME_SETTING, setting.value::<Value>())
    }

    async fn set_volume(&self, level: u8) -> Result<(), DeviceError> {
        let setting = self.audio_setting(VOLUME_SETTING).await?;
        setting.update(level).await?;
        Ok(())
    }

    async fn get_mute_state(&self) -> Result<String, DeviceError> {
        let setting = self.audio_setting(MUTE_SETTING).await?;
        string_value(MUTE_SETTING, setting.value::<Value>())
    }

    async fn mute(&self) -> Result<(), DeviceError> {
        self.press(Button::MuteOn).await
    }

    async fn unmute(&self) -> Result<(), DeviceError> {
        self.press(Button::MuteOff).await
    }

    async fn volume_up(&self) -> Result<(), DeviceError> {
        self.press(Button::VolumeUp).await
    }

    async fn volume_down(&self) -> Result<(), DeviceError> {
        self.press(Button::VolumeDown).await
    }

    async fn current_power_mode(&self) -> Result<i64, DeviceError> {
        let powered_on = self.device().await?.is_powered_on().await?;
        Ok(power_mode(powered_on))
    }

    async fn power_on(&self) -> Result<(), DeviceError> {
        self.press(Button::PowerOn).await
    }

    async fn power_off(&self) -> Result<(), DeviceError> {
        self.press(Button::PowerOff).await
    }
}

use std::sync::Mutex;

use async_trait::async_trait;

use super::DeviceError;
use super::SoundbarDevice;

/// A call recorded by `MockSoundbar`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    ListInputs,
    SetInput(String),
    GetVolume,
    SetVolume(u8),
    GetMuteState,
    Mute,
    Unmute,
    VolumeUp,
    VolumeDown,
    CurrentPowerMode,
    PowerOn,
    PowerOff,
}

/// Mock soundbar for testing
///
/// Records every call and answers queries from its fields. With `offline`
/// set, every call is still recorded but fails.
#[derive(Debug, Default)]
pub struct MockSoundbar {
    inputs: Vec<String>,
    volume: i64,
    mute_state: String,
    power_mode: i64,
    offline: bool,
    calls: Mutex<Vec<DeviceCall>>,
}

impl MockSoundbar {
    pub fn new() -> Self {
        Self {
            mute_state: "Off".to_string(),
            ..Self::default()
        }
    }

    pub fn with_inputs(inputs: &[&str]) -> Self {
        Self {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            ..Self::new()
        }
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::new()
        }
    }

    pub fn with_volume(mut self, volume: i64) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_mute_state(mut self, state: &str) -> Self {
        self.mute_state = state.to_string();
        self
    }

    pub fn with_power_mode(mut self, mode: i64) -> Self {
        self.power_mode = mode;
        self
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: DeviceCall) -> Result<(), DeviceError> {
        self.calls.lock().unwrap().push(call);
        if self.offline {
            return Err(DeviceError::UnexpectedResponse {
                setting: "mock".to_string(),
                reason: "device offline".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SoundbarDevice for MockSoundbar {
    async fn list_inputs(&self) -> Result<Vec<String>, DeviceError> {
        self.record(DeviceCall::ListInputs)?;
        Ok(self.inputs.clone())
    }

    async fn set_input(&self, name: &str) -> Result<(), DeviceError> {
        self.record(DeviceCall::SetInput(name.to_string()))
    }

    async fn get_volume(&self) -> Result<i64, DeviceError> {
        self.record(DeviceCall::GetVolume)?;
        Ok(self.volume)
    }

    async fn set_volume(&self, level: u8) -> Result<(), DeviceError> {
        self.record(DeviceCall::SetVolume(level))
    }

    async fn get_mute_state(&self) -> Result<String, DeviceError> {
        self.record(DeviceCall::GetMuteState)?;
        Ok(self.mute_state.clone())
    }

    async fn mute(&self) -> Result<(), DeviceError> {
        self.record(DeviceCall::Mute)
    }

    async fn unmute(&self) -> Result<(), DeviceError> {
        self.record(DeviceCall::Unmute)
    }

    async fn volume_up(&self) -> Result<(), DeviceError> {
        self.record(DeviceCall::VolumeUp)
    }

    async fn volume_down(&self) -> Result<(), DeviceError> {
        self.record(DeviceCall::VolumeDown)
    }

    async fn current_power_mode(&self) -> Result<i64, DeviceError> {
        self.record(DeviceCall::CurrentPowerMode)?;
        Ok(self.power_mode)
    }

    async fn power_on(&self) -> Result<(), DeviceError> {
        self.record(DeviceCall::PowerOn)
    }

    async fn power_off(&self) -> Result<(), DeviceError> {
        self.record(DeviceCall::PowerOff)
    }
}

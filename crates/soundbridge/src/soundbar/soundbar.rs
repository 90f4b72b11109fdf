use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use async_trait::async_trait;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::inputs::InputTable;
use super::SoundbarConfig;
use crate::device::DeviceError;
use crate::device::SoundbarDevice;
use crate::hap::values;
use crate::hap::Accessory;
use crate::hap::AccessoryHost;
use crate::hap::CharacteristicHandler;
use crate::hap::CharacteristicType;
use crate::hap::CharacteristicValue;
use crate::hap::HapError;
use crate::hap::Service;
use crate::hap::ServiceType;
use crate::hap::generate_uuid;
use crate::platform::Platform;

pub const PLUGIN_NAME: &str = "homebridge-vizio-soundbar";
pub const PLATFORM_NAME: &str = "VizioSoundbar";

pub const TELEVISION_SUBTYPE: &str = "televisionService";
pub const SPEAKER_SUBTYPE: &str = "speakerService";

const ACCESSORY_NAME: &str = "Vizio Soundbar";
const UUID_PREFIX: &str = "homebridge:vizio-soundbar:accessory:";

/// Mute state value meaning "muted"; compared exactly
const MUTE_ON: &str = "On";

/// Power mode value meaning "on"
const POWER_MODE_ON: i64 = 1;

/// Soundbar platform
///
/// Exposes one television accessory with a linked speaker service and one
/// input source per device input.
pub struct SoundbarPlatform<D: SoundbarDevice + 'static> {
    config: SoundbarConfig,
    controls: Arc<SoundbarControls<D>>,
}

impl<D: SoundbarDevice + 'static> SoundbarPlatform<D> {
    /// Create a new soundbar platform. No device traffic happens here.
    pub fn new(config: SoundbarConfig, device: Arc<D>) -> Self {
        debug!("Finished initializing platform: {}", config.name);
        Self {
            config,
            controls: Arc::new(SoundbarControls::new(device)),
        }
    }

    pub fn controls(&self) -> &Arc<SoundbarControls<D>> {
        &self.controls
    }

    /// Build the accessory with all of its services and event bindings.
    ///
    /// Fetches the input list from the device. If that fails the accessory
    /// is still built, without input sources.
    pub async fn build_accessory(&self) -> Accessory {
        let uuid = generate_uuid(&format!("{}{}", UUID_PREFIX, self.config.name));
        let mut accessory = Accessory::new(ACCESSORY_NAME, uuid);
        accessory
            .information_mut()
            .set_characteristic(CharacteristicType::Manufacturer, "Vizio")
            .set_characteristic(CharacteristicType::Model, "Soundbar");

        let handler: Arc<dyn CharacteristicHandler> = self.controls.clone();

        let mut television = self.prepare_television_service(&handler);
        let speaker = self.prepare_speaker_service(&handler);
        television.add_linked_service(&speaker);

        let inputs = self.prepare_input_services().await;
        for input in &inputs {
            television.add_linked_service(input);
        }

        accessory.add_service(television);
        accessory.add_service(speaker);
        for input in inputs {
            accessory.add_service(input);
        }
        accessory
    }

    fn prepare_television_service(&self, handler: &Arc<dyn CharacteristicHandler>) -> Service {
        debug!("prepareTelevisionService");
        let mut service = Service::new(
            ServiceType::Television,
            self.config.name.clone(),
            Some(TELEVISION_SUBTYPE),
        );
        service
            .set_characteristic(CharacteristicType::ConfiguredName, self.config.name.clone())
            .set_characteristic(
                CharacteristicType::SleepDiscoveryMode,
                values::ALWAYS_DISCOVERABLE,
            )
            .on_get(CharacteristicType::Active)
            .on_set(CharacteristicType::Active)
            .on_get(CharacteristicType::ActiveIdentifier)
            .on_set(CharacteristicType::ActiveIdentifier)
            .on_set(CharacteristicType::RemoteKey)
            .bind(handler.clone());
        service
    }

    fn prepare_speaker_service(&self, handler: &Arc<dyn CharacteristicHandler>) -> Service {
        debug!("prepareSpeakerService");
        let mut service = Service::new(
            ServiceType::TelevisionSpeaker,
            format!("{} Speaker", self.config.name),
            Some(SPEAKER_SUBTYPE),
        );
        service
            .set_characteristic(CharacteristicType::Active, values::ACTIVE)
            .set_characteristic(
                CharacteristicType::VolumeControlType,
                values::VOLUME_CONTROL_ABSOLUTE,
            )
            .on_set(CharacteristicType::VolumeSelector)
            .on_get(CharacteristicType::Volume)
            .on_set(CharacteristicType::Volume)
            .on_get(CharacteristicType::Mute)
            .on_set(CharacteristicType::Mute)
            .bind(handler.clone());
        service
    }

    async fn prepare_input_services(&self) -> Vec<Service> {
        debug!("prepareInputsService");
        let names = match self.controls.device.list_inputs().await {
            Ok(names) => names,
            Err(e) => {
                error!(
                    "Failed to fetch inputs from soundbar at {}: {}",
                    self.config.ip, e
                );
                return Vec::new();
            }
        };

        let table = InputTable::from_names(names);
        let services = table
            .iter()
            .map(|(id, name)| {
                debug!("Found {}", name);
                let subtype = format!("input{}", id);
                let mut service = Service::new(ServiceType::InputSource, name, Some(subtype.as_str()));
                service
                    .set_characteristic(CharacteristicType::Identifier, id)
                    .set_characteristic(CharacteristicType::ConfiguredName, name)
                    .set_characteristic(CharacteristicType::IsConfigured, values::CONFIGURED)
                    .set_characteristic(
                        CharacteristicType::InputSourceType,
                        values::INPUT_SOURCE_HDMI,
                    )
                    .set_characteristic(
                        CharacteristicType::CurrentVisibilityState,
                        values::VISIBILITY_SHOWN,
                    );
                service
            })
            .collect();

        *self.controls.inputs() = table;
        services
    }
}

#[async_trait]
impl<D: SoundbarDevice + 'static> Platform for SoundbarPlatform<D> {
    fn name(&self) -> &str {
        PLATFORM_NAME
    }

    async fn setup(&self, host: &dyn AccessoryHost) -> anyhow::Result<()> {
        info!("Setting up soundbar {} at {}", self.config.name, self.config.ip);
        let accessory = self.build_accessory().await;
        host.publish_external_accessories(PLUGIN_NAME, vec![accessory]);
        Ok(())
    }
}

/// Translates characteristic events into device calls.
///
/// Writes always succeed from the host's point of view: device failures are
/// logged and dropped. Reads that cannot reach the device fail with
/// `HapError::CommunicationFailure`.
pub struct SoundbarControls<D: SoundbarDevice> {
    device: Arc<D>,
    inputs: Mutex<InputTable>,
}

impl<D: SoundbarDevice> SoundbarControls<D> {
    pub fn new(device: Arc<D>) -> Self {
        Self {
            device,
            inputs: Mutex::new(InputTable::default()),
        }
    }

    fn inputs(&self) -> MutexGuard<'_, InputTable> {
        self.inputs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn get_power(&self) -> Result<bool, HapError> {
        let mode = self
            .device
            .current_power_mode()
            .await
            .map_err(|e| read_failure("power mode", e))?;
        Ok(mode == POWER_MODE_ON)
    }

    pub async fn set_power(&self, on: bool) {
        debug!("Setting soundbar power to {}", on);
        let result = if on {
            self.device.power_on().await
        } else {
            self.device.power_off().await
        };
        if let Err(e) = result {
            warn!("Failed to set soundbar power to {}: {}", on, e);
        }
    }

    /// Last selected input. Answered locally, never queries the device.
    pub fn get_input(&self) -> u32 {
        self.inputs().current()
    }

    pub async fn set_input(&self, id: u32) {
        let name = self.inputs().select(id);
        match name {
            Some(name) => {
                debug!("Setting soundbar input to {} ({})", name, id);
                if let Err(e) = self.device.set_input(&name).await {
                    warn!("Failed to set soundbar input to {}: {}", name, e);
                }
            }
            None => warn!("No soundbar input with identifier {}", id),
        }
    }

    pub async fn get_volume(&self) -> Result<i64, HapError> {
        let volume = self
            .device
            .get_volume()
            .await
            .map_err(|e| read_failure("volume", e))?;
        debug!("Successfully got soundbar volume: {}", volume);
        Ok(volume)
    }

    /// Forward volumes in 0..=100; anything else is dropped.
    pub async fn set_volume(&self, volume: i64) {
        debug!("Setting soundbar volume to {}", volume);
        match u8::try_from(volume) {
            Ok(level) if level <= 100 => {
                if let Err(e) = self.device.set_volume(level).await {
                    warn!("Failed to set soundbar volume to {}: {}", level, e);
                }
            }
            _ => debug!("Ignoring out-of-range volume {}", volume),
        }
    }

    pub async fn get_mute(&self) -> Result<bool, HapError> {
        let state = self
            .device
            .get_mute_state()
            .await
            .map_err(|e| read_failure("mute state", e))?;
        Ok(state == MUTE_ON)
    }

    pub async fn set_mute(&self, muted: bool) {
        debug!("Setting soundbar mute to {}", muted);
        let result = if muted {
            self.device.mute().await
        } else {
            self.device.unmute().await
        };
        if let Err(e) = result {
            warn!("Failed to set soundbar mute to {}: {}", muted, e);
        }
    }

    pub async fn set_volume_selector(&self, selector: i64) {
        let result = match selector {
            values::VOLUME_INCREMENT => self.device.volume_up().await,
            values::VOLUME_DECREMENT => self.device.volume_down().await,
            _ => return,
        };
        if let Err(e) = result {
            warn!("Failed to step soundbar volume: {}", e);
        }
    }

    pub fn set_remote_key(&self, key: i64) {
        // TODO: map remote keys to SmartCast key codes (navigation, play/pause)
        debug!("Ignoring remote key {}", key);
    }
}

fn read_failure(what: &str, e: DeviceError) -> HapError {
    warn!("Failed to read soundbar {}: {}", what, e);
    HapError::CommunicationFailure(e.to_string())
}

#[async_trait]
impl<D: SoundbarDevice> CharacteristicHandler for SoundbarControls<D> {
    async fn get(&self, kind: CharacteristicType) -> Result<CharacteristicValue, HapError> {
        match kind {
            CharacteristicType::Active => {
                let active = if self.get_power().await? {
                    values::ACTIVE
                } else {
                    values::INACTIVE
                };
                Ok(active.into())
            }
            CharacteristicType::ActiveIdentifier => Ok(self.get_input().into()),
            CharacteristicType::Volume => Ok(self.get_volume().await?.into()),
            CharacteristicType::Mute => Ok(self.get_mute().await?.into()),
            other => Err(HapError::Unsupported(other)),
        }
    }

    async fn set(
        &self,
        kind: CharacteristicType,
        value: CharacteristicValue,
    ) -> Result<(), HapError> {
        let number = value.as_int().unwrap_or_default();
        match kind {
            CharacteristicType::Active => self.set_power(value.as_bool()).await,
            CharacteristicType::ActiveIdentifier => match u32::try_from(number) {
                Ok(id) => self.set_input(id).await,
                Err(_) => warn!("Ignoring invalid input identifier {}", number),
            },
            CharacteristicType::RemoteKey => self.set_remote_key(number),
            CharacteristicType::Volume => self.set_volume(number).await,
            CharacteristicType::Mute => self.set_mute(value.as_bool()).await,
            CharacteristicType::VolumeSelector => self.set_volume_selector(number).await,
            other => return Err(HapError::Unsupported(other)),
        }
        Ok(())
    }
}

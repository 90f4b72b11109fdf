use std::sync::Mutex;
use std::sync::PoisonError;

use serde::Deserialize;
use serde::Serialize;
use strum::Display;
use strum::EnumString;
use strum::IntoStaticStr;

/// Characteristic types exposed by the accessories in this crate.
///
/// The snake_case form is used both on the wire (JSON) and in API paths.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CharacteristicType {
    Active,
    ActiveIdentifier,
    ConfiguredName,
    CurrentVisibilityState,
    Identifier,
    InputSourceType,
    IsConfigured,
    Manufacturer,
    Model,
    Mute,
    Name,
    RemoteKey,
    SleepDiscoveryMode,
    Volume,
    VolumeControlType,
    VolumeSelector,
}

/// Value format of a characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Bool,
    UInt8,
    UInt32,
    String,
}

impl CharacteristicType {
    pub fn format(self) -> Format {
        use CharacteristicType::*;
        match self {
            Mute => Format::Bool,
            ActiveIdentifier | Identifier => Format::UInt32,
            ConfiguredName | Manufacturer | Model | Name => Format::String,
            Active
            | CurrentVisibilityState
            | InputSourceType
            | IsConfigured
            | RemoteKey
            | SleepDiscoveryMode
            | Volume
            | VolumeControlType
            | VolumeSelector => Format::UInt8,
        }
    }

    /// Write-only characteristics have no readable value.
    pub fn is_write_only(self) -> bool {
        matches!(
            self,
            CharacteristicType::RemoteKey | CharacteristicType::VolumeSelector
        )
    }
}

/// Enumerated values for the uint8 characteristics.
pub mod values {
    pub const INACTIVE: u8 = 0;
    pub const ACTIVE: u8 = 1;

    pub const ALWAYS_DISCOVERABLE: u8 = 1;

    pub const VOLUME_CONTROL_ABSOLUTE: u8 = 3;

    pub const VOLUME_INCREMENT: i64 = 0;
    pub const VOLUME_DECREMENT: i64 = 1;

    pub const CONFIGURED: u8 = 1;

    pub const INPUT_SOURCE_HDMI: u8 = 3;

    pub const VISIBILITY_SHOWN: u8 = 0;
}

/// A characteristic value as carried by get/set events.
///
/// Numeric values are kept as `i64` so that out-of-range writes reach the
/// handler instead of being rejected by the format check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl CharacteristicValue {
    /// Truthiness: non-zero numbers and non-empty strings are true.
    pub fn as_bool(&self) -> bool {
        match self {
            CharacteristicValue::Bool(b) => *b,
            CharacteristicValue::Int(n) => *n != 0,
            CharacteristicValue::String(s) => !s.is_empty(),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            CharacteristicValue::Bool(b) => Some(i64::from(*b)),
            CharacteristicValue::Int(n) => Some(*n),
            CharacteristicValue::String(_) => None,
        }
    }

    /// Whether this value can be written to a characteristic of `format`.
    pub fn fits(&self, format: Format) -> bool {
        match (format, self) {
            (Format::String, CharacteristicValue::String(_)) => true,
            (Format::String, _) => false,
            (Format::Bool, CharacteristicValue::Int(n)) => *n == 0 || *n == 1,
            (_, CharacteristicValue::String(_)) => false,
            _ => true,
        }
    }
}

impl From<bool> for CharacteristicValue {
    fn from(value: bool) -> Self {
        CharacteristicValue::Bool(value)
    }
}

impl From<u8> for CharacteristicValue {
    fn from(value: u8) -> Self {
        CharacteristicValue::Int(i64::from(value))
    }
}

impl From<u32> for CharacteristicValue {
    fn from(value: u32) -> Self {
        CharacteristicValue::Int(i64::from(value))
    }
}

impl From<i64> for CharacteristicValue {
    fn from(value: i64) -> Self {
        CharacteristicValue::Int(value)
    }
}

impl From<&str> for CharacteristicValue {
    fn from(value: &str) -> Self {
        CharacteristicValue::String(value.to_string())
    }
}

impl From<String> for CharacteristicValue {
    fn from(value: String) -> Self {
        CharacteristicValue::String(value)
    }
}

/// One characteristic of a service.
///
/// A characteristic either holds a static value, or has its get and/or set
/// events bound to the owning service's handler.
#[derive(Debug)]
pub struct Characteristic {
    pub kind: CharacteristicType,
    value: Mutex<Option<CharacteristicValue>>,
    pub(crate) on_get: bool,
    pub(crate) on_set: bool,
}

impl Characteristic {
    pub fn new(kind: CharacteristicType) -> Self {
        Self {
            kind,
            value: Mutex::new(None),
            on_get: false,
            on_set: false,
        }
    }

    /// The stored value, if any. Bound characteristics usually have none.
    pub fn value(&self) -> Option<CharacteristicValue> {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn store(&self, value: CharacteristicValue) {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
    }

    pub fn has_get_event(&self) -> bool {
        self.on_get
    }

    pub fn has_set_event(&self) -> bool {
        self.on_set
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_type_round_trips_through_path_form() {
        assert_eq!(CharacteristicType::ActiveIdentifier.to_string(), "active_identifier");
        assert_eq!(
            CharacteristicType::from_str("volume_selector").unwrap(),
            CharacteristicType::VolumeSelector
        );
        assert!(CharacteristicType::from_str("brightness").is_err());
    }

    #[test]
    fn test_value_deserializes_untagged() {
        let v: CharacteristicValue = serde_json::from_str("40").unwrap();
        assert_eq!(v, CharacteristicValue::Int(40));
        let v: CharacteristicValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, CharacteristicValue::Bool(true));
        let v: CharacteristicValue = serde_json::from_str("\"HDMI-1\"").unwrap();
        assert_eq!(v, CharacteristicValue::String("HDMI-1".to_string()));
    }

    #[test]
    fn test_value_fits_format() {
        assert!(CharacteristicValue::Int(-5).fits(Format::UInt8));
        assert!(CharacteristicValue::Int(1).fits(Format::Bool));
        assert!(!CharacteristicValue::Int(2).fits(Format::Bool));
        assert!(!CharacteristicValue::from("x").fits(Format::UInt32));
        assert!(!CharacteristicValue::Bool(true).fits(Format::String));
    }

    #[test]
    fn test_truthiness() {
        assert!(CharacteristicValue::Int(1).as_bool());
        assert!(!CharacteristicValue::Int(0).as_bool());
        assert_eq!(CharacteristicValue::Bool(true).as_int(), Some(1));
    }
}

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use strum::Display;
use strum::IntoStaticStr;

use super::characteristic::Characteristic;
use super::characteristic::CharacteristicType;
use super::characteristic::CharacteristicValue;
use super::error::HapError;
use super::handler::CharacteristicHandler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    AccessoryInformation,
    Television,
    TelevisionSpeaker,
    InputSource,
}

/// A named group of characteristics within an accessory.
///
/// Services are addressed by their subtype, or by their type name when they
/// have none (the accessory information service).
pub struct Service {
    pub kind: ServiceType,
    pub name: String,
    pub subtype: Option<String>,
    characteristics: Vec<Characteristic>,
    linked: Vec<String>,
    handler: Option<Arc<dyn CharacteristicHandler>>,
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("subtype", &self.subtype)
            .field("characteristics", &self.characteristics)
            .field("linked", &self.linked)
            .field("handler", &self.handler.as_ref().map(|_| "<handler>"))
            .finish()
    }
}

impl Service {
    pub fn new(kind: ServiceType, name: impl Into<String>, subtype: Option<&str>) -> Self {
        let name = name.into();
        let mut service = Self {
            kind,
            name: name.clone(),
            subtype: subtype.map(str::to_string),
            characteristics: Vec::new(),
            linked: Vec::new(),
            handler: None,
        };
        service.set_characteristic(CharacteristicType::Name, name);
        service
    }

    /// Address of this service within its accessory.
    pub fn key(&self) -> &str {
        match &self.subtype {
            Some(subtype) => subtype.as_str(),
            None => self.kind.into(),
        }
    }

    /// Get the characteristic of the given type, creating it if needed.
    pub fn characteristic_mut(&mut self, kind: CharacteristicType) -> &mut Characteristic {
        let index = match self.characteristics.iter().position(|c| c.kind == kind) {
            Some(index) => index,
            None => {
                self.characteristics.push(Characteristic::new(kind));
                self.characteristics.len() - 1
            }
        };
        &mut self.characteristics[index]
    }

    pub fn characteristic(&self, kind: CharacteristicType) -> Option<&Characteristic> {
        self.characteristics.iter().find(|c| c.kind == kind)
    }

    pub fn characteristics(&self) -> impl Iterator<Item = &Characteristic> {
        self.characteristics.iter()
    }

    /// Set a static characteristic value.
    pub fn set_characteristic(
        &mut self,
        kind: CharacteristicType,
        value: impl Into<CharacteristicValue>,
    ) -> &mut Self {
        self.characteristic_mut(kind).store(value.into());
        self
    }

    /// Route get events for `kind` to the bound handler.
    pub fn on_get(&mut self, kind: CharacteristicType) -> &mut Self {
        self.characteristic_mut(kind).on_get = true;
        self
    }

    /// Route set events for `kind` to the bound handler.
    pub fn on_set(&mut self, kind: CharacteristicType) -> &mut Self {
        self.characteristic_mut(kind).on_set = true;
        self
    }

    pub fn bind(&mut self, handler: Arc<dyn CharacteristicHandler>) -> &mut Self {
        self.handler = Some(handler);
        self
    }

    pub fn add_linked_service(&mut self, other: &Service) {
        let key = other.key().to_string();
        if !self.linked.contains(&key) {
            self.linked.push(key);
        }
    }

    pub fn linked_services(&self) -> &[String] {
        &self.linked
    }

    fn find(&self, kind: CharacteristicType) -> Result<&Characteristic, HapError> {
        self.characteristic(kind)
            .ok_or_else(|| HapError::CharacteristicNotFound {
                service: self.key().to_string(),
                kind,
            })
    }

    pub(crate) async fn read(
        &self,
        kind: CharacteristicType,
    ) -> Result<CharacteristicValue, HapError> {
        let characteristic = self.find(kind)?;
        if kind.is_write_only() {
            return Err(HapError::WriteOnly(kind));
        }

        match (&self.handler, characteristic.on_get) {
            (Some(handler), true) => handler.get(kind).await,
            _ => characteristic
                .value()
                .ok_or_else(|| HapError::CharacteristicNotFound {
                    service: self.key().to_string(),
                    kind,
                }),
        }
    }

    pub(crate) async fn write(
        &self,
        kind: CharacteristicType,
        value: CharacteristicValue,
    ) -> Result<(), HapError> {
        let characteristic = self.find(kind)?;
        if !value.fits(kind.format()) {
            return Err(HapError::InvalidValue(kind));
        }

        match (&self.handler, characteristic.on_set) {
            (Some(handler), true) => handler.set(kind, value).await,
            _ => {
                characteristic.store(value);
                Ok(())
            }
        }
    }
}

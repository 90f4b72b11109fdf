use serde::Serialize;
use uuid::Uuid;

use super::characteristic::CharacteristicType;
use super::characteristic::CharacteristicValue;
use super::error::HapError;
use super::service::Service;
use super::service::ServiceType;

/// An accessory published to the host.
///
/// Always carries an accessory information service; platforms add the rest.
#[derive(Debug)]
pub struct Accessory {
    pub display_name: String,
    pub uuid: Uuid,
    services: Vec<Service>,
}

impl Accessory {
    pub fn new(display_name: impl Into<String>, uuid: Uuid) -> Self {
        let display_name = display_name.into();
        let information = Service::new(ServiceType::AccessoryInformation, display_name.clone(), None);
        Self {
            display_name,
            uuid,
            services: vec![information],
        }
    }

    pub fn information_mut(&mut self) -> &mut Service {
        // Inserted by `new` and never removed
        &mut self.services[0]
    }

    pub fn add_service(&mut self, service: Service) {
        self.services.push(service);
    }

    pub fn service(&self, key: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.key() == key)
    }

    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.services.iter()
    }

    /// Dispatch a host read of one characteristic.
    pub async fn read(
        &self,
        service: &str,
        kind: CharacteristicType,
    ) -> Result<CharacteristicValue, HapError> {
        self.find(service)?.read(kind).await
    }

    /// Dispatch a host write of one characteristic.
    pub async fn write(
        &self,
        service: &str,
        kind: CharacteristicType,
        value: CharacteristicValue,
    ) -> Result<(), HapError> {
        self.find(service)?.write(kind, value).await
    }

    fn find(&self, key: &str) -> Result<&Service, HapError> {
        self.service(key)
            .ok_or_else(|| HapError::ServiceNotFound(key.to_string()))
    }

    /// Static view of the accessory. Bound characteristics are listed without
    /// a value; no device calls are made.
    pub fn snapshot(&self) -> AccessorySnapshot {
        AccessorySnapshot {
            uuid: self.uuid,
            display_name: self.display_name.clone(),
            services: self
                .services
                .iter()
                .map(|service| ServiceSnapshot {
                    kind: service.kind,
                    key: service.key().to_string(),
                    name: service.name.clone(),
                    linked: service.linked_services().to_vec(),
                    characteristics: service
                        .characteristics()
                        .map(|c| CharacteristicSnapshot {
                            kind: c.kind,
                            value: c.value(),
                            get_event: c.has_get_event(),
                            set_event: c.has_set_event(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessorySnapshot {
    pub uuid: Uuid,
    pub display_name: String,
    pub services: Vec<ServiceSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceSnapshot {
    #[serde(rename = "type")]
    pub kind: ServiceType,
    pub key: String,
    pub name: String,
    pub linked: Vec<String>,
    pub characteristics: Vec<CharacteristicSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CharacteristicSnapshot {
    #[serde(rename = "type")]
    pub kind: CharacteristicType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<CharacteristicValue>,
    pub get_event: bool,
    pub set_event: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hap::generate_uuid;

    #[test]
    fn test_new_accessory_has_information_service() {
        let mut accessory = Accessory::new("Vizio Soundbar", generate_uuid("test"));
        accessory
            .information_mut()
            .set_characteristic(CharacteristicType::Manufacturer, "Vizio");

        let info = accessory.service("accessory_information").unwrap();
        assert_eq!(info.kind, ServiceType::AccessoryInformation);
        assert_eq!(
            info.characteristic(CharacteristicType::Manufacturer)
                .unwrap()
                .value(),
            Some(CharacteristicValue::from("Vizio"))
        );
    }

    #[tokio::test]
    async fn test_read_unknown_service() {
        let accessory = Accessory::new("Vizio Soundbar", generate_uuid("test"));
        let err = accessory
            .read("televisionService", CharacteristicType::Active)
            .await
            .unwrap_err();
        assert_eq!(err, HapError::ServiceNotFound("televisionService".to_string()));
    }

    #[test]
    fn test_snapshot_serializes_types_in_snake_case() {
        let mut accessory = Accessory::new("Vizio Soundbar", generate_uuid("test"));
        let mut speaker = Service::new(ServiceType::TelevisionSpeaker, "Bar Speaker", Some("speakerService"));
        speaker.on_get(CharacteristicType::Volume);
        accessory.add_service(speaker);

        let json = serde_json::to_value(accessory.snapshot()).unwrap();
        let speaker = &json["services"][1];
        assert_eq!(speaker["type"], "television_speaker");
        assert_eq!(speaker["key"], "speakerService");
        let volume = speaker["characteristics"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["type"] == "volume")
            .unwrap();
        assert_eq!(volume["get_event"], true);
        assert!(volume.get("value").is_none());
    }
}

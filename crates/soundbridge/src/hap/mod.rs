//! Accessory model of the bridge host.
//!
//! Accessories bundle services, services bundle characteristics. A
//! characteristic either holds a static value or routes its get/set events to
//! the `CharacteristicHandler` bound on its service.

mod accessory;
mod characteristic;
mod error;
mod handler;
mod host;
mod identity;
mod service;

pub use accessory::Accessory;
pub use accessory::AccessorySnapshot;
pub use accessory::CharacteristicSnapshot;
pub use accessory::ServiceSnapshot;
pub use characteristic::Characteristic;
pub use characteristic::CharacteristicType;
pub use characteristic::CharacteristicValue;
pub use characteristic::Format;
pub use characteristic::values;
pub use error::HapError;
pub use handler::CharacteristicHandler;
pub use host::AccessoryHost;
pub use host::AccessoryStore;
pub use identity::generate_uuid;
pub use service::Service;
pub use service::ServiceType;

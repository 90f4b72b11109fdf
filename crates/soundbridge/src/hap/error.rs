use super::characteristic::CharacteristicType;

/// Errors reported back to the host for a get/set event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HapError {
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    #[error("Characteristic {kind} not found on service {service}")]
    CharacteristicNotFound {
        service: String,
        kind: CharacteristicType,
    },

    #[error("Characteristic {0} is write-only")]
    WriteOnly(CharacteristicType),

    #[error("Invalid value for characteristic {0}")]
    InvalidValue(CharacteristicType),

    #[error("Characteristic {0} is not handled by this service")]
    Unsupported(CharacteristicType),

    #[error("Communication with the device failed: {0}")]
    CommunicationFailure(String),
}

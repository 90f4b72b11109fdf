use async_trait::async_trait;

use super::characteristic::CharacteristicType;
use super::characteristic::CharacteristicValue;
use super::error::HapError;

/// Receives get/set events for the characteristics a service has bound.
///
/// Each call resolves exactly once; there is no cancellation.
#[async_trait]
pub trait CharacteristicHandler: Send + Sync {
    /// Produce the current value of a characteristic.
    async fn get(&self, kind: CharacteristicType) -> Result<CharacteristicValue, HapError>;

    /// Apply a value written by the host.
    async fn set(&self, kind: CharacteristicType, value: CharacteristicValue)
        -> Result<(), HapError>;
}

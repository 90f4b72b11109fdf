use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use tracing::info;
use uuid::Uuid;

use super::accessory::Accessory;

/// The host side of the bridge: where platforms publish their accessories.
pub trait AccessoryHost: Send + Sync {
    fn publish_external_accessories(&self, plugin_name: &str, accessories: Vec<Accessory>);
}

/// In-process host that keeps published accessories for event dispatch.
#[derive(Debug, Default)]
pub struct AccessoryStore {
    accessories: RwLock<Vec<Arc<Accessory>>>,
}

impl AccessoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, uuid: &Uuid) -> Option<Arc<Accessory>> {
        self.accessories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|a| a.uuid == *uuid)
            .cloned()
    }

    pub fn accessories(&self) -> Vec<Arc<Accessory>> {
        self.accessories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AccessoryHost for AccessoryStore {
    fn publish_external_accessories(&self, plugin_name: &str, accessories: Vec<Accessory>) {
        let mut published = self
            .accessories
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for accessory in accessories {
            info!(
                "Publishing accessory {} ({}) from {}",
                accessory.display_name, accessory.uuid, plugin_name
            );
            // Re-publishing the same identity replaces the previous entry
            published.retain(|a| a.uuid != accessory.uuid);
            published.push(Arc::new(accessory));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hap::generate_uuid;

    #[test]
    fn test_publish_and_lookup() {
        let store = AccessoryStore::new();
        let uuid = generate_uuid("a");
        store.publish_external_accessories("test", vec![Accessory::new("A", uuid)]);

        assert_eq!(store.accessories().len(), 1);
        assert_eq!(store.get(&uuid).unwrap().display_name, "A");
        assert!(store.get(&generate_uuid("b")).is_none());
    }

    #[test]
    fn test_republish_replaces_same_uuid() {
        let store = AccessoryStore::new();
        let uuid = generate_uuid("a");
        store.publish_external_accessories("test", vec![Accessory::new("A", uuid)]);
        store.publish_external_accessories("test", vec![Accessory::new("A2", uuid)]);

        assert_eq!(store.accessories().len(), 1);
        assert_eq!(store.get(&uuid).unwrap().display_name, "A2");
    }
}

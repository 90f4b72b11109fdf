use std::collections::BTreeMap;

/// Input identifier to input name, as reported by the device at setup.
///
/// Identifiers are contiguous from 0 in device order. The table is never
/// refreshed, so it goes stale if the device's inputs change later.
#[derive(Debug, Default)]
pub struct InputTable {
    names: BTreeMap<u32, String>,
    current: u32,
}

impl InputTable {
    /// Build a table from names in device order.
    pub fn from_names(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            names: (0u32..).zip(names).collect(),
            current: 0,
        }
    }

    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Last selected identifier. Not confirmed by the device.
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Record `id` as selected and return its name, if the table has one.
    ///
    /// The identifier is recorded even when it is unknown.
    pub fn select(&mut self, id: u32) -> Option<String> {
        self.current = id;
        self.names.get(&id).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.names.iter().map(|(id, name)| (*id, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_names_is_contiguous_in_order() {
        let table = InputTable::from_names(["HDMI-1".to_string(), "HDMI-2".to_string(), "BT".to_string()]);
        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries, vec![(0, "HDMI-1"), (1, "HDMI-2"), (2, "BT")]);
        assert_eq!(table.current(), 0);
    }

    #[test]
    fn test_select_records_unknown_ids() {
        let mut table = InputTable::from_names(["HDMI-1".to_string()]);
        assert_eq!(table.select(0), Some("HDMI-1".to_string()));
        assert_eq!(table.select(5), None);
        assert_eq!(table.current(), 5);
    }
}

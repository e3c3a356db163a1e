use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

use super::models::{ItemSet, NO_ITEM_MARKER};
use crate::error::{LogicError, LogicResult};

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ItemEntry {
    Value(i64),
    Group(BTreeMap<String, i64>),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemValues {
    values: HashMap<String, i64>,
}

impl ItemValues {
    pub fn new<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, i64)>,
        K: Into<String>,
    {
        Self { values: values.into_iter().map(|(k, v)| (k.into(), v)).collect() }
    }

    /// Flattens grouped entries; the first definition of an item wins.
    pub fn from_entries(entries: BTreeMap<String, ItemEntry>) -> Self {
        let mut values = HashMap::new();
        for (name, entry) in entries {
            match entry {
                ItemEntry::Value(v) => {
                    values.entry(name).or_insert(v);
                }
                ItemEntry::Group(group) => {
                    for (item, v) in group {
                        values.entry(item).or_insert(v);
                    }
                }
            }
        }
        values.remove(NO_ITEM_MARKER);
        Self { values }
    }

    pub fn value(&self, item: &str) -> LogicResult<i64> {
        self.values
            .get(item)
            .copied()
            .ok_or_else(|| LogicError::UnknownItem { item: item.to_string() })
    }

    pub fn score(&self, items: &ItemSet) -> LogicResult<i64> {
        items.iter().try_fold(0i64, |total, item| -> LogicResult<i64> {
            total
                .checked_add(self.value(item)?)
                .ok_or_else(|| LogicError::ValueOverflow { item: item.clone() })
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::logic::models::item_set;

    #[test]
    fn groups_are_flattened() {
        let raw = r#"{
            "upgrades": {"Heart1": 100, "Magic1": 100},
            "items": {"Candle": 40, "Heart1": 1},
            "Trophy": 5
        }"#;
        let entries: BTreeMap<String, ItemEntry> = serde_json::from_str(raw).unwrap();
        let values = ItemValues::from_entries(entries);
        assert_eq!(values.len(), 4);
        // "items" sorts before "upgrades", so its Heart1 is the first definition.
        assert_eq!(values.value("Heart1").unwrap(), 1);
        assert_eq!(values.value("Trophy").unwrap(), 5);
    }

    #[test]
    fn score_sums_and_missing_item_is_an_error() {
        let values = ItemValues::new([("Boots", 10), ("Flute", 20)]);
        assert_eq!(values.score(&item_set(["Boots", "Flute"])).unwrap(), 30);
        assert_eq!(values.score(&ItemSet::new()).unwrap(), 0);
        assert_eq!(
            values.score(&item_set(["Boots", "Hammer"])).unwrap_err(),
            LogicError::UnknownItem { item: "Hammer".into() }
        );
    }

    #[test]
    fn extreme_values_fail_instead_of_wrapping() {
        let values = ItemValues::new([("A", i64::MAX), ("B", 1), ("C", i64::MIN)]);
        let err = values.score(&item_set(["A", "B"])).unwrap_err();
        assert_eq!(err, LogicError::ValueOverflow { item: "B".into() });
        assert_eq!(err.kind(), crate::error::ErrorKind::Config);
        assert_eq!(values.score(&item_set(["A", "C"])).unwrap(), -1);
    }
}

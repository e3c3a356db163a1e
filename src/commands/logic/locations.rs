use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

use super::models::{item_set, Coord, CoordSet, ItemSet};
use crate::error::{LogicError, LogicResult};

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct LocationSpec {
    #[serde(default)]
    pub description: String,
    pub entrance: (i32, i32),
    #[serde(default)]
    pub exit: Option<(i32, i32)>,
    #[serde(default)]
    pub traversal_cost: Vec<String>,
    #[serde(default)]
    pub reward_cost: Vec<String>,
    #[serde(default)]
    pub reward: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocationRecord {
    pub entrance: Coord,
    pub exit: Coord,
    pub description: String,
    pub traversal_cost: ItemSet,
    pub reward_cost: ItemSet,
    pub reward: ItemSet,
}

impl LocationRecord {
    pub fn new(entrance: Coord, description: &str) -> Self {
        Self {
            entrance,
            exit: entrance,
            description: description.to_string(),
            traversal_cost: ItemSet::new(),
            reward_cost: ItemSet::new(),
            reward: ItemSet::new(),
        }
    }

    pub fn from_spec(spec: &LocationSpec) -> Self {
        let entrance = Coord::from(spec.entrance);
        Self {
            entrance,
            exit: spec.exit.map(Coord::from).unwrap_or(entrance),
            description: spec.description.clone(),
            traversal_cost: item_set(spec.traversal_cost.iter().cloned()),
            reward_cost: item_set(spec.reward_cost.iter().cloned()),
            reward: item_set(spec.reward.iter().cloned()),
        }
    }

    pub fn with_exit(mut self, exit: Coord) -> Self {
        self.exit = exit;
        self
    }

    pub fn with_traversal_cost(mut self, cost: ItemSet) -> Self {
        self.traversal_cost = cost;
        self
    }

    pub fn with_reward_cost(mut self, cost: ItemSet) -> Self {
        self.reward_cost = cost;
        self
    }

    pub fn with_reward(mut self, reward: ItemSet) -> Self {
        self.reward = reward;
        self
    }

    pub fn has_logical_exit(&self) -> bool {
        self.exit != self.entrance
    }

    pub fn total_cost(&self) -> ItemSet {
        self.reward_cost.union(&self.traversal_cost).cloned().collect()
    }

    fn requires(&self, item: &str) -> bool {
        self.traversal_cost.contains(item) || self.reward_cost.contains(item)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LocationLookup<'a> {
    Found(&'a LocationRecord),
    Default,
}

impl<'a> LocationLookup<'a> {
    pub fn record(self) -> Option<&'a LocationRecord> {
        match self {
            LocationLookup::Found(record) => Some(record),
            LocationLookup::Default => None,
        }
    }

    pub fn is_found(self) -> bool {
        matches!(self, LocationLookup::Found(_))
    }
}

#[derive(Clone, Debug, Default)]
pub struct LocationTable {
    records: Vec<LocationRecord>,
    index: HashMap<Coord, usize>,
    entrances: OnceLock<CoordSet>,
}

impl LocationTable {
    pub fn new(specs: &[LocationSpec]) -> Self {
        Self::from_records(specs.iter().map(LocationRecord::from_spec))
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = LocationRecord>,
    {
        let mut table = Self::default();
        for record in records {
            let entrance = record.entrance;
            match table.index.get(&entrance) {
                Some(&idx) => {
                    warn!("Duplicate location entry at {}; replacing `{}`", entrance, table.records[idx].description);
                    table.records[idx] = record;
                }
                None => {
                    table.index.insert(entrance, table.records.len());
                    table.records.push(record);
                }
            }
            debug!("Added location entry [{}]", entrance);
        }
        table
    }

    pub fn get(&self, coord: Coord) -> LocationLookup<'_> {
        match self.index.get(&coord) {
            Some(&idx) => LocationLookup::Found(&self.records[idx]),
            None => LocationLookup::Default,
        }
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.index.contains_key(&coord)
    }

    pub fn entrance_coordinates(&self) -> &CoordSet {
        self.entrances.get_or_init(|| {
            debug!("Populating entrance coordinates for {} locations", self.records.len());
            self.records.iter().map(|r| r.entrance).collect()
        })
    }

    /// Location granting `item`. Providers are assumed unique; with several,
    /// the last one in input order is returned.
    pub fn find_by_reward(&self, item: &str) -> LogicResult<Coord> {
        let mut providers = self.records.iter().filter(|r| r.reward.contains(item)).map(|r| r.entrance);
        let first = providers.next();
        let last = providers.last();
        if let (Some(a), Some(b)) = (first, last) {
            warn!("Item `{}` is granted by several locations ({} .. {})", item, a, b);
        }
        last.or(first).ok_or_else(|| LogicError::RewardNotFound { item: item.to_string() })
    }

    pub fn find_by_cost(&self, item: &str) -> CoordSet {
        self.records.iter().filter(|r| r.requires(item)).map(|r| r.entrance).collect()
    }

    pub fn find_related(&self, item: &str) -> LogicResult<CoordSet> {
        let mut related = self.find_by_cost(item);
        related.insert(self.find_by_reward(item)?);
        Ok(related)
    }

    pub fn records(&self) -> impl Iterator<Item = &LocationRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PartialEq for LocationTable {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl Eq for LocationTable {}

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

use super::models::{item_set, Coord, ItemSet};
use crate::error::{LogicError, LogicResult};

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct TerrainSpec {
    #[serde(rename = "TYPE", alias = "type")]
    pub kind: String,
    #[serde(rename = "SYMBOL", alias = "symbol", default)]
    pub symbol: String,
    #[serde(rename = "COLOR", alias = "color", default)]
    pub color: String,
    #[serde(rename = "IMPASSABLE", alias = "impassable", default)]
    pub impassable: bool,
    #[serde(rename = "TRAVERSAL_COST", alias = "traversal_cost", default)]
    pub traversal_cost: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Terrain {
    pub kind: String,
    pub symbol: String,
    pub color: String,
    pub impassable: bool,
    pub base_cost: ItemSet,
}

impl Terrain {
    pub fn passable(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            symbol: kind.chars().next().map(String::from).unwrap_or_default(),
            color: String::new(),
            impassable: false,
            base_cost: ItemSet::new(),
        }
    }

    pub fn impassable(kind: &str) -> Self {
        Self { impassable: true, ..Self::passable(kind) }
    }

    pub fn with_cost(mut self, cost: ItemSet) -> Self {
        self.base_cost = cost;
        self
    }
}

impl From<TerrainSpec> for Terrain {
    fn from(spec: TerrainSpec) -> Self {
        Self {
            kind: spec.kind,
            symbol: spec.symbol,
            color: spec.color,
            impassable: spec.impassable,
            base_cost: item_set(spec.traversal_cost),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TerrainTable {
    entries: HashMap<u32, Terrain>,
}

impl TerrainTable {
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (u32, Terrain)>,
    {
        Self { entries: entries.into_iter().collect() }
    }

    pub fn from_specs(specs: BTreeMap<String, TerrainSpec>) -> Result<Self> {
        let mut entries = HashMap::with_capacity(specs.len());
        for (key, spec) in specs {
            let id = key
                .trim()
                .parse::<u32>()
                .with_context(|| format!("terrain key `{}` is not a tile id", key))?;
            entries.insert(id, Terrain::from(spec));
        }
        Ok(Self { entries })
    }

    pub fn get(&self, id: u32, coord: Coord) -> LogicResult<&Terrain> {
        self.entries.get(&id).ok_or(LogicError::UnknownTerrain { id, coord })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::grid::MapGrid;
use super::items::{ItemEntry, ItemValues};
use super::locations::{LocationSpec, LocationTable};
use super::terrain::{TerrainSpec, TerrainTable};

#[derive(Deserialize, Debug, Default)]
pub struct WorldSpec {
    #[serde(default)]
    pub tiles: BTreeMap<String, TerrainSpec>,
    #[serde(default)]
    pub locations: Vec<LocationSpec>,
    #[serde(default)]
    pub items: BTreeMap<String, ItemEntry>,
}

#[derive(Debug)]
pub struct World {
    pub terrain: TerrainTable,
    pub locations: LocationTable,
    pub items: ItemValues,
}

impl World {
    pub fn from_spec(spec: WorldSpec) -> Result<Self> {
        let terrain = TerrainTable::from_specs(spec.tiles)?;
        let locations = LocationTable::new(&spec.locations);
        let items = ItemValues::from_entries(spec.items);
        Ok(Self { terrain, locations, items })
    }
}

pub fn load_world(path: &Path) -> Result<World> {
    let raw = fs::read_to_string(path).with_context(|| format!("read world config {}", path.display()))?;
    let spec: WorldSpec =
        serde_json::from_str(&raw).with_context(|| format!("parse world config {}", path.display()))?;
    let world = World::from_spec(spec).with_context(|| format!("build world from {}", path.display()))?;
    info!(
        "Loaded world {}: {} terrain types, {} locations, {} item values",
        path.display(),
        world.terrain.len(),
        world.locations.len(),
        world.items.len()
    );
    Ok(world)
}

pub fn load_map_data(path: &Path) -> Result<MapGrid> {
    let raw = fs::read_to_string(path).with_context(|| format!("read map data {}", path.display()))?;
    MapGrid::parse(&raw).with_context(|| format!("parse map data {}", path.display()))
}

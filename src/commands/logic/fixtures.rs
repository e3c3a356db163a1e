use super::grid::MapGrid;
use super::items::ItemValues;
use super::locations::{LocationRecord, LocationTable};
use super::models::{item_set, Coord};
use super::neighbor_policy::MovementPolicy;
use super::terrain::{Terrain, TerrainTable};
use super::tile_map::TileMap;

pub const START: Coord = Coord::new(0, 0);
pub const BOOTS_CAVE: Coord = Coord::new(0, 1);
pub const FLUTE_TOWN: Coord = Coord::new(0, 3);
pub const PALACE: Coord = Coord::new(0, 5);

pub fn terrain() -> TerrainTable {
    TerrainTable::new([
        (0, Terrain::passable("Grassland")),
        (1, Terrain::impassable("Mountain")),
        (2, Terrain::passable("Swamp").with_cost(item_set(["Boots"]))),
    ])
}

pub fn tiles(map: &str, locations: &LocationTable) -> TileMap {
    let grid = MapGrid::parse(map).unwrap();
    TileMap::build(&grid, locations, &terrain(), &MovementPolicy::default()).unwrap()
}

// A 1x7 corridor: Boots at (0,1), the Flute town behind a Boots gate at
// (0,3), the Crystal palace behind a Flute gate at (0,5).
pub fn corridor_locations() -> LocationTable {
    LocationTable::from_records([
        LocationRecord::new(BOOTS_CAVE, "Boots cave").with_reward(item_set(["Boots"])),
        LocationRecord::new(FLUTE_TOWN, "Flute town")
            .with_traversal_cost(item_set(["Boots"]))
            .with_reward(item_set(["Flute"])),
        LocationRecord::new(PALACE, "Palace")
            .with_traversal_cost(item_set(["Flute"]))
            .with_reward(item_set(["Crystal"])),
    ])
}

pub fn corridor_grid() -> MapGrid {
    MapGrid::parse("0 0 0 0 0 0 0").unwrap()
}

pub fn corridor_tiles() -> TileMap {
    tiles("0 0 0 0 0 0 0", &corridor_locations())
}

pub fn item_values() -> ItemValues {
    ItemValues::new([("Boots", 10), ("Flute", 20), ("Crystal", 50), ("Key", 5)])
}

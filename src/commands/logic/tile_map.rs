use log::{debug, info};
use rayon::prelude::*;

use super::grid::GridProvider;
use super::locations::{LocationLookup, LocationTable};
use super::models::{Coord, ItemSet};
use super::neighbor_policy::MovementPolicy;
use super::terrain::TerrainTable;
use crate::error::{LogicError, LogicResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileNode {
    pub identifier: u32,
    pub location: Coord,
    pub background: String,
    pub symbol: String,
    pub color: String,
    pub description: String,
    pub traversal_cost: ItemSet,
    pub reward_cost: ItemSet,
    pub reward: ItemSet,
    pub is_location: bool,
    pub edges: Vec<Coord>,
}

impl TileNode {
    pub fn total_cost(&self) -> ItemSet {
        self.reward_cost.union(&self.traversal_cost).cloned().collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMap {
    width: i32,
    height: i32,
    nodes: Vec<TileNode>,
}

impl TileMap {
    pub fn build<G>(
        grid: &G,
        locations: &LocationTable,
        terrain: &TerrainTable,
        policy: &MovementPolicy,
    ) -> LogicResult<Self>
    where
        G: GridProvider + Sync + ?Sized,
    {
        let (width, height) = grid.dimensions();
        info!("Building tile map [{}, {}] with {} locations", width, height, locations.len());

        let nodes = (0..width * height)
            .into_par_iter()
            .map(|idx| {
                let coord = Coord::new(idx / height, idx % height);
                build_node(grid, locations, terrain, policy, coord)
            })
            .collect::<LogicResult<Vec<_>>>()?;

        Ok(Self { width, height, nodes })
    }

    pub fn dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    pub fn get(&self, coord: Coord) -> LogicResult<&TileNode> {
        let idx = self.index(coord)?;
        Ok(&self.nodes[idx])
    }

    pub fn set(&mut self, coord: Coord, node: TileNode) -> LogicResult<()> {
        let idx = self.index(coord)?;
        self.nodes[idx] = node;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn index(&self, coord: Coord) -> LogicResult<usize> {
        if !self.contains(coord) {
            return Err(LogicError::OutOfBounds { coord, width: self.width, height: self.height });
        }
        Ok((coord.x * self.height + coord.y) as usize)
    }
}

fn build_node<G>(
    grid: &G,
    locations: &LocationTable,
    terrain: &TerrainTable,
    policy: &MovementPolicy,
    coord: Coord,
) -> LogicResult<TileNode>
where
    G: GridProvider + ?Sized,
{
    let identifier = grid.terrain_id(coord)?;
    let tile = terrain.get(identifier, coord)?;

    let mut edges: Vec<Coord> = Vec::with_capacity(5);
    for n in policy.neighbors(coord) {
        if !grid.contains(n) {
            continue;
        }
        // Location logic overrides terrain, so entrances stay reachable.
        let blocked = terrain.get(grid.terrain_id(n)?, n)?.impassable && !locations.contains(n);
        if !blocked {
            edges.push(n);
        }
    }

    let node = match locations.get(coord) {
        LocationLookup::Found(record) => {
            if record.has_logical_exit() {
                if !grid.contains(record.exit) {
                    let (width, height) = grid.dimensions();
                    return Err(LogicError::OutOfBounds { coord: record.exit, width, height });
                }
                if !edges.contains(&record.exit) {
                    edges.push(record.exit);
                }
            }
            TileNode {
                identifier,
                location: coord,
                background: tile.kind.clone(),
                symbol: tile.symbol.clone(),
                color: tile.color.clone(),
                description: record.description.clone(),
                traversal_cost: record.traversal_cost.clone(),
                reward_cost: record.reward_cost.clone(),
                reward: record.reward.clone(),
                is_location: true,
                edges,
            }
        }
        LocationLookup::Default => TileNode {
            identifier,
            location: coord,
            background: tile.kind.clone(),
            symbol: tile.symbol.clone(),
            color: tile.color.clone(),
            description: String::new(),
            traversal_cost: tile.base_cost.clone(),
            reward_cost: ItemSet::new(),
            reward: ItemSet::new(),
            is_location: false,
            edges,
        },
    };
    debug!("Added tile node {} [{}] -> {:?}", coord, node.background, node.edges);
    Ok(node)
}

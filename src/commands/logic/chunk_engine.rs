use log::{debug, info, warn};
use serde::Serialize;

use super::graph::{Bottleneck, BottleneckMap, LocationGraph, TopoStep};
use super::grid::GridProvider;
use super::locations::LocationTable;
use super::models::{Coord, CoordSet, ItemSet};
use super::neighbor_policy::MovementPolicy;
use super::region_explorer::{explore_region, Region};
use super::terrain::TerrainTable;
use super::tile_map::TileMap;
use crate::error::{LogicError, LogicResult};

pub const DEFAULT_MAX_CHUNKS: usize = 256;

#[derive(Copy, Clone, Debug)]
pub struct EngineOptions {
    pub max_chunks: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { max_chunks: DEFAULT_MAX_CHUNKS }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    Expanding,
    Done,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChunkSummary {
    pub chunk: usize,
    pub tiles: usize,
    pub inventory: ItemSet,
    pub locations: CoordSet,
    pub completed: CoordSet,
    pub rewards: ItemSet,
    pub pending_rewards: ItemSet,
    pub costs: ItemSet,
    pub bottleneck: ItemSet,
}

#[derive(Clone, Debug)]
pub struct GlobalState {
    pub phase: Phase,
    pub chunk: usize,
    pub inventory: ItemSet,
    pub completed: CoordSet,
    pub previous: Option<Region>,
    pub graph: LocationGraph,
    pub bottlenecks: BottleneckMap,
    pub history: Vec<ChunkSummary>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkGraph {
    pub start: Coord,
    pub goal: Coord,
    pub graph: LocationGraph,
    pub bottlenecks: BottleneckMap,
    pub history: Vec<ChunkSummary>,
    pub inventory: ItemSet,
    pub completed: CoordSet,
}

impl ChunkGraph {
    pub fn topological_order(&self) -> Vec<TopoStep> {
        let mut order = vec![TopoStep { location: self.start, unlocks: None }];
        order.extend(self.bottlenecks.iter().map(|b| TopoStep {
            location: b.reward_location,
            unlocks: Some(b.cost_locations.clone()),
        }));
        order
    }

    pub fn chunks(&self) -> usize {
        self.history.len()
    }
}

/// Items granted by `previous` that `current` charges and that were not
/// already held when `previous` was explored.
pub fn find_bottleneck(current: &Region, previous: &Region) -> ItemSet {
    current
        .cost_items
        .intersection(&previous.reward_items)
        .filter(|item| !previous.inventory.contains(*item))
        .cloned()
        .collect()
}

pub struct ChunkEngine<'a> {
    tiles: &'a TileMap,
    locations: &'a LocationTable,
    start: Coord,
    goal: Coord,
    options: EngineOptions,
}

impl<'a> ChunkEngine<'a> {
    pub fn new(
        tiles: &'a TileMap,
        locations: &'a LocationTable,
        start: Coord,
        goal: Coord,
        options: EngineOptions,
    ) -> LogicResult<Self> {
        tiles.get(start)?;
        if !locations.contains(goal) {
            return Err(LogicError::GoalNotLocation { goal });
        }
        Ok(Self { tiles, locations, start, goal, options })
    }

    pub fn initial_state(&self) -> GlobalState {
        GlobalState {
            phase: Phase::Expanding,
            chunk: 0,
            inventory: ItemSet::new(),
            completed: CoordSet::new(),
            previous: None,
            graph: LocationGraph::default(),
            bottlenecks: BottleneckMap::default(),
            history: Vec::new(),
        }
    }

    pub fn step(&self, mut state: GlobalState) -> LogicResult<GlobalState> {
        if state.phase == Phase::Done {
            return Ok(state);
        }
        if state.chunk >= self.options.max_chunks {
            warn!("Chunk ceiling {} reached before goal {}", self.options.max_chunks, self.goal);
            return Err(LogicError::GoalUnreachable { goal: self.goal, chunks: state.chunk });
        }

        info!("Exploring chunk {} with inventory {:?}", state.chunk, state.inventory);
        let region = explore_region(self.tiles, self.locations, self.start, &state.inventory, &state.completed)?;

        for &location in &region.locations {
            state.graph.add_node(location);
        }
        state.graph.connect_all(&region.completed);

        let bottleneck = match &state.previous {
            Some(previous) => find_bottleneck(&region, previous),
            None => ItemSet::new(),
        };
        let entries = self.resolve_bottleneck(&bottleneck, state.chunk)?;
        for item in &bottleneck {
            state.graph.connect_all(&self.locations.find_related(item)?);
        }
        for entry in entries {
            let reward_location = entry.reward_location;
            if state.bottlenecks.record(entry) {
                info!("Bottleneck @ {} unlocks chunk {}", reward_location, state.chunk);
            } else {
                debug!("Bottleneck @ {} already recorded; keeping first entry", reward_location);
            }
        }

        let before = (state.inventory.len(), state.completed.len());
        state.inventory.extend(region.reward_items.iter().cloned());
        state.completed.extend(region.completed.iter().copied());
        let progressed = before != (state.inventory.len(), state.completed.len());

        state.history.push(ChunkSummary {
            chunk: state.chunk,
            tiles: region.exploration.len(),
            inventory: region.inventory.clone(),
            locations: region.locations.clone(),
            completed: region.completed.clone(),
            rewards: region.reward_items.clone(),
            pending_rewards: region.pending_rewards.clone(),
            costs: region.cost_items.clone(),
            bottleneck,
        });
        state.chunk += 1;
        state.previous = Some(region);

        if state.completed.contains(&self.goal) {
            info!("Goal {} completed after {} chunks", self.goal, state.chunk);
            state.phase = Phase::Done;
        } else if !progressed {
            warn!("Chunk {} gained nothing; goal {} cannot be completed", state.chunk - 1, self.goal);
            return Err(LogicError::GoalUnreachable { goal: self.goal, chunks: state.chunk });
        }
        Ok(state)
    }

    pub fn run(&self) -> LogicResult<ChunkGraph> {
        let mut state = self.initial_state();
        while state.phase == Phase::Expanding {
            state = self.step(state)?;
        }
        Ok(ChunkGraph {
            start: self.start,
            goal: self.goal,
            graph: state.graph,
            bottlenecks: state.bottlenecks,
            history: state.history,
            inventory: state.inventory,
            completed: state.completed,
        })
    }

    fn resolve_bottleneck(&self, items: &ItemSet, chunk: usize) -> LogicResult<Vec<Bottleneck>> {
        let mut entries: Vec<Bottleneck> = Vec::new();
        for item in items {
            let reward_location = self.locations.find_by_reward(item)?;
            let cost_locations = self.locations.find_by_cost(item);
            if cost_locations.is_empty() {
                return Err(LogicError::CostNotFound { item: item.clone() });
            }
            debug!("Item `{}`: {} -> {:?}", item, reward_location, cost_locations);

            match entries.iter_mut().find(|e| e.reward_location == reward_location) {
                Some(entry) => {
                    entry.cost_locations.extend(cost_locations);
                    entry.items.insert(item.clone());
                }
                None => entries.push(Bottleneck {
                    reward_location,
                    cost_locations,
                    items: ItemSet::from([item.clone()]),
                    chunk,
                }),
            }
        }
        Ok(entries)
    }
}

pub fn build_graph<G>(
    grid: &G,
    locations: &LocationTable,
    terrain: &TerrainTable,
    start: Coord,
    goal: Coord,
) -> LogicResult<ChunkGraph>
where
    G: GridProvider + Sync + ?Sized,
{
    let tiles = TileMap::build(grid, locations, terrain, &MovementPolicy::default())?;
    ChunkEngine::new(&tiles, locations, start, goal, EngineOptions::default())?.run()
}

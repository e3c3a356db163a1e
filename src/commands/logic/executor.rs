use anyhow::{anyhow, Context, Result};
use log::info;
use serde::Serialize;

use super::chunk_engine::{ChunkEngine, ChunkGraph, ChunkSummary};
use super::config::Config;
use super::graph::TopoStep;
use super::grid::{GridProvider, MapGrid};
use super::input::World;
use super::models::Coord;
use super::route_synthesizer::{plan_routes, RankedPath};
use super::tile_map::TileMap;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Stage {
    Locations,
    Nodes,
    Chunks,
    Routes,
}

impl Stage {
    pub fn key(self) -> &'static str {
        match self {
            Stage::Locations => "logic_stage_locations",
            Stage::Nodes => "logic_stage_nodes",
            Stage::Chunks => "logic_stage_chunks",
            Stage::Routes => "logic_stage_routes",
        }
    }
    pub fn all() -> &'static [Stage] { &[Stage::Locations, Stage::Nodes, Stage::Chunks, Stage::Routes] }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct ExecOptions {
    pub routes: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ExecStats {
    pub ran_locations: bool,
    pub ran_nodes: bool,
    pub ran_chunks: bool,
    pub ran_routes: bool,
    pub tiles: usize,
    pub locations: usize,
    pub chunks: usize,
    pub bottlenecks: usize,
    pub routes: usize,
}

#[derive(Clone, Debug)]
pub struct Analysis {
    pub chunk_graph: ChunkGraph,
    pub routes: Vec<RankedPath>,
    pub stats: ExecStats,
}

#[derive(Debug, Serialize)]
pub struct GraphRow {
    pub location: Coord,
    pub edges: Vec<Coord>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisSummary<'a> {
    pub start: Coord,
    pub goal: Coord,
    pub chunks: &'a [ChunkSummary],
    pub order: Vec<TopoStep>,
    pub graph: Vec<GraphRow>,
    pub routes: &'a [RankedPath],
    pub stats: &'a ExecStats,
}

impl Analysis {
    pub fn summary(&self) -> AnalysisSummary<'_> {
        let graph = self
            .chunk_graph
            .graph
            .iter()
            .map(|(&location, edges)| GraphRow { location, edges: edges.iter().copied().collect() })
            .collect();
        AnalysisSummary {
            start: self.chunk_graph.start,
            goal: self.chunk_graph.goal,
            chunks: &self.chunk_graph.history,
            order: self.chunk_graph.topological_order(),
            graph,
            routes: &self.routes,
            stats: &self.stats,
        }
    }
}

pub fn run_pipeline(grid: &MapGrid, world: &World, cfg: &Config, opts: ExecOptions) -> Result<Analysis> {
    let mut stats = ExecStats::default();
    let start = cfg.start();
    let goal = cfg.goal.ok_or_else(|| anyhow!("no goal configured; pass --goal x,y or set BEEDLE_GOAL"))?;

    let mut tiles: Option<TileMap> = None;
    let mut chunk_graph: Option<ChunkGraph> = None;
    let mut routes = Vec::new();

    for &stage in Stage::all() {
        info!("Running stage {}", stage.key());
        match stage {
            Stage::Locations => {
                validate_locations(grid, world)?;
                stats.locations = world.locations.len();
                stats.ran_locations = true;
            }
            Stage::Nodes => {
                let built = TileMap::build(grid, &world.locations, &world.terrain, &cfg.movement_policy())
                    .context("build tile map")?;
                validate_nodes(grid, &built)?;
                stats.tiles = built.len();
                tiles = Some(built);
                stats.ran_nodes = true;
            }
            Stage::Chunks => {
                let tiles = tiles.as_ref().ok_or_else(|| anyhow!("chunk stage needs the tile map"))?;
                let result = ChunkEngine::new(tiles, &world.locations, start, goal, cfg.engine_options())?
                    .run()
                    .with_context(|| format!("explore chunks from {} to {}", start, goal))?;
                validate_chunks(&result)?;
                stats.chunks = result.chunks();
                stats.bottlenecks = result.bottlenecks.len();
                chunk_graph = Some(result);
                stats.ran_chunks = true;
            }
            Stage::Routes => {
                if !opts.routes {
                    continue;
                }
                let tiles = tiles.as_ref().ok_or_else(|| anyhow!("route stage needs the tile map"))?;
                let inventory = &chunk_graph
                    .as_ref()
                    .ok_or_else(|| anyhow!("route stage needs the chunk graph"))?
                    .inventory;
                routes = plan_routes(tiles, &world.locations, start, inventory, &world.items, cfg.route_options())
                    .context("plan routes")?;
                stats.routes = routes.len();
                stats.ran_routes = true;
            }
        }
    }

    let chunk_graph = chunk_graph.ok_or_else(|| anyhow!("chunk stage produced no result"))?;
    Ok(Analysis { chunk_graph, routes, stats })
}

// ---- Validations ----

fn validate_locations(grid: &MapGrid, world: &World) -> Result<()> {
    for record in world.locations.records() {
        if !grid.contains(record.entrance) {
            return Err(anyhow!("validate_locations: `{}` entrance {} is off the map", record.description, record.entrance));
        }
    }
    Ok(())
}

fn validate_nodes(grid: &MapGrid, tiles: &TileMap) -> Result<()> {
    let (w, h) = grid.dimensions();
    let expected = (w * h) as usize;
    if tiles.len() != expected {
        return Err(anyhow!("validate_nodes: expected {} nodes, built {}", expected, tiles.len()));
    }
    Ok(())
}

fn validate_chunks(result: &ChunkGraph) -> Result<()> {
    if !result.completed.contains(&result.goal) {
        return Err(anyhow!("validate_chunks: goal {} not completed", result.goal));
    }
    for entry in result.bottlenecks.iter() {
        if !result.graph.contains(entry.reward_location) {
            return Err(anyhow!("validate_chunks: bottleneck {} missing from graph", entry.reward_location));
        }
    }
    Ok(())
}

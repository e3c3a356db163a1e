use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

pub mod chunk_engine;
pub mod config;
pub mod executor;
pub mod graph;
pub mod grid;
pub mod input;
pub mod items;
pub mod locations;
pub mod logging;
pub mod models;
pub mod neighbor_policy;
pub mod region_explorer;
pub mod route_synthesizer;
pub mod terrain;
pub mod tile_map;

#[cfg(test)]
mod fixtures;

pub use chunk_engine::{build_graph, find_bottleneck, ChunkEngine, ChunkGraph, EngineOptions, GlobalState, Phase};
pub use region_explorer::{explore, explore_region, Exploration, Region};
pub use route_synthesizer::{plan_routes, synthesize_routes, trace_path, RankedPath, RouteOptions, TilePath};

use models::{item_set, Coord};

#[derive(Args, Debug, Clone)]
pub struct CommonOpts {
    /// World config with tiles, locations and item values (default: data/config/world.json or BEEDLE_WORLD)
    #[arg(long = "world")]
    pub world: Option<PathBuf>,
    /// Whitespace-separated terrain ids, one row per line (default: data/map.dat or BEEDLE_MAP)
    #[arg(long = "map")]
    pub map: Option<PathBuf>,
    /// Start tile as x,y (default 0,0)
    #[arg(long = "start")]
    pub start: Option<String>,
    /// Goal location as x,y
    #[arg(long = "goal")]
    pub goal: Option<String>,
    /// Give up after this many exploration chunks
    #[arg(long = "max-chunks")]
    pub max_chunks: Option<usize>,
    /// Key-to-key hops per planned route
    #[arg(long = "route-hops")]
    pub route_hops: Option<usize>,
    /// Number of worker threads (rayon)
    #[arg(long = "threads")]
    pub threads: Option<usize>,
    /// Allow diagonal movement between tiles
    #[arg(long = "diagonals")]
    pub diagonals: bool,
    /// Log level (trace|debug|info|warn|error)
    #[arg(long = "log-level")]
    pub log_level: Option<String>,
    /// Print results as JSON
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum LogicCommand {
    /// Run the chunk engine and print chunks, bottleneck order and graph
    #[command(name = "analyze")]
    Analyze,
    /// Run the chunk engine, then rank routes with the final inventory
    #[command(name = "routes")]
    Routes,
    /// Flood fill once from the start with a fixed inventory
    #[command(name = "explore")]
    Explore {
        /// Inventory items (comma-separated or repeated)
        #[arg(long = "items", value_delimiter = ',')]
        items: Vec<String>,
    },
}

#[derive(Serialize)]
struct RegionReport<'a> {
    start: Coord,
    tiles: usize,
    locations: &'a models::CoordSet,
    completed: &'a models::CoordSet,
    rewards: &'a models::ItemSet,
    pending_rewards: &'a models::ItemSet,
    costs: &'a models::ItemSet,
}

pub fn cmd_logic(common: CommonOpts, sub: LogicCommand) -> Result<()> {
    // CLI first, then any BEEDLE_* variable that is set
    let mut cfg = config::Config {
        world_path: common.world.clone(),
        map_path: common.map.clone(),
        start: common.start.as_deref().map(parse_coord_cli).transpose()?,
        goal: common.goal.as_deref().map(parse_coord_cli).transpose()?,
        max_chunks: common.max_chunks,
        route_hops: common.route_hops,
        threads: common.threads,
        allow_diagonals: common.diagonals,
        log_level: common.log_level.clone(),
    };
    cfg.overlay(config::Config::from_env_defaults());

    logging::init(cfg.log_level.as_deref());
    if let Some(n) = cfg.threads {
        let _ = rayon::ThreadPoolBuilder::new().num_threads(n).build_global();
    }

    let world = input::load_world(&cfg.world_path())?;
    let grid = input::load_map_data(&cfg.map_path())?;

    match sub {
        LogicCommand::Analyze => {
            let analysis = executor::run_pipeline(&grid, &world, &cfg, executor::ExecOptions { routes: false })?;
            if common.json {
                println!("{}", serde_json::to_string_pretty(&analysis.summary())?);
            } else {
                print_analysis(&analysis);
            }
            Ok(())
        }
        LogicCommand::Routes => {
            let analysis = executor::run_pipeline(&grid, &world, &cfg, executor::ExecOptions { routes: true })?;
            if common.json {
                println!("{}", serde_json::to_string_pretty(&analysis.summary())?);
            } else {
                print_routes(&analysis.routes);
            }
            Ok(())
        }
        LogicCommand::Explore { items } => {
            let tiles = tile_map::TileMap::build(&grid, &world.locations, &world.terrain, &cfg.movement_policy())?;
            let inventory = item_set(items);
            let completed = models::CoordSet::new();
            let region = explore_region(&tiles, &world.locations, cfg.start(), &inventory, &completed)?;
            let report = RegionReport {
                start: cfg.start(),
                tiles: region.exploration.len(),
                locations: &region.locations,
                completed: &region.completed,
                rewards: &region.reward_items,
                pending_rewards: &region.pending_rewards,
                costs: &region.cost_items,
            };
            if common.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Region @ {}: {} tiles", report.start, report.tiles);
                println!("  locations      : {}", join_coords(report.locations.iter()));
                println!("  completed      : {}", join_coords(report.completed.iter()));
                println!("  rewards        : {:?}", report.rewards);
                println!("  pending rewards: {:?}", report.pending_rewards);
                println!("  costs          : {:?}", report.costs);
            }
            Ok(())
        }
    }
}

fn print_analysis(analysis: &executor::Analysis) {
    let result = &analysis.chunk_graph;
    println!("Goal {} completed after {} chunks", result.goal, result.chunks());
    for chunk in &result.history {
        println!(
            "  chunk {:>3}: {:>6} tiles, rewards {:?}, bottleneck {:?}",
            chunk.chunk,
            chunk.tiles,
            chunk.rewards,
            chunk.bottleneck
        );
    }
    println!("Order:");
    for step in result.topological_order() {
        match step.unlocks {
            Some(unlocks) => println!("  {} -> {}", step.location, join_coords(unlocks.iter())),
            None => println!("  {} (start)", step.location),
        }
    }
    println!("Graph:");
    for (location, edges) in result.graph.iter() {
        println!("  {} -> {}", location, join_coords(edges.iter()));
    }
}

fn print_routes(routes: &[RankedPath]) {
    println!("{} routes", routes.len());
    for (idx, route) in routes.iter().enumerate() {
        println!(
            "  #{:<3} value {:>5} length {:>5} via {} items {:?}",
            idx + 1,
            route.rank.value,
            route.rank.length,
            join_coords(route.path.keys().iter()),
            route.path.inventory()
        );
    }
}

fn join_coords<'a>(coords: impl Iterator<Item = &'a Coord>) -> String {
    coords.map(|c| c.to_string()).collect::<Vec<_>>().join(" ")
}

fn parse_coord_cli(s: &str) -> Result<Coord> {
    config::parse_coord(s).ok_or_else(|| anyhow::anyhow!("expected a coordinate as x,y, got `{}`", s))
}

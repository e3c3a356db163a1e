use std::{env, path::PathBuf};

use super::chunk_engine::{EngineOptions, DEFAULT_MAX_CHUNKS};
use super::models::Coord;
use super::neighbor_policy::MovementPolicy;
use super::route_synthesizer::{RouteOptions, DEFAULT_ROUTE_HOPS};

#[derive(Clone, Debug, Default)]
pub struct Config {
    pub world_path: Option<PathBuf>,
    pub map_path: Option<PathBuf>,
    pub start: Option<Coord>,
    pub goal: Option<Coord>,
    pub max_chunks: Option<usize>,
    pub route_hops: Option<usize>,
    pub threads: Option<usize>,
    pub allow_diagonals: bool,
    pub log_level: Option<String>,
}

impl Config {
    pub fn from_env_defaults() -> Self {
        let world_path = env::var("BEEDLE_WORLD").ok().map(PathBuf::from);
        let map_path = env::var("BEEDLE_MAP").ok().map(PathBuf::from);
        let start = env::var("BEEDLE_START").ok().and_then(|s| parse_coord(&s));
        let goal = env::var("BEEDLE_GOAL").ok().and_then(|s| parse_coord(&s));
        let max_chunks = env::var("BEEDLE_MAX_CHUNKS").ok().and_then(|s| s.parse::<usize>().ok());
        let route_hops = env::var("BEEDLE_ROUTE_HOPS").ok().and_then(|s| s.parse::<usize>().ok());
        let threads = env::var("BEEDLE_THREADS").ok().and_then(|s| s.parse::<usize>().ok());
        let allow_diagonals = env::var("BEEDLE_DIAGONALS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false);
        let log_level = env::var("BEEDLE_LOG_LEVEL").ok();
        Self { world_path, map_path, start, goal, max_chunks, route_hops, threads, allow_diagonals, log_level }
    }

    /// Fields set in `other` replace ours; flags only ever switch on.
    pub fn overlay(&mut self, other: Config) {
        if other.world_path.is_some() { self.world_path = other.world_path; }
        if other.map_path.is_some() { self.map_path = other.map_path; }
        if other.start.is_some() { self.start = other.start; }
        if other.goal.is_some() { self.goal = other.goal; }
        if other.max_chunks.is_some() { self.max_chunks = other.max_chunks; }
        if other.route_hops.is_some() { self.route_hops = other.route_hops; }
        if other.threads.is_some() { self.threads = other.threads; }
        if other.allow_diagonals { self.allow_diagonals = true; }
        if other.log_level.is_some() { self.log_level = other.log_level; }
    }

    pub fn world_path(&self) -> PathBuf {
        self.world_path.clone().unwrap_or_else(|| crate::util::default_paths().0)
    }

    pub fn map_path(&self) -> PathBuf {
        self.map_path.clone().unwrap_or_else(|| crate::util::default_paths().1)
    }

    pub fn start(&self) -> Coord {
        self.start.unwrap_or(Coord::new(0, 0))
    }

    pub fn movement_policy(&self) -> MovementPolicy {
        MovementPolicy { allow_diagonals: self.allow_diagonals }
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions { max_chunks: self.max_chunks.unwrap_or(DEFAULT_MAX_CHUNKS) }
    }

    pub fn route_options(&self) -> RouteOptions {
        RouteOptions { max_hops: self.route_hops.unwrap_or(DEFAULT_ROUTE_HOPS) }
    }
}

pub fn parse_coord(input: &str) -> Option<Coord> {
    let (x, y) = input.split_once(',')?;
    let x = x.trim().parse::<i32>().ok()?;
    let y = y.trim().parse::<i32>().ok()?;
    Some(Coord::new(x, y))
}

use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;

use super::items::ItemValues;
use super::locations::LocationTable;
use super::models::{is_satisfied, Coord, ItemSet, ParentLinks};
use super::region_explorer::explore;
use super::tile_map::TileMap;
use crate::error::LogicResult;

pub const DEFAULT_ROUTE_HOPS: usize = 2;

#[derive(Copy, Clone, Debug)]
pub struct RouteOptions {
    pub max_hops: usize,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self { max_hops: DEFAULT_ROUTE_HOPS }
    }
}

/// Walks parent links back from `target`. `None` when `target` was never
/// discovered or the chain does not end within `links.len()` steps.
pub fn trace_path(links: &ParentLinks, target: Coord) -> Option<Vec<Coord>> {
    let mut path = vec![target];
    let mut current = target;
    for _ in 0..=links.len() {
        match links.get(&current)? {
            None => {
                path.reverse();
                return Some(path);
            }
            Some(parent) => {
                current = *parent;
                path.push(current);
            }
        }
    }
    None
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TilePath {
    coords: Vec<Coord>,
    keys: Vec<Coord>,
    inventory: ItemSet,
}

impl TilePath {
    pub fn new(tiles: &TileMap, coords: Vec<Coord>) -> LogicResult<Option<Self>> {
        let (first, last) = match (coords.first(), coords.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return Ok(None),
        };
        let keys = if first == last { vec![first] } else { vec![first, last] };
        let inventory = collect_inventory(tiles, &keys)?;
        Ok(Some(Self { coords, keys, inventory }))
    }

    pub fn start(&self) -> Coord {
        self.coords[0]
    }

    pub fn end(&self) -> Coord {
        self.coords[self.coords.len() - 1]
    }

    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    pub fn keys(&self) -> &[Coord] {
        &self.keys
    }

    pub fn inventory(&self) -> &ItemSet {
        &self.inventory
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn concat(&self, other: &TilePath, tiles: &TileMap) -> LogicResult<Option<TilePath>> {
        if self.end() != other.start() {
            return Ok(None);
        }
        let mut coords = self.coords.clone();
        coords.extend_from_slice(&other.coords[1..]);

        let mut keys = self.keys.clone();
        for &key in &other.keys {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        let inventory = collect_inventory(tiles, &keys)?;
        Ok(Some(TilePath { coords, keys, inventory }))
    }

    pub fn rank(&self, values: &ItemValues) -> LogicResult<PathRank> {
        Ok(PathRank { value: values.score(&self.inventory)?, length: self.coords.len() })
    }
}

/// Rewards picked up walking `keys` in order; a reward counts once its reward
/// cost is covered by what was collected before it.
fn collect_inventory(tiles: &TileMap, keys: &[Coord]) -> LogicResult<ItemSet> {
    let mut inventory = ItemSet::new();
    for &key in keys {
        let node = tiles.get(key)?;
        if is_satisfied(&node.reward_cost, &inventory) {
            inventory.extend(node.reward.iter().cloned());
        }
    }
    Ok(inventory)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PathRank {
    pub value: i64,
    pub length: usize,
}

impl Ord for PathRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value).then(self.length.cmp(&other.length))
    }
}

impl PartialOrd for PathRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RankedPath {
    pub rank: PathRank,
    pub path: TilePath,
}

pub fn rank_paths(paths: Vec<TilePath>, values: &ItemValues) -> LogicResult<Vec<RankedPath>> {
    let mut ranked = paths
        .into_iter()
        .map(|path| -> LogicResult<RankedPath> { Ok(RankedPath { rank: path.rank(values)?, path }) })
        .collect::<LogicResult<Vec<_>>>()?;
    ranked.sort_by(|a, b| b.rank.cmp(&a.rank));
    Ok(ranked)
}

fn hop_paths(tiles: &TileMap, links: &ParentLinks, keys: &[Coord]) -> LogicResult<Vec<TilePath>> {
    let mut paths = Vec::new();
    for &key in keys {
        let coords = match trace_path(links, key) {
            Some(coords) if coords.len() > 1 => coords,
            _ => continue,
        };
        if let Some(path) = TilePath::new(tiles, coords)? {
            paths.push(path);
        }
    }
    Ok(paths)
}

pub fn synthesize_routes(
    tiles: &TileMap,
    links: &ParentLinks,
    keys: &[Coord],
    values: &ItemValues,
) -> LogicResult<Vec<RankedPath>> {
    let paths = hop_paths(tiles, links, keys)?;
    debug!("Synthesized {} paths to {} keys", paths.len(), keys.len());
    rank_paths(paths, values)
}

pub fn plan_routes(
    tiles: &TileMap,
    locations: &LocationTable,
    start: Coord,
    inventory: &ItemSet,
    values: &ItemValues,
    options: RouteOptions,
) -> LogicResult<Vec<RankedPath>> {
    if options.max_hops == 0 {
        return Ok(Vec::new());
    }
    let root = explore(tiles, start, inventory)?;
    let keys: Vec<Coord> = locations
        .entrance_coordinates()
        .iter()
        .copied()
        .filter(|&c| c != start && root.contains(c))
        .collect();
    info!("Planning routes from {} over {} reachable keys", start, keys.len());

    let onward: Vec<(Coord, Vec<TilePath>)> = keys
        .par_iter()
        .map(|&key| -> LogicResult<(Coord, Vec<TilePath>)> {
            let found = explore(tiles, key, inventory)?;
            Ok((key, hop_paths(tiles, &found.links, &keys)?))
        })
        .collect::<LogicResult<Vec<_>>>()?;

    let mut frontier = hop_paths(tiles, &root.links, &keys)?;
    let mut routes = frontier.clone();
    for _ in 1..options.max_hops {
        let mut next = Vec::new();
        for path in &frontier {
            let hops = onward.iter().filter(|(key, _)| *key == path.end()).flat_map(|(_, hops)| hops);
            for hop in hops {
                if path.keys.contains(&hop.end()) {
                    continue;
                }
                if let Some(joined) = path.concat(hop, tiles)? {
                    next.push(joined);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        routes.extend(next.iter().cloned());
        frontier = next;
    }

    rank_paths(routes, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::logic::fixtures::{self, BOOTS_CAVE, FLUTE_TOWN, PALACE, START};
    use crate::commands::logic::locations::LocationRecord;
    use crate::commands::logic::models::item_set;
    use crate::error::LogicError;

    fn everything() -> ItemSet {
        item_set(["Boots", "Flute", "Crystal"])
    }

    #[test]
    fn trace_path_walks_back_to_start() {
        let tiles = fixtures::corridor_tiles();
        let found = explore(&tiles, START, &everything()).unwrap();
        let path = trace_path(&found.links, FLUTE_TOWN).unwrap();
        assert_eq!(path, (0..=3).map(|y| Coord::new(0, y)).collect::<Vec<_>>());
        assert_eq!(trace_path(&found.links, START), Some(vec![START]));
        assert_eq!(trace_path(&found.links, Coord::new(4, 4)), None);
    }

    #[test]
    fn trace_path_gives_up_on_cycles() {
        let a = Coord::new(0, 0);
        let b = Coord::new(0, 1);
        let links: ParentLinks = [(a, Some(b)), (b, Some(a))].into_iter().collect();
        assert_eq!(trace_path(&links, a), None);
    }

    #[test]
    fn inventory_follows_visit_order() {
        let shrine = Coord::new(0, 1);
        let house = Coord::new(0, 2);
        let locations = LocationTable::from_records([
            LocationRecord::new(shrine, "Shrine")
                .with_reward_cost(item_set(["Key"]))
                .with_reward(item_set(["Crystal"])),
            LocationRecord::new(house, "Key house").with_reward(item_set(["Key"])),
        ]);
        let tiles = fixtures::tiles("0 0 0", &locations);

        let to_shrine = TilePath::new(&tiles, vec![START, shrine]).unwrap().unwrap();
        let shrine_to_house = TilePath::new(&tiles, vec![shrine, house]).unwrap().unwrap();
        let forward = to_shrine.concat(&shrine_to_house, &tiles).unwrap().unwrap();
        assert_eq!(forward.keys(), &[START, shrine, house]);
        assert_eq!(forward.inventory(), &item_set(["Key"]));

        let to_house = TilePath::new(&tiles, vec![START, shrine, house]).unwrap().unwrap();
        let back = TilePath::new(&tiles, vec![house, shrine]).unwrap().unwrap();
        let round = to_house.concat(&back, &tiles).unwrap().unwrap();
        assert_eq!(round.coords(), &[START, shrine, house, shrine]);
        assert_eq!(round.keys(), &[START, house, shrine]);
        assert_eq!(round.inventory(), &item_set(["Crystal", "Key"]));
    }

    #[test]
    fn concat_requires_shared_endpoint() {
        let tiles = fixtures::corridor_tiles();
        let a = TilePath::new(&tiles, vec![START, BOOTS_CAVE]).unwrap().unwrap();
        let b = TilePath::new(&tiles, vec![FLUTE_TOWN, Coord::new(0, 4)]).unwrap().unwrap();
        assert_eq!(a.concat(&b, &tiles).unwrap(), None);
        assert_eq!(TilePath::new(&tiles, Vec::new()).unwrap(), None);
    }

    #[test]
    fn ranks_order_by_value_then_length() {
        let low = PathRank { value: 10, length: 9 };
        let short = PathRank { value: 70, length: 6 };
        let long = PathRank { value: 70, length: 8 };
        assert!(long > short);
        assert!(short > low);
    }

    #[test]
    fn synthesize_ranks_single_hops() {
        let tiles = fixtures::corridor_tiles();
        let found = explore(&tiles, START, &everything()).unwrap();
        let keys = [START, BOOTS_CAVE, FLUTE_TOWN, PALACE];
        let routes = synthesize_routes(&tiles, &found.links, &keys, &fixtures::item_values()).unwrap();

        let ranks: Vec<_> = routes.iter().map(|r| (r.rank.value, r.rank.length)).collect();
        assert_eq!(ranks, vec![(50, 6), (20, 4), (10, 2)]);
        assert_eq!(routes[0].path.end(), PALACE);
    }

    #[test]
    fn unknown_item_value_fails_ranking() {
        let tiles = fixtures::corridor_tiles();
        let found = explore(&tiles, START, &everything()).unwrap();
        let values = ItemValues::new([("Boots", 1)]);
        let err = synthesize_routes(&tiles, &found.links, &[PALACE], &values).unwrap_err();
        assert_eq!(err, LogicError::UnknownItem { item: "Crystal".into() });
    }

    #[test]
    fn plan_routes_composes_hops_without_revisits() {
        let tiles = fixtures::corridor_tiles();
        let locations = fixtures::corridor_locations();
        let routes = plan_routes(
            &tiles,
            &locations,
            START,
            &everything(),
            &fixtures::item_values(),
            RouteOptions::default(),
        )
        .unwrap();

        // Three single hops plus the six ordered pairs of keys.
        assert_eq!(routes.len(), 9);
        let best = &routes[0];
        assert_eq!((best.rank.value, best.rank.length), (70, 8));
        assert_eq!(best.path.keys(), &[START, PALACE, FLUTE_TOWN]);
        for route in &routes {
            let keys = route.path.keys();
            for (i, k) in keys.iter().enumerate() {
                assert!(!keys[i + 1..].contains(k));
            }
        }
    }

    #[test]
    fn plan_routes_respects_inventory() {
        let tiles = fixtures::corridor_tiles();
        let locations = fixtures::corridor_locations();
        let routes = plan_routes(
            &tiles,
            &locations,
            START,
            &ItemSet::new(),
            &fixtures::item_values(),
            RouteOptions { max_hops: 3 },
        )
        .unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path.end(), BOOTS_CAVE);
    }
}

use log::{debug, info};
use std::collections::HashSet;

use super::locations::LocationTable;
use super::models::{is_satisfied, Coord, CoordSet, ItemSet, ParentLinks};
use super::tile_map::TileMap;
use crate::error::LogicResult;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exploration {
    pub start: Coord,
    pub order: Vec<Coord>,
    pub discovered: HashSet<Coord>,
    pub links: ParentLinks,
}

impl Exploration {
    pub fn contains(&self, coord: Coord) -> bool {
        self.discovered.contains(&coord)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

pub fn explore(tiles: &TileMap, start: Coord, inventory: &ItemSet) -> LogicResult<Exploration> {
    debug!("Running floodfill @ {} with {} items", start, inventory.len());
    tiles.get(start)?;

    let mut frontier: Vec<Coord> = vec![start];
    let mut seen: HashSet<Coord> = HashSet::from([start]);
    let mut links = ParentLinks::new();
    links.insert(start, None);
    let mut order = Vec::new();

    while let Some(coord) = frontier.pop() {
        order.push(coord);
        for &edge in &tiles.get(coord)?.edges {
            if seen.contains(&edge) {
                continue;
            }
            if is_satisfied(&tiles.get(edge)?.traversal_cost, inventory) {
                seen.insert(edge);
                frontier.push(edge);
                links.insert(edge, Some(coord));
            }
        }
    }

    debug!("Floodfill @ {} discovered {} tiles", start, order.len());
    Ok(Exploration { start, order, discovered: seen, links })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub exploration: Exploration,
    pub inventory: ItemSet,
    pub locations: CoordSet,
    /// Rewards whose reward cost is met; they join the inventory next chunk.
    pub reward_items: ItemSet,
    pub pending_rewards: ItemSet,
    pub cost_items: ItemSet,
    pub completed: CoordSet,
}

pub fn explore_region(
    tiles: &TileMap,
    locations: &LocationTable,
    start: Coord,
    inventory: &ItemSet,
    completed: &CoordSet,
) -> LogicResult<Region> {
    let exploration = explore(tiles, start, inventory)?;

    let mut region = Region {
        locations: CoordSet::new(),
        reward_items: ItemSet::new(),
        pending_rewards: ItemSet::new(),
        cost_items: ItemSet::new(),
        completed: CoordSet::new(),
        inventory: inventory.clone(),
        exploration,
    };

    let unique = locations
        .entrance_coordinates()
        .iter()
        .copied()
        .filter(|c| region.exploration.contains(*c) && !completed.contains(c));
    for location in unique {
        let node = tiles.get(location)?;
        let total_cost = node.total_cost();

        region.locations.insert(location);
        region.cost_items.extend(total_cost.iter().cloned());

        if is_satisfied(&node.reward_cost, inventory) {
            region.reward_items.extend(node.reward.iter().cloned());
        } else {
            region.pending_rewards.extend(node.reward.iter().cloned());
        }
        if is_satisfied(&total_cost, inventory) {
            debug!("Completed location {} `{}`", location, node.description);
            region.completed.insert(location);
        }
    }

    info!(
        "Region @ {}: {} tiles, {} new locations, {} completed, rewards {:?}",
        start,
        region.exploration.len(),
        region.locations.len(),
        region.completed.len(),
        region.reward_items
    );
    Ok(region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::logic::fixtures::{self, BOOTS_CAVE, FLUTE_TOWN, PALACE, START};
    use crate::commands::logic::locations::LocationRecord;
    use crate::commands::logic::models::item_set;
    use crate::error::LogicError;

    fn coords(list: &[(i32, i32)]) -> HashSet<Coord> {
        list.iter().copied().map(Coord::from).collect()
    }

    #[test]
    fn open_row_is_fully_discovered() {
        let tiles = fixtures::tiles("0 0 0", &LocationTable::default());
        let found = explore(&tiles, START, &ItemSet::new()).unwrap();
        assert_eq!(found.discovered, coords(&[(0, 0), (0, 1), (0, 2)]));
    }

    #[test]
    fn impassable_tile_cuts_the_row() {
        let tiles = fixtures::tiles("0 0 1", &LocationTable::default());
        let found = explore(&tiles, START, &ItemSet::new()).unwrap();
        assert_eq!(found.discovered, coords(&[(0, 0), (0, 1)]));
    }

    #[test]
    fn terrain_cost_gates_entry() {
        let tiles = fixtures::tiles("0 2 0", &LocationTable::default());
        let without = explore(&tiles, START, &ItemSet::new()).unwrap();
        assert_eq!(without.discovered, coords(&[(0, 0)]));
        let with = explore(&tiles, START, &item_set(["Boots"])).unwrap();
        assert_eq!(with.len(), 3);
    }

    #[test]
    fn start_cost_is_not_tested() {
        let tiles = fixtures::tiles("2 0", &LocationTable::default());
        let found = explore(&tiles, START, &ItemSet::new()).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found.links[&START], None);
        assert_eq!(found.links[&Coord::new(0, 1)], Some(START));
    }

    #[test]
    fn out_of_bounds_start_fails() {
        let tiles = fixtures::tiles("0 0", &LocationTable::default());
        let err = explore(&tiles, Coord::new(3, 3), &ItemSet::new()).unwrap_err();
        assert!(matches!(err, LogicError::OutOfBounds { .. }));
    }

    #[test]
    fn logical_exit_reaches_walled_off_tiles() {
        let locations = LocationTable::from_records([
            LocationRecord::new(Coord::new(0, 1), "Cave").with_exit(Coord::new(0, 4)),
        ]);
        let tiles = fixtures::tiles("0 0 1 1 0", &locations);
        let found = explore(&tiles, START, &ItemSet::new()).unwrap();
        assert!(found.contains(Coord::new(0, 4)));
        assert_eq!(found.links[&Coord::new(0, 4)], Some(Coord::new(0, 1)));
        assert!(!found.contains(Coord::new(0, 2)));
    }

    #[test]
    fn reward_waits_for_reward_cost() {
        let locations = LocationTable::from_records([
            LocationRecord::new(Coord::new(1, 1), "Shrine")
                .with_reward_cost(item_set(["Key"]))
                .with_reward(item_set(["Crystal"])),
        ]);
        let tiles = fixtures::tiles("0 0\n0 0", &locations);
        let done = CoordSet::new();

        let locked = explore_region(&tiles, &locations, START, &ItemSet::new(), &done).unwrap();
        assert!(locked.locations.contains(&Coord::new(1, 1)));
        assert!(!locked.reward_items.contains("Crystal"));
        assert!(locked.pending_rewards.contains("Crystal"));
        assert_eq!(locked.cost_items, item_set(["Key"]));
        assert!(locked.completed.is_empty());

        let open = explore_region(&tiles, &locations, START, &item_set(["Key"]), &done).unwrap();
        assert_eq!(open.reward_items, item_set(["Crystal"]));
        assert!(open.completed.contains(&Coord::new(1, 1)));
    }

    #[test]
    fn completed_locations_are_skipped() {
        let tiles = fixtures::corridor_tiles();
        let locations = fixtures::corridor_locations();
        let done: CoordSet = [BOOTS_CAVE].into_iter().collect();
        let region = explore_region(&tiles, &locations, START, &item_set(["Boots"]), &done).unwrap();
        assert_eq!(region.locations, [FLUTE_TOWN].into_iter().collect());
        assert_eq!(region.reward_items, item_set(["Flute"]));
        assert_eq!(region.cost_items, item_set(["Boots"]));
        assert!(!region.exploration.contains(PALACE));
        assert!(region.exploration.contains(Coord::new(0, 4)));
    }

    #[test]
    fn parent_chain_returns_to_start() {
        let tiles = fixtures::tiles("0 0 0\n0 1 0\n0 0 0", &LocationTable::default());
        let found = explore(&tiles, START, &ItemSet::new()).unwrap();
        assert_eq!(found.len(), 8);
        for &c in &found.discovered {
            let mut cur = c;
            let mut steps = 0;
            while let Some(Some(parent)) = found.links.get(&cur) {
                let node = tiles.get(*parent).unwrap();
                assert!(node.edges.contains(&cur));
                cur = *parent;
                steps += 1;
                assert!(steps <= found.len());
            }
            assert_eq!(cur, START);
        }
    }
}

use serde::Serialize;
use std::collections::BTreeMap;

use super::models::{Coord, CoordSet, ItemSet};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocationGraph {
    adjacency: BTreeMap<Coord, CoordSet>,
}

impl LocationGraph {
    pub fn add_node(&mut self, coord: Coord) {
        self.adjacency.entry(coord).or_default();
    }

    pub fn connect(&mut self, from: Coord, to: Coord) {
        self.add_node(to);
        let edges = self.adjacency.entry(from).or_default();
        if from != to {
            edges.insert(to);
        }
    }

    pub fn connect_all(&mut self, members: &CoordSet) {
        for &a in members {
            for &b in members {
                self.connect(a, b);
            }
        }
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.adjacency.contains_key(&coord)
    }

    pub fn neighbors(&self, coord: Coord) -> Option<&CoordSet> {
        self.adjacency.get(&coord)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Coord, &CoordSet)> {
        self.adjacency.iter()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|e| e.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Bottleneck {
    pub reward_location: Coord,
    pub cost_locations: CoordSet,
    pub items: ItemSet,
    pub chunk: usize,
}

/// Reward location -> the cost locations it unlocks, in discovery order.
/// Entries are written once and never touched again.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BottleneckMap {
    entries: Vec<Bottleneck>,
}

impl BottleneckMap {
    pub fn record(&mut self, entry: Bottleneck) -> bool {
        if self.get(entry.reward_location).is_some() {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn get(&self, reward_location: Coord) -> Option<&Bottleneck> {
        self.entries.iter().find(|e| e.reward_location == reward_location)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bottleneck> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TopoStep {
    pub location: Coord,
    pub unlocks: Option<CoordSet>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(list: &[(i32, i32)]) -> CoordSet {
        list.iter().copied().map(Coord::from).collect()
    }

    #[test]
    fn clique_has_no_self_loops() {
        let mut graph = LocationGraph::default();
        graph.connect_all(&set(&[(0, 1), (0, 2), (0, 3)]));
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.edge_count(), 6);
        assert_eq!(graph.neighbors(Coord::new(0, 1)), Some(&set(&[(0, 2), (0, 3)])));

        graph.connect(Coord::new(4, 4), Coord::new(4, 4));
        assert!(graph.contains(Coord::new(4, 4)));
        assert!(graph.neighbors(Coord::new(4, 4)).unwrap().is_empty());
    }

    #[test]
    fn first_bottleneck_write_wins_and_order_is_kept() {
        let mut map = BottleneckMap::default();
        let entry = |x: i32, chunk: usize| Bottleneck {
            reward_location: Coord::new(x, 0),
            cost_locations: set(&[(9, chunk as i32)]),
            items: ItemSet::new(),
            chunk,
        };
        assert!(map.record(entry(5, 1)));
        assert!(map.record(entry(1, 2)));
        assert!(!map.record(entry(5, 3)));

        let order: Vec<_> = map.iter().map(|e| e.reward_location.x).collect();
        assert_eq!(order, vec![5, 1]);
        assert_eq!(map.get(Coord::new(5, 0)).unwrap().chunk, 1);
    }
}

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use super::neighbor_policy::Offset;

/// Legacy "no item" marker used by older configuration files.
pub const NO_ITEM_MARKER: &str = "|";

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, Offset(dx, dy): Offset) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

pub type ItemSet = BTreeSet<String>;
pub type CoordSet = BTreeSet<Coord>;

pub type ParentLinks = HashMap<Coord, Option<Coord>>;

pub fn item_set<I, S>(items: I) -> ItemSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items
        .into_iter()
        .map(Into::into)
        .map(|s: String| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != NO_ITEM_MARKER)
        .collect()
}

pub fn is_satisfied(cost: &ItemSet, inventory: &ItemSet) -> bool {
    cost.is_subset(inventory)
}

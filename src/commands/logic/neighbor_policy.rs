use super::models::Coord;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Offset(pub i32, pub i32);

const CARDINAL: [Offset; 4] = [Offset(1, 0), Offset(-1, 0), Offset(0, 1), Offset(0, -1)];
const EIGHT_WAY: [Offset; 8] = [
    Offset(1, 0),
    Offset(-1, 0),
    Offset(0, 1),
    Offset(0, -1),
    Offset(1, 1),
    Offset(1, -1),
    Offset(-1, 1),
    Offset(-1, -1),
];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MovementPolicy {
    pub allow_diagonals: bool,
}

impl MovementPolicy {
    pub fn neighbor_offsets(&self) -> &'static [Offset] {
        if self.allow_diagonals {
            &EIGHT_WAY
        } else {
            &CARDINAL
        }
    }

    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> {
        self.neighbor_offsets().iter().map(move |&o| coord.offset(o))
    }
}

//! Components shared by every entity kind: grid position and display glyph.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Offset from a cell to one of its eight neighbours
pub type Delta = (i32, i32);

/// The 8-neighbourhood, in the order neighbour scans visit it.
/// Index into this table is what the movement roll selects.
pub const NEIGHBOUR_DELTAS: [Delta; 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Integer grid coordinate. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
}

impl Cell {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Apply a delta without wrapping. The result may lie outside the grid
    /// (negative, or past the last row/column).
    pub fn offset(self, delta: Delta) -> (i64, i64) {
        (
            i64::from(self.x) + i64::from(delta.0),
            i64::from(self.y) + i64::from(delta.1),
        )
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(u32, u32)> for Cell {
    fn from((x, y): (u32, u32)) -> Self {
        Self::new(x, y)
    }
}

/// Where an entity sits on the grid.
///
/// Only the spatial index inserts this component, so an entity without it
/// has not been placed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position(pub Cell);

/// Character drawn for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glyph(pub char);

impl Glyph {
    pub const PERSON: Self = Self('O');
    pub const FOOD: Self = Self('.');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_can_leave_grid() {
        let origin = Cell::new(0, 0);
        assert_eq!(origin.offset((-1, -1)), (-1, -1));
        assert_eq!(Cell::new(4, 7).offset((1, 0)), (5, 7));
    }

    #[test]
    fn test_deltas_exclude_origin() {
        assert!(!NEIGHBOUR_DELTAS.contains(&(0, 0)));
        for (i, a) in NEIGHBOUR_DELTAS.iter().enumerate() {
            assert!(NEIGHBOUR_DELTAS[i + 1..].iter().all(|b| b != a));
        }
    }
}

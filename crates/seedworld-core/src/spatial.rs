//! Spatial index - which entity occupies which cell.
//!
//! Every placement goes through [`SpatialIndex::place`], the single point that
//! enforces "at most one occupant per cell" and keeps the reserved cell empty.
//! The index stores tagged handles into the engine's `hecs` registry; the
//! entity data itself lives in the registry.

use hecs::Entity;
use std::collections::HashMap;
use thiserror::Error;

use crate::components::{Cell, Position, NEIGHBOUR_DELTAS};

/// Why a placement was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("cell {0} is reserved")]
    Forbidden(Cell),
    #[error("cell {0} is already occupied")]
    Occupied(Cell),
    #[error("cell {0} is outside the grid")]
    OutOfBounds(Cell),
    #[error("entity is not in the registry")]
    NoSuchEntity,
}

/// The two kinds of thing that can stand on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Person,
    Food,
}

/// A registry handle tagged with its kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occupant {
    Person(Entity),
    Food(Entity),
}

impl Occupant {
    pub fn new(kind: EntityKind, entity: Entity) -> Self {
        match kind {
            EntityKind::Person => Self::Person(entity),
            EntityKind::Food => Self::Food(entity),
        }
    }

    pub fn entity(self) -> Entity {
        match self {
            Self::Person(entity) | Self::Food(entity) => entity,
        }
    }

    pub fn kind(self) -> EntityKind {
        match self {
            Self::Person(_) => EntityKind::Person,
            Self::Food(_) => EntityKind::Food,
        }
    }

    pub fn is_edible(self) -> bool {
        matches!(self, Self::Food(_))
    }

    pub fn as_person(self) -> Option<Entity> {
        match self {
            Self::Person(entity) => Some(entity),
            Self::Food(_) => None,
        }
    }

    pub fn as_food(self) -> Option<Entity> {
        match self {
            Self::Food(entity) => Some(entity),
            Self::Person(_) => None,
        }
    }
}

/// Cell -> occupant map over a `cols` x `rows` grid.
///
/// The bottom-right cell is reserved: the terminal cannot draw into its last
/// column of the last line without scrolling.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    rows: u32,
    cols: u32,
    forbidden: Cell,
    cells: HashMap<Cell, Occupant>,
}

impl SpatialIndex {
    /// Empty index. Dimensions must be non-zero; the world validates them
    /// before building an index.
    pub fn new(rows: u32, cols: u32) -> Self {
        debug_assert!(rows > 0 && cols > 0, "grid dimensions must be non-zero");
        Self {
            rows,
            cols,
            forbidden: Cell::new(cols.saturating_sub(1), rows.saturating_sub(1)),
            cells: HashMap::new(),
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn forbidden_cell(&self) -> Cell {
        self.forbidden
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x < self.cols && cell.y < self.rows
    }

    pub fn is_forbidden(&self, cell: Cell) -> bool {
        cell == self.forbidden
    }

    pub fn occupied(&self, cell: Cell) -> bool {
        self.cells.contains_key(&cell)
    }

    /// In bounds, not reserved, and empty
    pub fn is_vacant(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.is_forbidden(cell) && !self.occupied(cell)
    }

    pub fn get(&self, cell: Cell) -> Option<Occupant> {
        self.cells.get(&cell).copied()
    }

    /// Record `occupant` at `cell` and set its `Position` component.
    pub fn place(
        &mut self,
        registry: &mut hecs::World,
        occupant: Occupant,
        cell: Cell,
    ) -> Result<(), PlacementError> {
        if !self.in_bounds(cell) {
            return Err(PlacementError::OutOfBounds(cell));
        }
        if self.is_forbidden(cell) {
            return Err(PlacementError::Forbidden(cell));
        }
        if self.occupied(cell) {
            return Err(PlacementError::Occupied(cell));
        }

        registry
            .insert_one(occupant.entity(), Position(cell))
            .map_err(|_| PlacementError::NoSuchEntity)?;
        self.cells.insert(cell, occupant);
        Ok(())
    }

    /// Remove whatever occupies `cell`
    pub fn vacate(&mut self, cell: Cell) -> Option<Occupant> {
        self.cells.remove(&cell)
    }

    /// Wrap an unbounded coordinate onto the grid (toroidal)
    pub fn wrap(&self, x: i64, y: i64) -> Cell {
        let x = x.rem_euclid(i64::from(self.cols));
        let y = y.rem_euclid(i64::from(self.rows));
        // rem_euclid keeps both inside [0, cols) / [0, rows)
        Cell::new(x as u32, y as u32)
    }

    /// The cells around `cell` that lie on the grid, in delta-table order.
    /// Neighbours that fall off the grid are skipped, not wrapped.
    pub fn adjacent_cells(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        NEIGHBOUR_DELTAS.iter().filter_map(move |&delta| {
            let (x, y) = cell.offset(delta);
            let neighbour = Cell::new(u32::try_from(x).ok()?, u32::try_from(y).ok()?);
            self.in_bounds(neighbour).then_some(neighbour)
        })
    }

    /// Occupants of the on-grid cells around `cell`, in delta-table order
    pub fn adjacent_occupants(&self, cell: Cell) -> impl Iterator<Item = (Cell, Occupant)> + '_ {
        self.adjacent_cells(cell)
            .filter_map(move |neighbour| self.get(neighbour).map(|occupant| (neighbour, occupant)))
    }

    /// The eight cells around `cell`, wrapped onto the grid, in delta-table order
    pub fn wrapped_neighbours(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        NEIGHBOUR_DELTAS.iter().map(move |&delta| {
            let (x, y) = cell.offset(delta);
            self.wrap(x, y)
        })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All (cell, occupant) pairs, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Occupant)> + '_ {
        self.cells.iter().map(|(&cell, &occupant)| (cell, occupant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Food;

    fn spawn_food(registry: &mut hecs::World) -> Occupant {
        Occupant::Food(registry.spawn((Food,)))
    }

    #[test]
    fn test_place_and_vacate() {
        let mut registry = hecs::World::new();
        let mut index = SpatialIndex::new(5, 5);
        let food = spawn_food(&mut registry);
        let cell = Cell::new(2, 3);

        assert!(!index.occupied(cell));
        index.place(&mut registry, food, cell).expect("free cell");
        assert!(index.occupied(cell));
        assert_eq!(index.get(cell), Some(food));

        let position = registry.get::<&Position>(food.entity()).expect("position set");
        assert_eq!(position.0, cell);
        drop(position);

        assert_eq!(index.vacate(cell), Some(food));
        assert!(!index.occupied(cell));
        assert_eq!(index.vacate(cell), None);
    }

    #[test]
    fn test_place_refuses_double_occupancy() {
        let mut registry = hecs::World::new();
        let mut index = SpatialIndex::new(5, 5);
        let first = spawn_food(&mut registry);
        let second = spawn_food(&mut registry);
        let cell = Cell::new(1, 1);

        index.place(&mut registry, first, cell).expect("free cell");
        assert_eq!(
            index.place(&mut registry, second, cell),
            Err(PlacementError::Occupied(cell))
        );
        assert_eq!(index.get(cell), Some(first));
        assert!(registry.get::<&Position>(second.entity()).is_err());
    }

    #[test]
    fn test_forbidden_and_out_of_bounds() {
        let mut registry = hecs::World::new();
        let mut index = SpatialIndex::new(4, 6);
        let food = spawn_food(&mut registry);

        assert_eq!(index.forbidden_cell(), Cell::new(5, 3));
        assert_eq!(
            index.place(&mut registry, food, Cell::new(5, 3)),
            Err(PlacementError::Forbidden(Cell::new(5, 3)))
        );
        assert_eq!(
            index.place(&mut registry, food, Cell::new(6, 0)),
            Err(PlacementError::OutOfBounds(Cell::new(6, 0)))
        );
        assert!(!index.is_vacant(Cell::new(5, 3)));
        assert!(index.is_empty());
    }

    #[test]
    fn test_place_despawned_entity() {
        let mut registry = hecs::World::new();
        let mut index = SpatialIndex::new(3, 3);
        let food = spawn_food(&mut registry);
        registry.despawn(food.entity()).expect("spawned");

        assert_eq!(
            index.place(&mut registry, food, Cell::new(0, 0)),
            Err(PlacementError::NoSuchEntity)
        );
        assert!(!index.occupied(Cell::new(0, 0)));
    }

    #[test]
    fn test_wrap_around() {
        let index = SpatialIndex::new(10, 10);
        assert_eq!(index.wrap(10 + 3, -1), Cell::new(3, 9));
        assert_eq!(index.wrap(-11, 20), Cell::new(9, 0));
        assert_eq!(index.wrap(4, 4), Cell::new(4, 4));
    }

    #[test]
    fn test_adjacent_occupants_skip_off_grid() {
        let mut registry = hecs::World::new();
        let mut index = SpatialIndex::new(5, 5);
        let near = spawn_food(&mut registry);
        let wrapped = spawn_food(&mut registry);
        index.place(&mut registry, near, Cell::new(1, 0)).expect("free");
        // would be a neighbour of (0, 0) only with wrapping
        index.place(&mut registry, wrapped, Cell::new(4, 0)).expect("free");

        let found: Vec<_> = index.adjacent_occupants(Cell::new(0, 0)).collect();
        assert_eq!(found, vec![(Cell::new(1, 0), near)]);
    }

    #[test]
    fn test_adjacent_cells_stop_at_edges() {
        let index = SpatialIndex::new(5, 5);
        let corner: Vec<_> = index.adjacent_cells(Cell::new(0, 0)).collect();
        assert_eq!(corner, vec![Cell::new(0, 1), Cell::new(1, 0), Cell::new(1, 1)]);

        let far: Vec<_> = index.adjacent_cells(Cell::new(4, 4)).collect();
        assert_eq!(far, vec![Cell::new(3, 3), Cell::new(3, 4), Cell::new(4, 3)]);
        assert_eq!(index.adjacent_cells(Cell::new(2, 2)).count(), 8);
    }

    #[test]
    fn test_wrapped_neighbours_order() {
        let index = SpatialIndex::new(5, 5);
        let cells: Vec<_> = index.wrapped_neighbours(Cell::new(0, 0)).collect();
        assert_eq!(cells.len(), 8);
        assert_eq!(cells[0], Cell::new(4, 4));
        assert_eq!(cells[7], Cell::new(1, 1));
    }

    #[test]
    fn test_occupant_tags() {
        let mut registry = hecs::World::new();
        let food = spawn_food(&mut registry);
        assert!(food.is_edible());
        assert_eq!(food.as_person(), None);
        assert_eq!(food.kind(), EntityKind::Food);

        let person = Occupant::new(EntityKind::Person, food.entity());
        assert!(!person.is_edible());
        assert_eq!(person.as_person(), Some(food.entity()));
    }
}

//! Reproduction helpers - partner discovery and where a child may be born.
//!
//! The engine resolves reproduction immediately, inside the act phase; these
//! functions only answer questions about the grid.

use hecs::Entity;

use crate::components::Cell;
use crate::spatial::SpatialIndex;

/// The person at `neighbour`, unless it is `parent` itself
pub fn partner_at(index: &SpatialIndex, parent: Entity, neighbour: Cell) -> Option<Entity> {
    index
        .get(neighbour)
        .and_then(|occupant| occupant.as_person())
        .filter(|&partner| partner != parent)
}

/// First free cell around `cell`, with wrapping
pub fn birth_cell(index: &SpatialIndex, cell: Cell) -> Option<Cell> {
    index
        .wrapped_neighbours(cell)
        .find(|&neighbour| index.is_vacant(neighbour))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Food;
    use crate::spatial::Occupant;

    #[test]
    fn test_partner_must_be_another_person() {
        let mut registry = hecs::World::new();
        let mut index = SpatialIndex::new(5, 5);
        let parent = registry.spawn((Food,));
        let partner = registry.spawn((Food,));
        let snack = registry.spawn((Food,));
        index
            .place(&mut registry, Occupant::Person(parent), Cell::new(2, 2))
            .expect("free");
        index
            .place(&mut registry, Occupant::Person(partner), Cell::new(3, 3))
            .expect("free");
        index
            .place(&mut registry, Occupant::Food(snack), Cell::new(1, 1))
            .expect("free");

        assert_eq!(partner_at(&index, parent, Cell::new(3, 3)), Some(partner));
        assert_eq!(partner_at(&index, parent, Cell::new(1, 1)), None);
        assert_eq!(partner_at(&index, parent, Cell::new(2, 2)), None);
        assert_eq!(partner_at(&index, parent, Cell::new(2, 3)), None);
    }

    #[test]
    fn test_birth_cell_wraps_and_skips_reserved() {
        let mut registry = hecs::World::new();
        let mut index = SpatialIndex::new(3, 3);
        // (2, 2) is reserved; it is the first neighbour of (0, 0) after wrapping
        assert_eq!(birth_cell(&index, Cell::new(0, 0)), Some(Cell::new(2, 0)));

        for cell in [(2, 0), (2, 1), (0, 2), (0, 1), (1, 2), (1, 0), (1, 1)] {
            let filler = registry.spawn((Food,));
            index
                .place(&mut registry, Occupant::Food(filler), Cell::from(cell))
                .expect("free");
        }
        assert_eq!(birth_cell(&index, Cell::new(0, 0)), None);
    }
}

//! Movement system - random steps, resolved in enqueue order

use hecs::World;
use rand::Rng;

use super::{id_of, MoveRequest};
use crate::components::{Delta, Position, NEIGHBOUR_DELTAS};
use crate::spatial::{Occupant, SpatialIndex};

/// Roll one of the eight neighbour deltas uniformly
pub fn choose_step(rng: &mut impl Rng) -> Delta {
    NEIGHBOUR_DELTAS[rng.gen_range(0..NEIGHBOUR_DELTAS.len())]
}

/// Apply move requests in the order they were queued. A request whose wrapped
/// destination is reserved or already taken is dropped, so earlier movers win
/// contested cells. Returns how many moves were applied.
pub fn resolve_moves(
    registry: &mut World,
    index: &mut SpatialIndex,
    requests: impl IntoIterator<Item = MoveRequest>,
) -> usize {
    let mut applied = 0;

    for MoveRequest {
        subject,
        destination,
    } in requests
    {
        let target = index.wrap(destination.0, destination.1);
        if index.is_forbidden(target) || index.occupied(target) {
            log::trace!("{} stays put: {} unavailable", id_of(registry, subject), target);
            continue;
        }

        let Ok(from) = registry.get::<&Position>(subject).map(|position| position.0) else {
            continue;
        };

        index.vacate(from);
        match index.place(registry, Occupant::Person(subject), target) {
            Ok(()) => {
                log::trace!("moved {} from {} to {}", id_of(registry, subject), from, target);
                applied += 1;
            }
            Err(err) => {
                // Target was checked above; put the subject back where it was.
                log::warn!("move of {} failed: {}", id_of(registry, subject), err);
                let _ = index.place(registry, Occupant::Person(subject), from);
            }
        }
    }

    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Cell, Person};
    use crate::config::SimConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spawn_person(registry: &mut World, index: &mut SpatialIndex, cell: Cell) -> hecs::Entity {
        let entity = registry.spawn((Person::new(&SimConfig::default()),));
        index
            .place(registry, Occupant::Person(entity), cell)
            .expect("free cell");
        entity
    }

    fn position(registry: &World, entity: hecs::Entity) -> Cell {
        registry.get::<&Position>(entity).expect("placed").0
    }

    #[test]
    fn test_step_is_seeded() {
        let mut a = StdRng::seed_from_u64(11);
        let mut b = StdRng::seed_from_u64(11);
        for _ in 0..32 {
            assert_eq!(choose_step(&mut a), choose_step(&mut b));
        }
    }

    #[test]
    fn test_move_wraps_destination() {
        let mut registry = World::new();
        let mut index = SpatialIndex::new(10, 10);
        let mover = spawn_person(&mut registry, &mut index, Cell::new(0, 0));

        let applied = resolve_moves(
            &mut registry,
            &mut index,
            [MoveRequest {
                subject: mover,
                destination: (-1, 0),
            }],
        );

        assert_eq!(applied, 1);
        assert_eq!(position(&registry, mover), Cell::new(9, 0));
        assert!(!index.occupied(Cell::new(0, 0)));
        assert_eq!(index.get(Cell::new(9, 0)), Some(Occupant::Person(mover)));
    }

    #[test]
    fn test_first_mover_wins_contested_cell() {
        let mut registry = World::new();
        let mut index = SpatialIndex::new(5, 5);
        let first = spawn_person(&mut registry, &mut index, Cell::new(1, 1));
        let second = spawn_person(&mut registry, &mut index, Cell::new(3, 1));

        let applied = resolve_moves(
            &mut registry,
            &mut index,
            [
                MoveRequest {
                    subject: first,
                    destination: (2, 1),
                },
                MoveRequest {
                    subject: second,
                    destination: (2, 1),
                },
            ],
        );

        assert_eq!(applied, 1);
        assert_eq!(position(&registry, first), Cell::new(2, 1));
        assert_eq!(position(&registry, second), Cell::new(3, 1));
    }

    #[test]
    fn test_move_into_reserved_cell_is_dropped() {
        let mut registry = World::new();
        let mut index = SpatialIndex::new(5, 5);
        let mover = spawn_person(&mut registry, &mut index, Cell::new(3, 3));

        let applied = resolve_moves(
            &mut registry,
            &mut index,
            [MoveRequest {
                subject: mover,
                destination: (4, 4),
            }],
        );

        assert_eq!(applied, 0);
        assert_eq!(position(&registry, mover), Cell::new(3, 3));
        assert!(!index.occupied(Cell::new(4, 4)));
    }
}

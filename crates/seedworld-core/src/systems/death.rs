//! Death sweep - removes people marked dead during the act phase.

use hecs::{Entity, World};

use super::id_of;
use crate::components::{Person, Position};
use crate::spatial::SpatialIndex;

/// Remove every dead person from the index, the roster and the registry.
/// Survivors keep their roster order. Returns how many were removed.
pub fn sweep_dead(
    registry: &mut World,
    index: &mut SpatialIndex,
    roster: &mut Vec<Entity>,
) -> usize {
    let (dead, living): (Vec<Entity>, Vec<Entity>) = roster.iter().copied().partition(|&entity| {
        registry
            .get::<&Person>(entity)
            .map_or(true, |person| !person.alive)
    });
    *roster = living;

    for &entity in &dead {
        if let Ok(cell) = registry.get::<&Position>(entity).map(|position| position.0) {
            index.vacate(cell);
        }
        log::trace!("removed {}", id_of(registry, entity));
        let _ = registry.despawn(entity);
    }

    dead.len()
}

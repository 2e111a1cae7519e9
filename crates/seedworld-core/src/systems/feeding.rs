//! Feeding system - hungry people claim adjacent food, meals resolve after movement

use hecs::{Entity, World};
use std::collections::HashSet;

use super::{id_of, EatRequest};
use crate::components::{Cell, Person, Position, Tick};
use crate::spatial::SpatialIndex;

/// First food item around `cell`, in neighbour-table order
pub fn find_food(index: &SpatialIndex, cell: Cell) -> Option<Entity> {
    index
        .adjacent_occupants(cell)
        .find_map(|(_, occupant)| occupant.as_food())
}

/// Apply eat requests in queue order. Each food item is eaten at most once and
/// each eater eats at most once; later requests naming either are dropped.
/// Eaten food leaves the index, the food roster and the registry.
///
/// Returns the number of meals served.
pub fn resolve_meals(
    registry: &mut World,
    index: &mut SpatialIndex,
    food_roster: &mut Vec<Entity>,
    requests: impl IntoIterator<Item = EatRequest>,
    tick: Tick,
) -> u32 {
    let mut fed: HashSet<Entity> = HashSet::new();
    let mut meals = 0;

    for EatRequest { food, eater } in requests {
        if fed.contains(&eater) || !registry.contains(food) {
            continue;
        }

        let Ok(cell) = registry.get::<&Position>(food).map(|position| position.0) else {
            continue;
        };
        let eater_id = id_of(registry, eater);
        let food_id = id_of(registry, food);

        index.vacate(cell);
        food_roster.retain(|&item| item != food);
        let _ = registry.despawn(food);

        if let Ok(mut person) = registry.get::<&mut Person>(eater) {
            person.feed(tick);
        }
        fed.insert(eater);
        meals += 1;
        log::debug!("{} ate {} at {}", eater_id, food_id, cell);
    }

    meals
}

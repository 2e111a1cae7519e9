//! Systems - the phases of a tick that operate on components

mod death;
mod feeding;
mod movement;
mod reproduction;
mod requests;

pub use death::*;
pub use feeding::*;
pub use movement::*;
pub use reproduction::*;
pub use requests::*;

use crate::ids::EntityId;

/// Id of a registry entity, for log lines
pub(crate) fn id_of(registry: &hecs::World, entity: hecs::Entity) -> EntityId {
    registry
        .get::<&EntityId>(entity)
        .map_or(EntityId::UNASSIGNED, |id| *id)
}

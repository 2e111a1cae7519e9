//! Observer hook - called once per tick after all mutation is done

use crate::engine::World;

/// Something that wants to see the world after every tick, typically a renderer.
///
/// Observers receive a shared borrow, so they can read but never mutate the
/// world. Implementations should return promptly; the simulation waits on them.
pub trait WorldObserver {
    fn on_world_update(&mut self, world: &World);
}

impl<F> WorldObserver for F
where
    F: FnMut(&World),
{
    fn on_world_update(&mut self, world: &World) {
        self(world)
    }
}

//! SeedWorld Core - Grid Artificial-Life Engine
//!
//! People wander a bounded 2-D grid, eat the food that spawns around them,
//! age, starve, and reproduce. Each world runs until its population is gone.
//!
//! # Architecture
//!
//! Entity data lives in a `hecs` registry; a [`spatial::SpatialIndex`] maps
//! each occupied cell to a tagged handle into that registry.
//!
//! A tick follows a fixed protocol:
//! 1. **Act** - every person ages, grows hungrier and queues intents
//!    (eat adjacent food, step to a random neighbour). Reproduction resolves
//!    immediately.
//! 2. **Resolve** - moves in queue order, then meals.
//! 3. **Sweep** - the dead leave the grid.
//! 4. **Spawn** - maybe one new food item.
//! 5. **Notify** - observers see the finished state.
//!
//! # Example
//!
//! ```rust,no_run
//! use seedworld_core::prelude::*;
//!
//! let config = SimConfig { rng_seed: Some(7), ..SimConfig::default() };
//! let mut world = World::seeded(24, 60, config).expect("valid config");
//!
//! while world.population() > 0 {
//!     world.update();
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod ids;
pub mod observer;
pub mod spatial;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::{ConfigError, SimConfig};
    pub use crate::engine::{Carryover, World, WorldError, WorldStats};
    pub use crate::ids::{EntityId, IdSource};
    pub use crate::observer::WorldObserver;
    pub use crate::spatial::{EntityKind, Occupant, PlacementError, SpatialIndex};
}

//! Component definitions stored in the engine's ECS registry.
//!
//! Components are pure data structs attached to entities.
//! The per-tick behaviour that reads them lives in systems and the engine.

mod common;
mod food;
mod people;

pub use common::*;
pub use food::*;
pub use people::*;

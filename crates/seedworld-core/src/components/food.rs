//! Food marker component

use serde::{Deserialize, Serialize};

/// Marker component identifying an entity as food.
///
/// Food has no per-tick behaviour and no death state; it leaves the world
/// only by being eaten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food;

//! Intents collected during the act phase and applied afterwards

use hecs::Entity;

/// A person wants to step to `destination`. The destination is unwrapped;
/// resolution wraps it onto the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub subject: Entity,
    pub destination: (i64, i64),
}

/// `eater` wants to eat `food`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EatRequest {
    pub food: Entity,
    pub eater: Entity,
}

/// The pending requests of the current tick, in enqueue order
#[derive(Debug, Default)]
pub struct TickRequests {
    pub moves: Vec<MoveRequest>,
    pub eats: Vec<EatRequest>,
}

impl TickRequests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_move(&mut self, subject: Entity, destination: (i64, i64)) {
        self.moves.push(MoveRequest {
            subject,
            destination,
        });
    }

    pub fn request_meal(&mut self, food: Entity, eater: Entity) {
        self.eats.push(EatRequest { food, eater });
    }

    pub fn clear(&mut self) {
        self.moves.clear();
        self.eats.clear();
    }
}

//! Person life-cycle state: age, hunger, and the mating gate.

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

/// World age, counted in ticks
pub type Tick = u64;

/// A person's mortal state plus the thresholds copied from config at birth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub alive: bool,
    /// Ticks since creation
    pub age: u32,
    /// Ticks since last meal
    pub hunger: u32,
    /// Tick of the last meal, `None` if the person never ate.
    pub last_ate: Option<Tick>,
    pub last_mated: Tick,
    pub hunger_threshold: u32,
    pub starvation_threshold: u32,
    pub max_age: u32,
    pub fertility: f64,
}

/// Result of advancing a person by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vitals {
    /// Age passed `max_age`; the person is already marked dead.
    DiedOfOldAge,
    Alive {
        /// Hunger above `hunger_threshold` - should look for food
        hungry: bool,
        /// Hunger above `starvation_threshold` - dies unless already fed
        starving: bool,
    },
}

impl Person {
    /// A newborn. Hunger starts halfway to starvation, so a fresh person
    /// has some time to find food before the clock runs out.
    pub fn new(config: &SimConfig) -> Self {
        Self {
            alive: true,
            age: 0,
            hunger: config.starvation_threshold / 2,
            last_ate: None,
            last_mated: 0,
            hunger_threshold: config.hunger_threshold,
            starvation_threshold: config.starvation_threshold,
            max_age: config.max_age,
            fertility: config.fertility,
        }
    }

    /// Age by one tick, then (if still alive) grow hungrier by one.
    pub fn advance(&mut self) -> Vitals {
        self.age += 1;
        if self.age > self.max_age {
            self.alive = false;
            return Vitals::DiedOfOldAge;
        }

        self.hunger += 1;
        Vitals::Alive {
            hungry: self.hunger > self.hunger_threshold,
            starving: self.hunger > self.starvation_threshold,
        }
    }

    /// Has eaten more recently than last mated
    pub fn can_mate(&self) -> bool {
        matches!(self.last_ate, Some(tick) if tick > self.last_mated)
    }

    pub fn feed(&mut self, tick: Tick) {
        self.hunger = 0;
        self.last_ate = Some(tick);
    }

    pub fn starve(&mut self) {
        self.alive = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SimConfig {
        SimConfig {
            max_age: 2,
            hunger_threshold: 3,
            starvation_threshold: 4,
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_newborn_state() {
        let person = Person::new(&config());
        assert!(person.alive);
        assert_eq!(person.age, 0);
        assert_eq!(person.hunger, 2);
        assert_eq!(person.last_ate, None);
        assert_eq!(person.last_mated, 0);
        assert!(!person.can_mate());
    }

    #[test]
    fn test_old_age_stops_before_hunger() {
        let mut person = Person::new(&config());
        assert!(matches!(person.advance(), Vitals::Alive { .. }));
        assert!(matches!(person.advance(), Vitals::Alive { .. }));
        let hunger = person.hunger;

        assert_eq!(person.advance(), Vitals::DiedOfOldAge);
        assert!(!person.alive);
        assert_eq!(person.age, 3);
        assert_eq!(person.hunger, hunger);
    }

    #[test]
    fn test_hunger_then_starvation() {
        let mut person = Person::new(&SimConfig {
            max_age: 100,
            ..config()
        });
        // hunger 2 -> 3: at threshold, not above
        assert_eq!(person.advance(), Vitals::Alive { hungry: false, starving: false });
        assert_eq!(person.advance(), Vitals::Alive { hungry: true, starving: false });
        assert_eq!(person.advance(), Vitals::Alive { hungry: true, starving: true });
    }

    #[test]
    fn test_mating_gate() {
        let mut person = Person::new(&config());
        person.feed(0);
        // ate at tick 0, last mated at tick 0: not strictly later
        assert!(!person.can_mate());

        person.feed(5);
        assert_eq!(person.hunger, 0);
        assert!(person.can_mate());

        person.last_mated = 5;
        assert!(!person.can_mate());
    }
}

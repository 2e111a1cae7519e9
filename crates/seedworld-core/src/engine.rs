//! World engine - seeding, the per-tick request protocol, and observer notification

use hecs::Entity;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::components::*;
use crate::config::{ConfigError, SimConfig};
use crate::ids::{EntityId, IdSource};
use crate::observer::WorldObserver;
use crate::spatial::{EntityKind, Occupant, PlacementError, SpatialIndex};
use crate::systems::*;

/// Random placement attempts per entity while seeding, at minimum
const MIN_PLACEMENT_ATTEMPTS: u64 = 1024;

/// Errors raised while building a world
#[derive(Debug, Error)]
pub enum WorldError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("placement failed: {0}")]
    Placement(#[from] PlacementError),
}

/// Lifetime counters of a world
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub births: u64,
    pub deaths_old_age: u64,
    pub deaths_starvation: u64,
    pub meals: u64,
    pub food_spawned: u64,
    pub peak_population: usize,
}

impl WorldStats {
    pub fn deaths(&self) -> u64 {
        self.deaths_old_age + self.deaths_starvation
    }
}

/// What survives a world: the RNG, the id source and the observers.
/// The bootstrap loop feeds these into the next world so randomness stays a
/// single stream and ids are never reused.
pub struct Carryover {
    pub rng: StdRng,
    pub ids: IdSource,
    pub observers: Vec<Box<dyn WorldObserver>>,
}

/// One simulation run on a `cols` x `rows` grid
pub struct World {
    id: EntityId,
    rows: u32,
    cols: u32,
    /// Ticks completed
    age: Tick,
    config: SimConfig,
    /// Component storage for people and food
    registry: hecs::World,
    index: SpatialIndex,
    /// Living people, in acting order
    persons: Vec<Entity>,
    /// Living food, in placement order
    food: Vec<Entity>,
    requests: TickRequests,
    stats: WorldStats,
    observers: Vec<Box<dyn WorldObserver>>,
    rng: StdRng,
    ids: IdSource,
}

impl World {
    /// Validate `config` against the grid, then seed the initial people and
    /// food at random free cells.
    pub fn new(
        rows: u32,
        cols: u32,
        config: SimConfig,
        rng: StdRng,
        mut ids: IdSource,
    ) -> Result<Self, WorldError> {
        config.validate_for_grid(rows, cols)?;

        let mut world = Self {
            id: ids.next_id(),
            rows,
            cols,
            age: 0,
            config,
            registry: hecs::World::new(),
            index: SpatialIndex::new(rows, cols),
            persons: Vec::new(),
            food: Vec::new(),
            requests: TickRequests::new(),
            stats: WorldStats::default(),
            observers: Vec::new(),
            rng,
            ids,
        };
        log::info!(
            "creating world {} size {}x{}, reserved cell {}",
            world.id,
            cols,
            rows,
            world.index.forbidden_cell()
        );

        world.seed(EntityKind::Person, world.config.initial_population)?;
        world.seed(EntityKind::Food, world.config.initial_food)?;
        world.stats.peak_population = world.population();
        Ok(world)
    }

    /// Fresh world with its own id source and an RNG seeded from
    /// `config.rng_seed` (or entropy when unset).
    pub fn seeded(rows: u32, cols: u32, config: SimConfig) -> Result<Self, WorldError> {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(rows, cols, config, rng, IdSource::new())
    }

    /// Build the next world from what the previous one left behind.
    /// Observers keep their registration order.
    pub fn from_carryover(
        rows: u32,
        cols: u32,
        config: SimConfig,
        carryover: Carryover,
    ) -> Result<Self, WorldError> {
        let Carryover {
            rng,
            ids,
            observers,
        } = carryover;
        let mut world = Self::new(rows, cols, config, rng, ids)?;
        for observer in observers {
            world.register_observer(observer);
        }
        Ok(world)
    }

    /// End this run, handing back the RNG, the id source and the observers
    pub fn retire(self) -> Carryover {
        Carryover {
            rng: self.rng,
            ids: self.ids,
            observers: self.observers,
        }
    }

    /// Observers are notified in registration order
    pub fn register_observer(&mut self, observer: Box<dyn WorldObserver>) {
        self.observers.push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Run one tick: act, resolve moves, resolve meals, sweep the dead,
    /// maybe spawn food, advance the clock, notify observers.
    pub fn update(&mut self) {
        self.requests.clear();

        self.act();

        let moves = std::mem::take(&mut self.requests.moves);
        resolve_moves(&mut self.registry, &mut self.index, moves);

        let eats = std::mem::take(&mut self.requests.eats);
        let meals = resolve_meals(
            &mut self.registry,
            &mut self.index,
            &mut self.food,
            eats,
            self.age,
        );
        self.stats.meals += u64::from(meals);

        sweep_dead(&mut self.registry, &mut self.index, &mut self.persons);

        self.spawn_food();

        self.age += 1;
        self.notify();
    }

    /// Act phase. Food has nothing to do. People act in roster order; the
    /// roster is snapshotted first, so children born this tick act next tick.
    fn act(&mut self) {
        let roster = self.persons.clone();
        for entity in roster {
            self.act_person(entity);
        }
    }

    fn act_person(&mut self, entity: Entity) {
        let Some(cell) = self.position_of(entity) else {
            return;
        };
        let vitals = match self.registry.get::<&mut Person>(entity) {
            Ok(mut person) if person.alive => person.advance(),
            _ => return,
        };
        let id = self.id_of(entity);

        let (hungry, starving) = match vitals {
            Vitals::DiedOfOldAge => {
                log::debug!("{} died of old age at {}", id, cell);
                self.stats.deaths_old_age += 1;
                return;
            }
            Vitals::Alive { hungry, starving } => (hungry, starving),
        };

        if hungry {
            if let Some(food) = find_food(&self.index, cell) {
                self.requests.request_meal(food, entity);
            }
        }

        if starving {
            if let Ok(mut person) = self.registry.get::<&mut Person>(entity) {
                person.starve();
            }
            log::debug!("{} died of starvation at {}", id, cell);
            self.stats.deaths_starvation += 1;
            return;
        }

        self.try_to_mate(entity, cell);

        let step = choose_step(&mut self.rng);
        self.requests.request_move(entity, cell.offset(step));
    }

    /// If the mating gate is open, roll fertility once per adjacent partner
    fn try_to_mate(&mut self, parent: Entity, cell: Cell) {
        let fertility = match self.registry.get::<&Person>(parent) {
            Ok(person) if person.can_mate() => person.fertility,
            _ => return,
        };

        let neighbours: Vec<Cell> = self.index.adjacent_cells(cell).collect();
        for neighbour in neighbours {
            // Looked up live: a child born earlier in this loop is a candidate
            let Some(partner) = partner_at(&self.index, parent, neighbour) else {
                continue;
            };
            if self.rng.gen_bool(fertility) {
                self.reproduce(parent, partner);
            }
        }
    }

    /// Place a child in the first free cell around `parent`, immediately.
    /// Refused once the living population reaches the cap or when no cell is free.
    fn reproduce(&mut self, parent: Entity, partner: Entity) {
        if self.living_population() >= self.config.max_population as usize {
            log::trace!("reproduction refused: population cap {}", self.config.max_population);
            return;
        }
        let Some(cell) = self.position_of(parent) else {
            return;
        };
        let Some(birth) = birth_cell(&self.index, cell) else {
            log::trace!("{} found no room for a child around {}", self.id_of(parent), cell);
            return;
        };

        let child = match self.introduce(EntityKind::Person, birth) {
            Ok(child) => child,
            Err(err) => {
                log::warn!("child placement at {} failed: {}", birth, err);
                return;
            }
        };

        for mate in [parent, partner] {
            if let Ok(mut person) = self.registry.get::<&mut Person>(mate) {
                person.last_mated = self.age;
            }
        }
        self.stats.births += 1;
        self.stats.peak_population = self.stats.peak_population.max(self.population());
        log::debug!(
            "{} mated with {} to create {} on tick {}",
            self.id_of(parent),
            self.id_of(partner),
            self.id_of(child),
            self.age
        );
    }

    /// With probability `food_chance`, try one random non-reserved cell.
    /// An occupied cell drops the spawn for this tick.
    fn spawn_food(&mut self) {
        if !self.rng.gen_bool(self.config.food_chance) {
            return;
        }
        let cell = self.random_open_cell();
        if self.index.occupied(cell) {
            log::trace!("food spawn skipped: {} occupied", cell);
            return;
        }
        match self.introduce(EntityKind::Food, cell) {
            Ok(_) => self.stats.food_spawned += 1,
            Err(err) => log::warn!("food spawn at {} failed: {}", cell, err),
        }
    }

    fn seed(&mut self, kind: EntityKind, count: u32) -> Result<(), WorldError> {
        let capacity = u64::from(self.rows) * u64::from(self.cols) - 1;
        let attempts = MIN_PLACEMENT_ATTEMPTS.max(capacity * 32);

        for _ in 0..count {
            let Some(cell) = self.sample_vacant_cell(attempts) else {
                return Err(ConfigError::Saturated {
                    required: u64::from(self.config.initial_population)
                        + u64::from(self.config.initial_food),
                    capacity,
                }
                .into());
            };
            self.introduce(kind, cell)?;
        }
        Ok(())
    }

    fn sample_vacant_cell(&mut self, attempts: u64) -> Option<Cell> {
        for _ in 0..attempts {
            let cell = self.random_open_cell();
            if self.index.is_vacant(cell) {
                return Some(cell);
            }
        }
        None
    }

    /// Spawn a new entity with a fresh id and place it at `cell`
    fn introduce(&mut self, kind: EntityKind, cell: Cell) -> Result<Entity, PlacementError> {
        let id = self.ids.next_id();
        let entity = match kind {
            EntityKind::Person => {
                self.registry
                    .spawn((id, Glyph::PERSON, Person::new(&self.config)))
            }
            EntityKind::Food => self.registry.spawn((id, Glyph::FOOD, Food)),
        };

        if let Err(err) = self
            .index
            .place(&mut self.registry, Occupant::new(kind, entity), cell)
        {
            let _ = self.registry.despawn(entity);
            return Err(err);
        }

        match kind {
            EntityKind::Person => self.persons.push(entity),
            EntityKind::Food => self.food.push(entity),
        }
        log::debug!("placed {:?} {} at {}", kind, id, cell);
        Ok(entity)
    }

    /// Uniform over every cell except the reserved one, which is last in
    /// row-major order
    fn random_open_cell(&mut self) -> Cell {
        let cols = u64::from(self.cols);
        let open = u64::from(self.rows) * cols - 1;
        let n = self.rng.gen_range(0..open);
        Cell::new((n % cols) as u32, (n / cols) as u32)
    }

    /// People not yet marked dead; the dead stay listed until the sweep
    fn living_population(&self) -> usize {
        self.persons
            .iter()
            .filter(|&&entity| {
                self.registry
                    .get::<&Person>(entity)
                    .map_or(false, |person| person.alive)
            })
            .count()
    }

    fn notify(&mut self) {
        let mut observers = std::mem::take(&mut self.observers);
        for observer in observers.iter_mut() {
            observer.on_world_update(self);
        }
        self.observers = observers;
    }

    /// Place a new person at `cell`. Intended for scripted scenarios.
    pub fn spawn_person_at(&mut self, cell: Cell) -> Result<Entity, PlacementError> {
        let entity = self.introduce(EntityKind::Person, cell)?;
        self.stats.peak_population = self.stats.peak_population.max(self.population());
        Ok(entity)
    }

    /// Place a new food item at `cell`. Intended for scripted scenarios.
    pub fn spawn_food_at(&mut self, cell: Cell) -> Result<Entity, PlacementError> {
        self.introduce(EntityKind::Food, cell)
    }

    // ── Read-only view ──────────────────────────────────────────────────

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Ticks completed
    pub fn age(&self) -> Tick {
        self.age
    }

    /// Number of people currently in the world
    pub fn population(&self) -> usize {
        self.persons.len()
    }

    pub fn food_count(&self) -> usize {
        self.food.len()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn stats(&self) -> WorldStats {
        self.stats
    }

    pub fn forbidden_cell(&self) -> Cell {
        self.index.forbidden_cell()
    }

    /// (cell, glyph) of every living person, in acting order
    pub fn persons(&self) -> impl Iterator<Item = (Cell, char)> + '_ {
        self.persons.iter().filter_map(|&entity| self.drawable(entity))
    }

    /// (cell, glyph) of every food item, in placement order
    pub fn food(&self) -> impl Iterator<Item = (Cell, char)> + '_ {
        self.food.iter().filter_map(|&entity| self.drawable(entity))
    }

    pub fn person_entities(&self) -> &[Entity] {
        &self.persons
    }

    pub fn food_entities(&self) -> &[Entity] {
        &self.food
    }

    /// Copy of a person's life-cycle state
    pub fn person(&self, entity: Entity) -> Option<Person> {
        self.registry
            .get::<&Person>(entity)
            .ok()
            .map(|person| (*person).clone())
    }

    pub fn id_of(&self, entity: Entity) -> EntityId {
        id_of(&self.registry, entity)
    }

    /// `None` until the entity has been placed
    pub fn position_of(&self, entity: Entity) -> Option<Cell> {
        self.registry
            .get::<&Position>(entity)
            .ok()
            .map(|position| position.0)
    }

    pub fn occupant_at(&self, cell: Cell) -> Option<Occupant> {
        self.index.get(cell)
    }

    fn drawable(&self, entity: Entity) -> Option<(Cell, char)> {
        let cell = self.position_of(entity)?;
        let glyph = self.registry.get::<&Glyph>(entity).ok()?.0;
        Some((cell, glyph))
    }

    /// Check that the index and the rosters agree with each other and with
    /// the occupancy rules. Returns one message per violation.
    pub fn consistency_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        let forbidden = self.index.forbidden_cell();

        if self.index.occupied(forbidden) {
            violations.push(format!("reserved cell {} is occupied", forbidden));
        }

        let rosters = self
            .persons
            .iter()
            .map(|&entity| Occupant::Person(entity))
            .chain(self.food.iter().map(|&entity| Occupant::Food(entity)));
        let mut listed = 0;
        for occupant in rosters {
            listed += 1;
            let id = self.id_of(occupant.entity());
            match self.position_of(occupant.entity()) {
                Some(cell) if self.index.get(cell) == Some(occupant) => {}
                Some(cell) => violations.push(format!(
                    "{} claims {} but the index holds {:?}",
                    id,
                    cell,
                    self.index.get(cell)
                )),
                None => violations.push(format!("{} is listed but has no position", id)),
            }
        }

        for (cell, occupant) in self.index.iter() {
            let listed_in_roster = match occupant {
                Occupant::Person(entity) => self.persons.contains(&entity),
                Occupant::Food(entity) => self.food.contains(&entity),
            };
            if !listed_in_roster {
                violations.push(format!("index holds unlisted {:?} at {}", occupant, cell));
            }
            if !self.index.in_bounds(cell) {
                violations.push(format!("index holds {:?} off the grid at {}", occupant, cell));
            }
        }

        if listed != self.index.len() {
            violations.push(format!(
                "rosters list {} entities but the index holds {}",
                listed,
                self.index.len()
            ));
        }

        violations
    }
}

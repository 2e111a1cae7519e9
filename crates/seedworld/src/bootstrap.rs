//! Run loop: create a world, tick it until everyone is dead, start over.

use std::thread;

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use seedworld_core::prelude::*;
use tracing::info;

/// Outcome of one world, logged when it ends
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub world: EntityId,
    pub ticks: u64,
    pub peak_population: usize,
    pub births: u64,
    pub deaths: u64,
    /// False when the tick limit cut the run short
    pub extinct: bool,
}

impl RunSummary {
    fn of(world: &World) -> Self {
        let stats = world.stats();
        Self {
            world: world.id(),
            ticks: world.age(),
            peak_population: stats.peak_population,
            births: stats.births,
            deaths: stats.deaths(),
            extinct: world.population() == 0,
        }
    }
}

pub struct Bootstrap {
    pub rows: u32,
    pub cols: u32,
    pub config: SimConfig,
    /// Stop after this many worlds; `None` restarts forever
    pub max_runs: Option<u64>,
    /// End a world after this many ticks even if people remain
    pub max_ticks: Option<u64>,
}

impl Bootstrap {
    /// Run worlds back to back. The RNG, the id source and the observers
    /// carry over from each world to the next.
    pub fn run(&self, observers: Vec<Box<dyn WorldObserver>>) -> Result<Vec<RunSummary>> {
        if self.config.initial_population == 0 && self.max_runs.is_none() {
            bail!("initial_population is 0: every world would end before its first tick");
        }

        let rng = match self.config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut carryover = Carryover {
            rng,
            ids: IdSource::new(),
            observers,
        };

        let mut summaries = Vec::new();
        let mut run: u64 = 0;
        while self.max_runs.map_or(true, |max| run < max) {
            let mut world =
                World::from_carryover(self.rows, self.cols, self.config.clone(), carryover)
                    .context("failed to create world")?;
            info!(
                world = %world.id(),
                run,
                population = world.population(),
                food = world.food_count(),
                "world started"
            );

            while world.population() > 0 && !self.tick_limit_reached(world.age()) {
                world.update();
                if let Some(delay) = self.config.tick_delay() {
                    thread::sleep(delay);
                }
            }

            let summary = RunSummary::of(&world);
            info!(
                world = %summary.world,
                age = summary.ticks,
                peak_population = summary.peak_population,
                births = summary.births,
                deaths = summary.deaths,
                extinct = summary.extinct,
                "world ended"
            );
            summaries.push(summary);

            carryover = world.retire();
            run += 1;
        }

        Ok(summaries)
    }

    fn tick_limit_reached(&self, age: u64) -> bool {
        self.max_ticks.is_some_and(|max| age >= max)
    }
}

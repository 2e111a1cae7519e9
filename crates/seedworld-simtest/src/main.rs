//! SeedWorld Headless Simulation Harness
//!
//! Runs long seeded simulations in-process and checks the engine's
//! invariants after every tick. No terminal, no rendering.
//!
//! Usage:
//!   cargo run -p seedworld-simtest
//!   cargo run -p seedworld-simtest -- --verbose

use seedworld_core::prelude::*;
use std::collections::HashSet;

// ── Sample config (same JSON the runner accepts via --config) ───────────
const SAMPLE_CONFIG_JSON: &str = include_str!("../../../data/seedworld.json");

const SEEDS: std::ops::Range<u64> = 0..8;
const TICK_LIMIT: u64 = 2_000;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== SeedWorld Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Config loading and validation
    results.extend(validate_config(verbose));

    // 2. Long seeded runs with per-tick invariant checks
    results.extend(validate_long_runs(verbose));

    // 3. Same seed, same history
    results.extend(validate_determinism(verbose));

    // 4. Population cap under heavy breeding
    results.extend(validate_population_cap(verbose));

    // 5. Toroidal movement at the grid edge
    results.extend(validate_wraparound(verbose));

    // 6. Restarts keep ids unique
    results.extend(validate_restarts(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn seeded(seed: u64) -> SimConfig {
    SimConfig {
        rng_seed: Some(seed),
        tick_delay_ms: 0,
        ..SimConfig::default()
    }
}

/// Everything a finished tick must satisfy; empty when the world is sound
fn tick_violations(world: &World) -> Vec<String> {
    let mut problems = world.consistency_violations();

    let forbidden = world.forbidden_cell();
    let mut seen = HashSet::new();
    for (cell, _) in world.persons().chain(world.food()) {
        if cell == forbidden {
            problems.push(format!("tick {}: entity on reserved cell {}", world.age(), cell));
        }
        if !seen.insert(cell) {
            problems.push(format!("tick {}: cell {} held twice", world.age(), cell));
        }
    }

    if world.population() > world.config().max_population as usize {
        problems.push(format!(
            "tick {}: population {} over cap {}",
            world.age(),
            world.population(),
            world.config().max_population
        ));
    }

    let stats = world.stats();
    let expected = u64::from(world.config().initial_population) + stats.births - stats.deaths();
    if expected != world.population() as u64 {
        problems.push(format!(
            "tick {}: census {} but births/deaths imply {}",
            world.age(),
            world.population(),
            expected
        ));
    }

    problems
}

// ── 1. Config ───────────────────────────────────────────────────────────

fn validate_config(_verbose: bool) -> Vec<TestResult> {
    println!("--- Config ---");
    let mut results = Vec::new();

    let sample = match SimConfig::from_json_str(SAMPLE_CONFIG_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "config_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "config_sample_matches_defaults".into(),
        passed: sample == SimConfig::default(),
        detail: format!("{:?}", sample),
    });

    results.push(TestResult {
        name: "config_defaults_valid".into(),
        passed: SimConfig::default().validate().is_ok(),
        detail: "default parameters pass validation".into(),
    });

    let saturated = SimConfig {
        initial_population: 10,
        initial_food: 20,
        ..SimConfig::default()
    }
    .validate_for_grid(5, 6);
    results.push(TestResult {
        name: "config_saturation_rejected".into(),
        passed: matches!(
            saturated,
            Err(ConfigError::Saturated {
                required: 30,
                capacity: 29
            })
        ),
        detail: format!("{:?}", saturated),
    });

    let bad_json = SimConfig::from_json_str(r#"{ "fertility": "high" }"#);
    results.push(TestResult {
        name: "config_bad_type_rejected".into(),
        passed: matches!(bad_json, Err(ConfigError::Parse(_))),
        detail: "string fertility is a parse error".into(),
    });

    results
}

// ── 2. Long Runs ────────────────────────────────────────────────────────

fn validate_long_runs(verbose: bool) -> Vec<TestResult> {
    println!("--- Long Runs ---");
    let mut results = Vec::new();

    for seed in SEEDS {
        let mut world = match World::seeded(30, 80, seeded(seed)) {
            Ok(w) => w,
            Err(e) => {
                results.push(TestResult {
                    name: format!("run_seed_{}", seed),
                    passed: false,
                    detail: format!("world creation failed: {}", e),
                });
                continue;
            }
        };

        let mut problems = Vec::new();
        while world.population() > 0 && world.age() < TICK_LIMIT {
            world.update();
            problems.extend(tick_violations(&world));
            if !problems.is_empty() {
                break;
            }
        }

        let stats = world.stats();
        if verbose {
            println!(
                "    seed {}: {} ticks, peak {}, births {}, deaths {} (age {}, starvation {})",
                seed,
                world.age(),
                stats.peak_population,
                stats.births,
                stats.deaths(),
                stats.deaths_old_age,
                stats.deaths_starvation
            );
        }
        results.push(TestResult {
            name: format!("run_seed_{}", seed),
            passed: problems.is_empty(),
            detail: if problems.is_empty() {
                format!("{} ticks clean, peak {}", world.age(), stats.peak_population)
            } else {
                problems.join("; ")
            },
        });
    }

    results
}

// ── 3. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(_verbose: bool) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let mut results = Vec::new();

    let (Ok(mut a), Ok(mut b)) = (
        World::seeded(24, 60, seeded(42)),
        World::seeded(24, 60, seeded(42)),
    ) else {
        results.push(TestResult {
            name: "determinism_setup".into(),
            passed: false,
            detail: "world creation failed".into(),
        });
        return results;
    };

    let mut diverged_at = None;
    for _ in 0..500 {
        a.update();
        b.update();
        let same = a.persons().eq(b.persons()) && a.food().eq(b.food());
        if !same {
            diverged_at = Some(a.age());
            break;
        }
    }

    results.push(TestResult {
        name: "determinism_same_seed".into(),
        passed: diverged_at.is_none(),
        detail: match diverged_at {
            None => format!("identical for {} ticks", a.age()),
            Some(tick) => format!("diverged at tick {}", tick),
        },
    });

    results
}

// ── 4. Population Cap ───────────────────────────────────────────────────

fn validate_population_cap(_verbose: bool) -> Vec<TestResult> {
    println!("--- Population Cap ---");
    let mut results = Vec::new();

    let config = SimConfig {
        initial_population: 20,
        initial_food: 100,
        max_population: 30,
        fertility: 1.0,
        food_chance: 1.0,
        hunger_threshold: 0,
        ..seeded(7)
    };
    let mut world = match World::seeded(20, 30, config) {
        Ok(w) => w,
        Err(e) => {
            results.push(TestResult {
                name: "cap_setup".into(),
                passed: false,
                detail: format!("world creation failed: {}", e),
            });
            return results;
        }
    };

    let mut peak = world.population();
    while world.population() > 0 && world.age() < 500 {
        world.update();
        peak = peak.max(world.population());
    }

    results.push(TestResult {
        name: "cap_never_exceeded".into(),
        passed: peak <= 30,
        detail: format!("peak {} against cap 30", peak),
    });
    results.push(TestResult {
        name: "cap_births_happen".into(),
        passed: world.stats().births > 0,
        detail: format!("{} births", world.stats().births),
    });

    results
}

// ── 5. Wrap-around ──────────────────────────────────────────────────────

fn validate_wraparound(_verbose: bool) -> Vec<TestResult> {
    println!("--- Wrap-around ---");
    let mut results = Vec::new();

    let calm = SimConfig {
        initial_population: 0,
        initial_food: 0,
        fertility: 0.0,
        food_chance: 0.0,
        ..seeded(0)
    };
    let origin = Cell::new(0, 0);
    let index = SpatialIndex::new(5, 5);
    let mut allowed: HashSet<Cell> = index.wrapped_neighbours(origin).collect();
    allowed.remove(&index.forbidden_cell());
    allowed.insert(origin);

    let mut wrapped = 0;
    let mut strays = Vec::new();
    for seed in 0..64 {
        let config = SimConfig {
            rng_seed: Some(seed),
            ..calm.clone()
        };
        let Ok(mut world) = World::seeded(5, 5, config) else {
            strays.push(format!("seed {}: world creation failed", seed));
            continue;
        };
        let Ok(person) = world.spawn_person_at(origin) else {
            strays.push(format!("seed {}: origin occupied", seed));
            continue;
        };
        world.update();

        match world.position_of(person) {
            Some(cell) if allowed.contains(&cell) => {
                if cell.x == 4 || cell.y == 4 {
                    wrapped += 1;
                }
            }
            other => strays.push(format!("seed {}: ended at {:?}", seed, other)),
        }
    }

    results.push(TestResult {
        name: "wrap_moves_stay_adjacent".into(),
        passed: strays.is_empty(),
        detail: if strays.is_empty() {
            "every step landed on a wrapped neighbour".into()
        } else {
            strays.join("; ")
        },
    });
    results.push(TestResult {
        name: "wrap_crosses_edge".into(),
        passed: wrapped > 0,
        detail: format!("{} of 64 steps crossed an edge", wrapped),
    });

    results
}

// ── 6. Restarts ─────────────────────────────────────────────────────────

fn validate_restarts(_verbose: bool) -> Vec<TestResult> {
    println!("--- Restarts ---");
    let mut results = Vec::new();

    let config = SimConfig {
        max_age: 20,
        fertility: 0.0,
        ..seeded(3)
    };

    let mut world_ids = Vec::new();
    let mut person_ids = HashSet::new();
    let mut duplicate = None;
    let mut carryover = None;

    for _ in 0..5 {
        let next = match carryover.take() {
            None => World::seeded(12, 12, config.clone()),
            Some(c) => World::from_carryover(12, 12, config.clone(), c),
        };
        let mut world = match next {
            Ok(w) => w,
            Err(e) => {
                results.push(TestResult {
                    name: "restart_setup".into(),
                    passed: false,
                    detail: format!("world creation failed: {}", e),
                });
                return results;
            }
        };
        world_ids.push(world.id());
        for &entity in world.person_entities() {
            let id = world.id_of(entity);
            if !person_ids.insert(id) && duplicate.is_none() {
                duplicate = Some(id);
            }
        }
        while world.population() > 0 {
            world.update();
        }
        carryover = Some(world.retire());
    }

    results.push(TestResult {
        name: "restart_world_ids_increase".into(),
        passed: world_ids.windows(2).all(|w| w[0] < w[1]),
        detail: format!("{:?}", world_ids),
    });
    results.push(TestResult {
        name: "restart_person_ids_unique".into(),
        passed: duplicate.is_none(),
        detail: match duplicate {
            None => format!("{} founders, all distinct", person_ids.len()),
            Some(id) => format!("id {} issued twice", id),
        },
    });

    results
}

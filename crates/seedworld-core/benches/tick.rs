use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use seedworld_core::prelude::*;

fn bench_world_updates(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_update");
    let steps: usize = std::env::var("SW_BENCH_STEPS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(64);

    for &(rows, cols, population) in &[(24u32, 60u32, 10u32), (60, 200, 150), (120, 400, 600)] {
        group.bench_function(format!("steps{steps}_{cols}x{rows}_pop{population}"), |b| {
            b.iter_batched(
                || {
                    let config = SimConfig {
                        initial_population: population,
                        initial_food: population * 2,
                        max_population: population * 4,
                        tick_delay_ms: 0,
                        rng_seed: Some(0xBEEF),
                        ..SimConfig::default()
                    };
                    World::seeded(rows, cols, config).expect("valid bench world")
                },
                |mut world| {
                    for _ in 0..steps {
                        world.update();
                    }
                    world
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_world_updates);
criterion_main!(benches);

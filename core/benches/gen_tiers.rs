use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use minesweeper_core::*;

const SEED: u64 = 0x5eed;

fn tiers() -> Vec<Difficulty> {
    let mut tiers = Difficulty::catalog();
    if let Ok(huge) = Difficulty::custom(700, 99, 99) {
        tiers.push(huge);
    }
    tiers
}

fn bench_random(c: &mut Criterion) {
    for (zone, label) in [(SafeZone::Single, "safe_pos"), (SafeZone::Area, "safe_area")] {
        let mut group = c.benchmark_group(format!("gen_{label}"));
        for difficulty in tiers() {
            let start = Pos::new(difficulty.rows() / 2, difficulty.cols() / 2);
            let mut placer = RandomMinePlacer::seeded(SEED);
            group.bench_function(difficulty.name(), |b| {
                b.iter(|| black_box(Game::generate(difficulty.clone(), start, zone, &mut placer)))
            });
        }
        group.finish();
    }
}

fn bench_solvable(c: &mut Criterion) {
    let mut group = c.benchmark_group("gen_solvable");
    group.sample_size(10);
    for difficulty in tiers() {
        let start = Pos::new(difficulty.rows() / 2, difficulty.cols() / 2);
        let mut placer = RandomMinePlacer::seeded(SEED);
        group.bench_function(difficulty.name(), |b| {
            b.iter(|| {
                let generated = generate_solvable(
                    difficulty.clone(),
                    start,
                    DEFAULT_SOLVABLE_ITERATIONS,
                    &mut placer,
                );
                black_box(generated.is_ok())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_random, bench_solvable);
criterion_main!(benches);

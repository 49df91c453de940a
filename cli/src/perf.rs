use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use minesweeper_core::{Difficulty, Game, Pos};

const MEASUREMENTS_PER_LINE: usize = 10;

#[derive(clap::Args, Debug)]
pub struct PerfArgs {
    /// Iterations per measurement
    #[arg(short, long, default_value_t = 1_000)]
    iterations: usize,
    /// Simultaneous worker threads
    #[arg(short, long, default_value_t = 10)]
    workers: usize,
    /// Print every measurement in addition to the summary
    #[arg(long)]
    print_all: bool,
}

pub fn run(args: &PerfArgs) -> anyhow::Result<()> {
    let workers = args.workers.max(1);
    println!("Settings: threads={workers}, iterations={}\n", args.iterations);

    let difficulty = Difficulty::custom(700, 99, 99)?;
    let start = Pos::new(50, 50);

    measure_loop("safe pos", args, || {
        Game::with_safe_pos(difficulty.clone(), start);
    });
    measure_loop("safe area", args, || {
        Game::with_safe_area(difficulty.clone(), start);
    });
    measure_loop("solvable", args, || {
        Game::solvable(difficulty.clone(), start);
    });
    Ok(())
}

fn measure_loop(name: &str, args: &PerfArgs, task: impl Fn() + Sync) {
    println!("Measuring {name} using {} iterations", args.iterations);

    let next = AtomicUsize::new(0);
    let measurements: Vec<Duration> = thread::scope(|scope| {
        let handles: Vec<_> = (0..args.workers.max(1))
            .map(|_| {
                scope.spawn(|| {
                    let mut taken = Vec::new();
                    while next.fetch_add(1, Ordering::Relaxed) < args.iterations {
                        let started = Instant::now();
                        task();
                        taken.push(started.elapsed());
                    }
                    taken
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap_or_default())
            .collect()
    });

    let Some(stats) = Stats::of(&measurements) else {
        println!("Nothing measured for {name}\n");
        return;
    };
    println!("Name: {name}");
    println!("Max: {}", micros(stats.max));
    println!("Min: {}", micros(stats.min));
    println!("Average: {}", micros(stats.average));
    if args.print_all {
        println!("Measurements:");
        for line in measurements.chunks(MEASUREMENTS_PER_LINE) {
            let line: Vec<_> = line.iter().copied().map(micros).collect();
            println!("{}", line.join(" "));
        }
    }
    println!();
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Stats {
    max: Duration,
    min: Duration,
    average: Duration,
}

impl Stats {
    fn of(measurements: &[Duration]) -> Option<Self> {
        let max = measurements.iter().max().copied()?;
        let min = measurements.iter().min().copied()?;
        let total: Duration = measurements.iter().sum();
        let count = u32::try_from(measurements.len()).unwrap_or(u32::MAX);
        Some(Self {
            max,
            min,
            average: total / count,
        })
    }
}

fn micros(duration: Duration) -> String {
    format!("{}µs", duration.as_micros())
}

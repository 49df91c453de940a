use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand, ValueEnum};
use minesweeper_core::{
    AutoPlay, AutoPlayEvent, CellCount, Coord, DEFAULT_SOLVABLE_ITERATIONS, Difficulty, Field,
    FieldContent, Game, GameError, Pos, RandomMinePlacer, SafeZone, Save, Solver, Status,
    generate_solvable, lock_game, share,
};

mod perf;

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper boards, solver and save files")]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a board and write it to a save file
    New(NewArgs),
    /// Let the solver play a saved board
    Solve {
        save: PathBuf,
        /// First field to check, as x,y
        #[arg(short, long, value_parser = parse_pos, default_value = "0,0")]
        start: Pos,
        /// Pause between reveals in milliseconds
        #[arg(short, long, default_value_t = 0)]
        delay: u64,
    },
    /// Check fields of a saved board and list what is obviously a mine or safe
    Hint {
        save: PathBuf,
        /// Field to check, as x,y, may be repeated
        #[arg(short, long = "check", value_parser = parse_pos, required = true)]
        checks: Vec<Pos>,
    },
    /// Time board generation on a 99x99 board with 700 mines
    Perf(perf::PerfArgs),
}

#[derive(clap::Args, Debug)]
struct NewArgs {
    /// Built-in difficulty, e.g. classic or expert
    #[arg(short, long, conflicts_with_all = ["rows", "cols", "mines"])]
    difficulty: Option<String>,
    #[arg(long, requires_all = ["cols", "mines"])]
    rows: Option<Coord>,
    #[arg(long, requires_all = ["rows", "mines"])]
    cols: Option<Coord>,
    #[arg(long, requires_all = ["rows", "cols"])]
    mines: Option<CellCount>,
    /// Field the player will check first, as x,y
    #[arg(short, long, value_parser = parse_pos, default_value = "0,0")]
    start: Pos,
    #[arg(short, long, value_enum, default_value_t = Mode::Area)]
    mode: Mode,
    /// Attempts for the solvable mode
    #[arg(short, long, default_value_t = DEFAULT_SOLVABLE_ITERATIONS)]
    iterations: u32,
    /// Force a seed instead of random
    #[arg(long)]
    seed: Option<u64>,
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Only the start field is safe
    Single,
    /// The start field and its neighbors are safe
    Area,
    /// Winnable from the start field without guessing
    Solvable,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    match args.command {
        Command::New(new) => new_game(new),
        Command::Solve { save, start, delay } => solve(save, start, Duration::from_millis(delay)),
        Command::Hint { save, checks } => hint(save, &checks),
        Command::Perf(perf) => perf::run(&perf),
    }
}

fn new_game(args: NewArgs) -> anyhow::Result<()> {
    let difficulty = match (args.rows, args.cols, args.mines) {
        (Some(rows), Some(cols), Some(mines)) => Difficulty::custom(mines, rows, cols)?,
        _ => {
            let name = args.difficulty.as_deref().unwrap_or("classic");
            Difficulty::by_name(name).ok_or_else(|| anyhow!("Unknown difficulty {name:?}"))?
        }
    };
    if !args.start.in_bounds(&difficulty) {
        bail!("Start {} is outside of the {} board", args.start, difficulty.name());
    }

    let mut placer = match args.seed {
        Some(seed) => RandomMinePlacer::seeded(seed),
        None => RandomMinePlacer::new(),
    };
    let mut game = match args.mode {
        Mode::Single => Game::generate(difficulty, args.start, SafeZone::Single, &mut placer),
        Mode::Area => Game::generate(difficulty, args.start, SafeZone::Area, &mut placer),
        Mode::Solvable => {
            match generate_solvable(difficulty, args.start, args.iterations, &mut placer) {
                Ok(game) => game,
                Err(err @ GameError::UnsolvableWithinBudget { .. }) => {
                    log::warn!("{err}, keeping a board that may need guessing");
                    err.into_fallback_game()
                        .context("Generator gave up without a board")?
                }
                Err(err) => return Err(err.into()),
            }
        }
    };

    let save = game.to_save()?;
    let path = save
        .write(&args.output)
        .with_context(|| format!("Could not write {}", args.output.display()))?;
    println!("{} ({})", path.display(), save.id());
    Ok(())
}

fn solve(path: PathBuf, start: Pos, delay: Duration) -> anyhow::Result<()> {
    let save = load(&path)?;
    let game = share(save.game());
    if !lock_game(&game).in_bounds(start) {
        bail!("Start {start} is outside of the board");
    }

    let solver = Arc::new(Solver::new(Arc::clone(&game)));
    let won = AutoPlay::start(solver, Some(start), delay, |event| match event {
        AutoPlayEvent::MineFound(pos) => log::info!("Mine at {pos}"),
        AutoPlayEvent::Revealed { pos, .. } => log::info!("Checked {pos}"),
    })
    .wait();

    let game = lock_game(&game);
    if let Some(status) = game.status() {
        print!("{}", render(&status));
    }
    if won {
        println!("won");
    } else if game.is_lost() {
        println!("lost");
    } else {
        println!("stuck, the rest needs guessing");
    }
    Ok(())
}

fn hint(path: PathBuf, checks: &[Pos]) -> anyhow::Result<()> {
    let save = load(&path)?;
    let mut game = save.game();

    let mut latest = None;
    for &pos in checks {
        let (status, _) = game
            .check_field(pos)
            .with_context(|| format!("Could not check {pos}"))?;
        latest = Some(status);
    }
    let status = latest.context("Nothing was checked")?;

    print!("{}", render(&status));
    if status.is_finished() {
        println!("{}", if status.is_won() { "won" } else { "lost" });
        return Ok(());
    }
    println!("mines: {}", join(status.obvious_mines()));
    println!("safe: {}", join(status.obvious_safe_positions()));
    Ok(())
}

fn load(path: &Path) -> anyhow::Result<Save> {
    let save = Save::load(path).with_context(|| format!("Could not load {}", path.display()))?;
    if !save.verify()? {
        log::warn!("Save id of {} does not match its content", path.display());
    }
    Ok(save)
}

fn parse_pos(arg: &str) -> Result<Pos, String> {
    let (x, y) = arg
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {arg:?}"))?;
    let coord = |value: &str| {
        value
            .trim()
            .parse::<Coord>()
            .map_err(|err| format!("invalid coordinate {value:?}: {err}"))
    };
    Ok(Pos::new(coord(x)?, coord(y)?))
}

fn render(status: &Status) -> String {
    let (rows, cols) = status.size();
    let mut out = String::with_capacity(usize::from(rows) * (usize::from(cols) + 1));
    for x in 0..rows {
        for y in 0..cols {
            out.push(symbol(status.field(Pos::new(x, y))));
        }
        out.push('\n');
    }
    out
}

fn symbol(field: Field) -> char {
    match field.content {
        FieldContent::Unknown => '#',
        FieldContent::Mine => '*',
        FieldContent::Count(0) => '.',
        FieldContent::Count(count) => char::from_digit(u32::from(count), 10).unwrap_or('?'),
    }
}

fn join(positions: &[Pos]) -> String {
    positions
        .iter()
        .map(Pos::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

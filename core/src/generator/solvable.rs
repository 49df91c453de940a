use web_time::Instant;

use super::*;

/// Iteration budget used by [`Game::solvable`].
pub const DEFAULT_SOLVABLE_ITERATIONS: u32 = 10_000;

/// Searches for a layout that can be solved from `pos` by deduction alone.
///
/// Each attempt keeps the 3x3 area around `pos` clear and lets a fresh [`Solver`] play a throwaway
/// copy of the board. When no attempt is won within `max_iterations`, the last layout is returned
/// inside [`GameError::UnsolvableWithinBudget`].
pub fn generate_solvable<P: MinePlacer>(
    difficulty: Difficulty,
    pos: Pos,
    max_iterations: u32,
    placer: &mut P,
) -> Result<Game> {
    if max_iterations < 1 {
        return Err(GameError::InvalidIterations);
    }
    if !pos.in_bounds(&difficulty) {
        return Err(GameError::InvalidCoords(pos));
    }

    let started = Instant::now();
    let safe = SafeZone::Area.cells(&difficulty, pos);

    let mut mines = Vec::new();
    for attempt in 1..=max_iterations {
        mines = placer.place_mines(&difficulty, &safe).into_iter().collect();

        let candidate = Game::from_mines(difficulty.clone(), mines.iter().copied());
        let solver = Solver::new(share(candidate));
        if solver.autosolve(pos)? {
            log::debug!(
                "found solvable layout after {attempt} attempts in {:?}",
                started.elapsed()
            );
            return Ok(Game::from_mines(difficulty, mines));
        }
    }

    log::debug!(
        "no solvable layout in {max_iterations} attempts, took {:?}",
        started.elapsed()
    );
    Err(GameError::UnsolvableWithinBudget {
        iterations: max_iterations,
        fallback: Box::new(Game::from_mines(difficulty, mines)),
    })
}

impl Game {
    /// Game that can be won from `pos` without guessing, see [`generate_solvable`].
    pub fn solvable_with_iterations(
        difficulty: Difficulty,
        pos: Pos,
        max_iterations: u32,
    ) -> Result<Self> {
        generate_solvable(difficulty, pos, max_iterations, &mut RandomMinePlacer::new())
    }

    /// Game that is very likely winnable from `pos` without guessing.
    ///
    /// Falls back to an unverified board when the search budget runs out.
    pub fn solvable(difficulty: Difficulty, pos: Pos) -> Self {
        let generated =
            Self::solvable_with_iterations(difficulty.clone(), pos, DEFAULT_SOLVABLE_ITERATIONS);
        match generated {
            Ok(game) => {
                log::info!("Created solvable minesweeper game");
                game
            }
            Err(err) => {
                log::error!("Failed to create a solvable minesweeper game: {err}");
                err.into_fallback_game()
                    .unwrap_or_else(|| Self::with_safe_area(difficulty, pos))
            }
        }
    }
}

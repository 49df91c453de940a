use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};

use crate::*;

/// Accumulates what can be deduced about one live game.
///
/// Known mines and known safe positions only grow between updates, apart from safe positions that
/// got checked in the meantime. A new game needs a new solver.
#[derive(Debug)]
pub struct Solver {
    game: SharedGame,
    known: RwLock<Deductions>,
}

impl Solver {
    pub fn new(game: SharedGame) -> Self {
        Self {
            game,
            known: RwLock::default(),
        }
    }

    pub fn game(&self) -> &SharedGame {
        &self.game
    }

    /// Positions known to hold a mine, in discovery order.
    pub fn known_mines(&self) -> Vec<Pos> {
        self.read_known().mines.clone()
    }

    /// Unchecked positions known to be safe, in discovery order.
    pub fn next_steps(&self) -> Vec<Pos> {
        self.read_known().safe.clone()
    }

    /// Runs the deduction on the latest status of the game until nothing new is found.
    ///
    /// Does nothing before the first check or once the game is finished.
    pub fn update(&self) {
        let Some(status) = self.lock_game().status() else {
            return;
        };
        if status.is_finished() {
            return;
        }

        let mut known = self.write_known();
        let passes = deduce(&status, &mut known);
        log::debug!(
            "solver knows {} mines and {} safe positions after {passes} passes",
            known.mines.len(),
            known.safe.len()
        );
    }

    /// Checks `start`, then keeps revealing every known safe position until none are left.
    ///
    /// Returns whether the game was won.
    pub fn autosolve(&self, start: Pos) -> Result<bool> {
        self.lock_game().check_field(start)?;
        self.update();

        loop {
            let steps = self.next_steps();
            if steps.is_empty() || self.lock_game().is_finished() {
                break;
            }

            {
                let mut game = self.lock_game();
                for pos in steps {
                    game.check_field(pos)?;
                }
            }
            self.update();
        }

        Ok(self.lock_game().is_won())
    }

    pub(crate) fn lock_game(&self) -> MutexGuard<'_, Game> {
        lock_game(&self.game)
    }

    fn read_known(&self) -> RwLockReadGuard<'_, Deductions> {
        self.known.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_known(&self) -> RwLockWriteGuard<'_, Deductions> {
        self.known.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Locks a shared game, recovering it if a previous holder panicked.
pub fn lock_game(game: &SharedGame) -> MutexGuard<'_, Game> {
    game.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Wraps a game for sharing with solvers and autoplay workers.
pub fn share(game: Game) -> SharedGame {
    Arc::new(Mutex::new(game))
}

use hashbrown::HashSet;

use crate::*;
pub use random::*;
pub use solvable::*;

mod random;
mod solvable;

pub trait MinePlacer {
    /// Picks `difficulty.mines()` distinct positions, none of them in `safe`.
    fn place_mines(&mut self, difficulty: &Difficulty, safe: &[Pos]) -> HashSet<Pos>;
}

/// Cells kept free of mines around the first click.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SafeZone {
    Single,
    Area,
}

impl SafeZone {
    pub fn cells(self, difficulty: &Difficulty, pos: Pos) -> Vec<Pos> {
        match self {
            Self::Single => vec![pos],
            Self::Area => pos.area(difficulty.size()).collect(),
        }
    }
}

//! Minesweeper engine: minefield state machine, safe-start and solvable board generation, and a
//! deduction solver working only from what the player can see.

pub use analysis::*;
pub use difficulty::*;
pub use engine::*;
pub use error::*;
pub use field::*;
pub use generator::*;
pub use save::*;
pub use status::*;
pub use types::*;

mod analysis;
mod difficulty;
mod engine;
mod error;
mod field;
mod generator;
mod save;
mod status;
mod types;

/// Outcome of checking a field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    /// Whether the check changed the board.
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

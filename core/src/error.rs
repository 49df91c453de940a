use thiserror::Error;

use crate::*;

#[derive(Error, Debug)]
pub enum GameError {
    #[error(
        "Rows and columns need to be between {min} and {max}, got {rows}x{cols}",
        min = MIN_SIDE,
        max = MAX_SIDE
    )]
    InvalidDimensions { rows: Coord, cols: Coord },
    #[error(
        "The number of mines needs to be at least {min} and at most 80% of all cells, got {mines}",
        min = MIN_MINES
    )]
    InvalidMineCount { mines: CellCount },
    #[error("Invalid coordinates {0}")]
    InvalidCoords(Pos),
    #[error("Maximum iterations must be greater than zero")]
    InvalidIterations,
    #[error("Could not create a solvable game within {iterations} iterations")]
    UnsolvableWithinBudget {
        iterations: u32,
        /// Last generated layout, playable but may require guessing.
        fallback: Box<Game>,
    },
    #[error("Could not access save file")]
    Io(#[from] std::io::Error),
    #[error("Malformed save")]
    MalformedSave(#[from] serde_json::Error),
    #[error("Save contains a mine outside of the board at {0}")]
    MineOutOfBounds(Pos),
}

impl GameError {
    /// Recovers the best-effort board from a generation budget failure.
    pub fn into_fallback_game(self) -> Option<Game> {
        match self {
            Self::UnsolvableWithinBudget { fallback, .. } => Some(*fallback),
            _ => None,
        }
    }
}

pub type Result<T> = core::result::Result<T, GameError>;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Unchecked cells whose content is forced by the visible clues.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deductions {
    pub mines: Vec<Pos>,
    pub safe: Vec<Pos>,
}

impl Deductions {
    pub fn is_empty(&self) -> bool {
        self.mines.is_empty() && self.safe.is_empty()
    }
}

/// Grows `known` to the fixed point of the single-clue counting rule over `status`.
///
/// Known safe positions that have been checked in the meantime are dropped first. Nothing is ever
/// removed from `known.mines`. Finished games are left alone. Returns the number of passes over
/// the board.
pub fn deduce(status: &Status, known: &mut Deductions) -> usize {
    if status.is_finished() {
        return 0;
    }

    known.safe.retain(|&pos| !status[pos].checked);

    let mut mines: HashSet<Pos> = known.mines.iter().copied().collect();
    let mut safe: HashSet<Pos> = known.safe.iter().copied().collect();

    let bounds = status.size();
    let mut passes = 0;
    loop {
        passes += 1;
        let mines_before = known.mines.len();
        let safe_before = known.safe.len();

        for pos in walk_all(bounds.0, bounds.1) {
            let Some(clue) = status[pos].clue() else {
                continue;
            };

            let mut unchecked = 0u8;
            let mut known_mines = 0u8;
            let mut known_safe = 0u8;
            let mut undetermined: SmallVec<[Pos; 8]> = SmallVec::new();

            for neighbor in pos.neighbors(bounds) {
                if status[neighbor].checked {
                    continue;
                }
                unchecked += 1;
                if mines.contains(&neighbor) {
                    known_mines += 1;
                } else if safe.contains(&neighbor) {
                    known_safe += 1;
                } else {
                    undetermined.push(neighbor);
                }
            }

            if undetermined.is_empty() {
                continue;
            }

            if unchecked - known_safe == clue && known_mines != clue {
                log::trace!(
                    "mines around {pos}: clue {clue}, unchecked {unchecked}, new {undetermined:?}"
                );
                for neighbor in undetermined {
                    mines.insert(neighbor);
                    known.mines.push(neighbor);
                }
            } else if known_mines == clue && unchecked > clue {
                log::trace!(
                    "safe around {pos}: clue {clue}, unchecked {unchecked}, new {undetermined:?}"
                );
                for neighbor in undetermined {
                    safe.insert(neighbor);
                    known.safe.push(neighbor);
                }
            }
        }

        if known.mines.len() == mines_before && known.safe.len() == safe_before {
            break;
        }
    }

    log::debug!(
        "deduced {} mines and {} safe positions in {passes} passes",
        known.mines.len(),
        known.safe.len()
    );
    passes
}

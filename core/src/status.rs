use core::ops::Index;
use std::sync::OnceLock;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What the player knows about a game at one point in time.
///
/// Unchecked cells read [`FieldContent::Unknown`] unless the game is finished, in which case the
/// whole board is revealed. A snapshot never changes once built; the obvious mines and safe
/// positions are deduced on first access and then reused, even when the first accesses race.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Status {
    board: Array2<Field>,
    lost: bool,
    won: bool,
    #[serde(skip)]
    deductions: OnceLock<Deductions>,
}

impl Status {
    pub fn new(board: Array2<Field>, lost: bool, won: bool) -> Self {
        Self {
            board,
            lost,
            won,
            deductions: OnceLock::new(),
        }
    }

    /// Snapshot of `board` as the player is allowed to see it.
    pub(crate) fn from_board(board: &Array2<Field>, lost: bool, won: bool) -> Self {
        let finished = lost || won;
        let visible = board.map(|&field| Field {
            checked: field.checked,
            content: if field.checked || finished {
                field.content
            } else {
                FieldContent::Unknown
            },
        });
        Self::new(visible, lost, won)
    }

    pub fn size(&self) -> Coord2 {
        self.board.bounds()
    }

    pub fn field(&self, pos: Pos) -> Field {
        self.board[pos.to_nd_index()]
    }

    pub fn is_lost(&self) -> bool {
        self.lost
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn is_finished(&self) -> bool {
        self.lost || self.won
    }

    /// Every cell with its position, row by row.
    pub fn fields(&self) -> impl Iterator<Item = (Pos, Field)> + '_ {
        let (rows, cols) = self.size();
        walk_all(rows, cols).map(|pos| (pos, self.field(pos)))
    }

    /// Unchecked cells that must be mines given the visible clues.
    pub fn obvious_mines(&self) -> &[Pos] {
        &self.deductions().mines
    }

    /// Unchecked cells that can be revealed without risk given the visible clues.
    pub fn obvious_safe_positions(&self) -> &[Pos] {
        &self.deductions().safe
    }

    fn deductions(&self) -> &Deductions {
        self.deductions.get_or_init(|| {
            let mut deductions = Deductions::default();
            deduce(self, &mut deductions);
            deductions
        })
    }
}

impl Index<Pos> for Status {
    type Output = Field;

    fn index(&self, pos: Pos) -> &Self::Output {
        &self.board[pos.to_nd_index()]
    }
}

impl PartialEq for Status {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board && self.lost == other.lost && self.won == other.won
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    fn single_clue_status() -> Status {
        // row 0: [1] [?] [?]
        // row 1: [1] [1] [?]
        let mut board = Array2::from_elem([2, 3], Field::default());
        for pos in [Pos::new(0, 0), Pos::new(1, 0), Pos::new(1, 1)] {
            board[pos.to_nd_index()] = Field {
                checked: true,
                content: FieldContent::Count(1),
            };
        }
        for pos in [Pos::new(0, 1), Pos::new(0, 2), Pos::new(1, 2)] {
            board[pos.to_nd_index()].content = FieldContent::Unknown;
        }
        Status::new(board, false, false)
    }

    #[test]
    fn hides_unchecked_content_while_in_progress() {
        let mut board = Array2::from_elem([2, 2], Field::default());
        board[[0, 0]].content = FieldContent::Mine;
        board[[1, 1]].checked = true;
        board[[1, 1]].content = FieldContent::Count(1);

        let status = Status::from_board(&board, false, false);

        assert_eq!(status.field(Pos::new(0, 0)).content, FieldContent::Unknown);
        assert_eq!(status.field(Pos::new(0, 1)).content, FieldContent::Unknown);
        assert_eq!(status.field(Pos::new(1, 1)).content, FieldContent::Count(1));
        assert!(status.field(Pos::new(1, 1)).checked);
    }

    #[test]
    fn reveals_everything_once_finished() {
        let mut board = Array2::from_elem([2, 2], Field::default());
        board[[0, 0]].content = FieldContent::Mine;

        for (lost, won) in [(true, false), (false, true)] {
            let status = Status::from_board(&board, lost, won);

            assert!(status.is_finished());
            for (pos, field) in status.fields() {
                assert_eq!(field, board[pos.to_nd_index()]);
            }
        }
    }

    #[test]
    fn deduces_from_visible_clues() {
        let status = single_clue_status();

        // (0, 0) sees only (0, 1) unchecked, so it is the mine for every clue around it
        assert_eq!(status.obvious_mines(), &[Pos::new(0, 1)]);
        assert_eq!(status.obvious_safe_positions(), &[Pos::new(0, 2), Pos::new(1, 2)]);
    }

    #[test]
    fn finished_snapshot_has_no_deductions() {
        let board = Array2::from_elem([1, 1], Field::default());

        for (lost, won) in [(true, false), (false, true)] {
            let status = Status::new(board.clone(), lost, won);

            assert!(status.obvious_mines().is_empty());
            assert!(status.obvious_safe_positions().is_empty());
        }
    }

    #[test]
    fn empty_board_has_no_deductions() {
        let status = Status::new(Array2::from_elem([0, 0], Field::default()), false, false);

        assert!(status.obvious_mines().is_empty());
        assert!(status.obvious_safe_positions().is_empty());
    }

    #[test]
    fn concurrent_first_access_computes_once() {
        let status = single_clue_status();

        let pointers: Vec<(usize, usize)> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        (
                            status.obvious_mines().as_ptr() as usize,
                            status.obvious_safe_positions().as_ptr() as usize,
                        )
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(pointers.windows(2).all(|pair| pair[0] == pair[1]));
    }
}

use std::sync::{Arc, Mutex};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Game handle shared between the caller, solvers and autoplay workers.
///
/// Every mutation of a live game goes through its mutex.
pub type SharedGame = Arc<Mutex<Game>>;

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
/// - Won | Lost -> InProgress (replay only)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    InProgress,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::InProgress
    }
}

/// Authoritative minefield of one game.
#[derive(Clone, Debug)]
pub struct Game {
    board: Array2<Field>,
    difficulty: Difficulty,
    state: GameState,
    status: Option<Arc<Status>>,
    replay: bool,
}

impl Game {
    fn blank(difficulty: Difficulty) -> Self {
        Self {
            board: Array2::default(difficulty.size().to_nd_index()),
            difficulty,
            state: GameState::default(),
            status: None,
            replay: false,
        }
    }

    /// Builds a game from already validated mine positions.
    pub(crate) fn from_mines<I>(difficulty: Difficulty, mines: I) -> Self
    where
        I: IntoIterator<Item = Pos>,
    {
        let mut game = Self::blank(difficulty);
        for pos in mines {
            game.board[pos.to_nd_index()].content = FieldContent::Mine;
        }
        game.compute_counts();
        game
    }

    /// Game with a hand-specified mine layout.
    pub fn with_mines(difficulty: Difficulty, mines: &[Pos]) -> Result<Self> {
        if let Some(&pos) = mines.iter().find(|pos| !pos.in_bounds(&difficulty)) {
            return Err(GameError::InvalidCoords(pos));
        }
        Ok(Self::from_mines(difficulty, mines.iter().copied()))
    }

    /// Random game where only `pos` is guaranteed to be free of mines.
    pub fn with_safe_pos(difficulty: Difficulty, pos: Pos) -> Self {
        Self::generate(difficulty, pos, SafeZone::Single, &mut RandomMinePlacer::new())
    }

    /// Random game where the 3x3 area around `pos` is guaranteed to be free of mines.
    pub fn with_safe_area(difficulty: Difficulty, pos: Pos) -> Self {
        Self::generate(difficulty, pos, SafeZone::Area, &mut RandomMinePlacer::new())
    }

    /// Random game using `placer`, keeping `zone` around `pos` free of mines.
    pub fn generate<P: MinePlacer>(
        difficulty: Difficulty,
        pos: Pos,
        zone: SafeZone,
        placer: &mut P,
    ) -> Self {
        let safe = zone.cells(&difficulty, pos);
        let mines = placer.place_mines(&difficulty, &safe);
        Self::from_mines(difficulty, mines)
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_lost(&self) -> bool {
        matches!(self.state, GameState::Lost)
    }

    pub fn is_won(&self) -> bool {
        matches!(self.state, GameState::Won)
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn is_replay(&self) -> bool {
        self.replay
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.in_bounds(&self.difficulty)
    }

    /// Authoritative cell, including hidden mines.
    pub fn field(&self, pos: Pos) -> Field {
        self.board[pos.to_nd_index()]
    }

    /// Last computed snapshot, `None` before the first check and after a replay.
    pub fn status(&self) -> Option<Arc<Status>> {
        self.status.clone()
    }

    /// Every mine position in row-major order.
    pub fn mines(&self) -> Vec<Pos> {
        self.positions()
            .filter(|&pos| self.field(pos).is_mine())
            .collect()
    }

    /// Reveals `pos` and, for zero cells, everything connected to it.
    ///
    /// Nothing happens when the game is finished or `pos` was already checked.
    pub fn check_field(&mut self, pos: Pos) -> Result<(Arc<Status>, RevealOutcome)> {
        if !self.in_bounds(pos) {
            return Err(GameError::InvalidCoords(pos));
        }

        if self.is_finished() || self.field(pos).checked {
            return Ok((self.current_status(), RevealOutcome::NoChange));
        }

        let field = &mut self.board[pos.to_nd_index()];
        field.checked = true;
        if field.is_mine() {
            log::debug!("hit mine at {pos}");
            self.state = GameState::Lost;
            return Ok((self.update_status(), RevealOutcome::HitMine));
        }

        self.reveal_field(pos);

        let status = self.update_status();
        let outcome = if status.is_won() {
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        };
        Ok((status, outcome))
    }

    // the checked flag doubles as the visited set
    fn reveal_field(&mut self, pos: Pos) {
        let bounds = self.difficulty.size();
        let mut to_visit = vec![pos];

        while let Some(visit) = to_visit.pop() {
            let field = &mut self.board[visit.to_nd_index()];
            field.checked = true;
            log::trace!("reveal field {visit}: {}", field.content);

            if field.content != FieldContent::Count(0) {
                continue;
            }

            for neighbor in visit.neighbors(bounds) {
                let neighbor_field = &mut self.board[neighbor.to_nd_index()];
                if !neighbor_field.checked {
                    neighbor_field.checked = true;
                    to_visit.push(neighbor);
                }
            }
        }
    }

    /// Recomputes the snapshot, latching the win once every safe cell is checked.
    pub fn update_status(&mut self) -> Arc<Status> {
        if !self.is_finished() {
            let all_safe_checked = self
                .board
                .iter()
                .all(|field| field.checked || field.is_mine());
            if all_safe_checked {
                log::debug!("game won");
                self.state = GameState::Won;
            }
        }

        let status = Arc::new(Status::from_board(
            &self.board,
            self.is_lost(),
            self.is_won(),
        ));
        self.status = Some(Arc::clone(&status));
        status
    }

    fn current_status(&mut self) -> Arc<Status> {
        match &self.status {
            Some(status) => Arc::clone(status),
            None => self.update_status(),
        }
    }

    /// Hides every cell again while keeping the mine layout.
    pub fn replay(&mut self) {
        self.replay = true;
        self.state = GameState::InProgress;
        self.status = None;
        for field in self.board.iter_mut() {
            field.checked = false;
        }
    }

    /// Snapshot of the layout for persisting, marks the game as a replay.
    pub fn to_save(&mut self) -> Result<Save> {
        self.replay = true;
        Save::from_game(self)
    }

    pub(crate) fn mark_replay(&mut self) {
        self.replay = true;
    }

    fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        walk_all(self.difficulty.rows(), self.difficulty.cols())
    }

    fn compute_counts(&mut self) {
        let bounds = self.difficulty.size();
        for pos in self.positions() {
            if self.field(pos).is_mine() {
                continue;
            }
            let count = pos
                .neighbors(bounds)
                .filter(|&neighbor| self.field(neighbor).is_mine())
                .count();
            // at most 8 neighbors
            self.board[pos.to_nd_index()].content = FieldContent::Count(count as u8);
        }
    }
}

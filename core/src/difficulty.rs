use serde::{Deserialize, Serialize};

use crate::*;

/// Smallest allowed number of rows or columns for a custom board.
pub const MIN_SIDE: Coord = 8;

/// Largest allowed number of rows or columns for a custom board.
pub const MAX_SIDE: Coord = 99;

/// Smallest allowed number of mines for a custom board.
pub const MIN_MINES: CellCount = 9;

/// Name given to every validated custom difficulty.
pub const CUSTOM_NAME: &str = "Custom";

// (name, rows, cols, mines)
const CATALOG: [(&str, Coord, Coord, CellCount); 4] = [
    ("Classic", 8, 8, 9),
    ("Beginner", 9, 9, 10),
    ("Intermediate", 16, 16, 40),
    ("Expert", 16, 30, 99),
];

/// Board configuration of a game.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Difficulty {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Row")]
    rows: Coord,
    #[serde(rename = "Col")]
    cols: Coord,
    #[serde(rename = "Mines")]
    mines: CellCount,
}

impl Difficulty {
    pub(crate) fn new_unchecked(name: &str, mines: CellCount, rows: Coord, cols: Coord) -> Self {
        Self {
            name: name.to_string(),
            rows,
            cols,
            mines,
        }
    }

    /// Validates a custom board, checking the dimensions before the mine count.
    pub fn custom(mines: CellCount, rows: Coord, cols: Coord) -> Result<Self> {
        let side_range = MIN_SIDE..=MAX_SIDE;
        if !side_range.contains(&rows) || !side_range.contains(&cols) {
            return Err(GameError::InvalidDimensions { rows, cols });
        }

        // at most 80% of the board may be mined
        let cells = u32::from(mult(rows, cols));
        if mines < MIN_MINES || u32::from(mines) * 5 > cells * 4 {
            return Err(GameError::InvalidMineCount { mines });
        }

        Ok(Self::new_unchecked(CUSTOM_NAME, mines, rows, cols))
    }

    /// The built-in difficulties, freshly built on every call.
    pub fn catalog() -> Vec<Self> {
        CATALOG
            .iter()
            .map(|&(name, rows, cols, mines)| Self::new_unchecked(name, mines, rows, cols))
            .collect()
    }

    /// Looks up a built-in difficulty, ignoring case.
    pub fn by_name(name: &str) -> Option<Self> {
        Self::catalog()
            .into_iter()
            .find(|difficulty| difficulty.name.eq_ignore_ascii_case(name))
    }

    pub fn classic() -> Self {
        let (name, rows, cols, mines) = CATALOG[0];
        Self::new_unchecked(name, mines, rows, cols)
    }

    pub fn beginner() -> Self {
        let (name, rows, cols, mines) = CATALOG[1];
        Self::new_unchecked(name, mines, rows, cols)
    }

    pub fn intermediate() -> Self {
        let (name, rows, cols, mines) = CATALOG[2];
        Self::new_unchecked(name, mines, rows, cols)
    }

    pub fn expert() -> Self {
        let (name, rows, cols, mines) = CATALOG[3];
        Self::new_unchecked(name, mines, rows, cols)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn rows(&self) -> Coord {
        self.rows
    }

    pub const fn cols(&self) -> Coord {
        self.cols
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.in_bounds(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_returns_copies() {
        let mut first = Difficulty::catalog();
        first[0].rows = 42;
        first[0].name.push_str("-changed");
        first.clear();

        let second = Difficulty::catalog();

        assert_eq!(second.len(), 4);
        assert_eq!(second[0], Difficulty::classic());
        assert_eq!(second[0].rows(), 8);
        assert_eq!(second[0].name(), "Classic");
    }

    #[test]
    fn catalog_matches_named_constructors() {
        assert_eq!(
            Difficulty::catalog(),
            vec![
                Difficulty::classic(),
                Difficulty::beginner(),
                Difficulty::intermediate(),
                Difficulty::expert(),
            ]
        );
        assert_eq!(Difficulty::expert().size(), (16, 30));
        assert_eq!(Difficulty::expert().mines(), 99);
    }

    #[test]
    fn custom_rejects_dimensions_out_of_range() {
        let cases = [
            (MIN_SIDE - 1, 12),
            (MAX_SIDE + 1, 12),
            (12, MIN_SIDE - 1),
            (12, MAX_SIDE + 1),
        ];

        for (rows, cols) in cases {
            let err = Difficulty::custom(MIN_MINES, rows, cols).unwrap_err();
            assert!(
                matches!(err, GameError::InvalidDimensions { rows: r, cols: c } if r == rows && c == cols),
                "unexpected error for {rows}x{cols}: {err}"
            );
        }
    }

    #[test]
    fn custom_rejects_mine_count_out_of_range() {
        for mines in [MIN_MINES - 1, 116] {
            let err = Difficulty::custom(mines, 12, 12).unwrap_err();
            assert!(matches!(err, GameError::InvalidMineCount { mines: m } if m == mines));
        }
    }

    #[test]
    fn custom_accepts_limits() {
        let lower = Difficulty::custom(MIN_MINES, MIN_SIDE, MIN_SIDE).unwrap();
        let upper = Difficulty::custom(7840, MAX_SIDE, MAX_SIDE).unwrap();
        let ratio = Difficulty::custom(115, 12, 12).unwrap();

        assert_eq!(lower.name(), CUSTOM_NAME);
        assert_eq!(lower.size(), (MIN_SIDE, MIN_SIDE));
        assert_eq!(upper.mines(), 7840);
        assert_eq!(ratio.mines(), 115);
    }

    #[test]
    fn dimension_error_wins_over_mine_count() {
        let err = Difficulty::custom(0, 3, 3).unwrap_err();

        assert!(matches!(err, GameError::InvalidDimensions { .. }));
    }

    #[test]
    fn by_name_ignores_case() {
        assert_eq!(Difficulty::by_name("expert"), Some(Difficulty::expert()));
        assert_eq!(Difficulty::by_name("Nightmare"), None);
    }

    #[test]
    fn serializes_with_save_file_keys() {
        let json = serde_json::to_string(&Difficulty::classic()).unwrap();

        assert_eq!(json, r#"{"Name":"Classic","Row":8,"Col":8,"Mines":9}"#);
    }
}

use core::fmt;

use serde::{Deserialize, Serialize};

/// What a cell holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldContent {
    Mine,
    /// Only ever found in a [`Status`](crate::Status), never on the authoritative board.
    Unknown,
    /// Number of mines among the 8 neighbors.
    Count(u8),
}

impl FieldContent {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn count(self) -> Option<u8> {
        match self {
            Self::Count(count) => Some(count),
            _ => None,
        }
    }
}

impl Default for FieldContent {
    fn default() -> Self {
        Self::Count(0)
    }
}

impl fmt::Display for FieldContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mine => f.write_str("mine"),
            Self::Unknown => f.write_str("unknown"),
            Self::Count(count) => write!(f, "{count}"),
        }
    }
}

/// Single cell of a minefield.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub checked: bool,
    pub content: FieldContent,
}

impl Field {
    pub const fn is_mine(self) -> bool {
        self.content.is_mine()
    }

    /// Checked cell showing a positive mine count.
    pub const fn clue(self) -> Option<u8> {
        match self.content {
            FieldContent::Count(count) if self.checked && count > 0 => Some(count),
            _ => None,
        }
    }
}

use core::fmt;
use core::iter;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::Difficulty;

/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Board size as `(rows, cols)`.
pub type Coord2 = (Coord, Coord);

/// Position on the board, `x` is the row and `y` the column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Pos {
    pub x: Coord,
    pub y: Coord,
}

impl Pos {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    pub fn in_bounds(self, difficulty: &Difficulty) -> bool {
        self.within(difficulty.size())
    }

    pub const fn within(self, (rows, cols): Coord2) -> bool {
        self.x < rows && self.y < cols
    }

    /// Up to 8 surrounding positions inside `bounds`, never `self`.
    pub fn neighbors(self, bounds: Coord2) -> NeighborIter {
        NeighborIter::new(self, bounds)
    }

    /// The 3x3 block centered on `self`, clipped to `bounds`.
    pub fn area(self, bounds: Coord2) -> impl Iterator<Item = Pos> {
        iter::once(self).chain(self.neighbors(bounds))
    }
}

impl From<Coord2> for Pos {
    fn from((x, y): Coord2) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Pos {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.x.into(), self.y.into()]
    }
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Every position of a `rows` x `cols` board in row-major order.
///
/// All whole-board scans go through this so that their order is stable.
pub fn walk_all(rows: Coord, cols: Coord) -> impl Iterator<Item = Pos> {
    (0..rows).flat_map(move |x| (0..cols).map(move |y| Pos::new(x, y)))
}

/// Board dimensions as coordinates.
pub trait BoardBounds {
    fn bounds(&self) -> Coord2;
}

impl<T> BoardBounds for Array2<T> {
    fn bounds(&self) -> Coord2 {
        let (rows, cols) = self.dim();
        (
            Coord::try_from(rows).unwrap_or(Coord::MAX),
            Coord::try_from(cols).unwrap_or(Coord::MAX),
        )
    }
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `pos`, returning a value only when it remains in bounds.
fn apply_delta(pos: Pos, delta: (i8, i8), bounds: Coord2) -> Option<Pos> {
    let (dx, dy) = delta;
    let (max_x, max_y) = bounds;

    let next_x = pos.x.checked_add_signed(dx)?;
    if next_x >= max_x {
        return None;
    }

    let next_y = pos.y.checked_add_signed(dy)?;
    if next_y >= max_y {
        return None;
    }

    Some(Pos::new(next_x, next_y))
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Pos,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    fn new(center: Pos, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Pos;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item =
                apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

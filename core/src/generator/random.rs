use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Rejection sampling over uniformly random positions.
#[derive(Clone, Debug)]
pub struct RandomMinePlacer {
    rng: SmallRng,
}

impl RandomMinePlacer {
    /// Placer seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Reproducible placer.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomMinePlacer {
    fn default() -> Self {
        Self::new()
    }
}

impl MinePlacer for RandomMinePlacer {
    fn place_mines(&mut self, difficulty: &Difficulty, safe: &[Pos]) -> HashSet<Pos> {
        let (rows, cols) = difficulty.size();
        let safe: HashSet<Pos> = safe
            .iter()
            .copied()
            .filter(|pos| pos.within((rows, cols)))
            .collect();

        let free_cells = difficulty.total_cells().saturating_sub(safe.len() as CellCount);
        let mut quota = difficulty.mines();
        if quota > free_cells {
            log::warn!(
                "Minefield cannot fit {} mines next to {} safe cells, placing {} instead",
                quota,
                safe.len(),
                free_cells
            );
            quota = free_cells;
        }

        let mut mines = HashSet::with_capacity(usize::from(quota));
        while mines.len() < usize::from(quota) {
            let pos = Pos::new(self.rng.random_range(0..rows), self.rng.random_range(0..cols));
            if safe.contains(&pos) {
                continue;
            }
            mines.insert(pos);
        }
        mines
    }
}

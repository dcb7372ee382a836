//! Board: mine placement, neighbour counts and text rendering.
//!
//! The board is the ground truth the game loop consults. The agent never
//! reads it directly; it only sees the counts returned by `probe`.

use crate::error::{AiError, AiResult};
use crate::rng::GameRng;
use crate::types::{Cell, Dimensions, NeighborCache};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Board {
    neighbors: NeighborCache,
    /// Row-major mine flags.
    cells: Vec<bool>,
    mines: BTreeSet<Cell>,
}

impl Board {
    /// Place exactly `mine_count` mines uniformly at random.
    pub fn random(dimensions: Dimensions, mine_count: usize, rng: &mut GameRng) -> AiResult<Self> {
        if mine_count > dimensions.len() {
            return Err(AiError::InvalidConfig(format!(
                "{mine_count} mines do not fit on a {}x{} board",
                dimensions.height, dimensions.width
            )));
        }

        let cells: Vec<Cell> = dimensions.cells().collect();
        Self::with_mines(dimensions, rng.sample(&cells, mine_count))
    }

    /// Board with a fixed mine layout.
    pub fn with_mines(
        dimensions: Dimensions,
        mines: impl IntoIterator<Item = Cell>,
    ) -> AiResult<Self> {
        let mut cells = vec![false; dimensions.len()];
        let mut placed = BTreeSet::new();
        for cell in mines {
            if !dimensions.contains(cell) {
                return Err(AiError::InvalidCell {
                    cell,
                    height: dimensions.height,
                    width: dimensions.width,
                });
            }
            cells[cell.row * dimensions.width + cell.col] = true;
            placed.insert(cell);
        }

        Ok(Self {
            neighbors: NeighborCache::new(dimensions),
            cells,
            mines: placed,
        })
    }

    pub fn dimensions(&self) -> Dimensions {
        self.neighbors.dimensions()
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn mine_count(&self) -> usize {
        self.mines.len()
    }

    #[inline(always)]
    pub fn is_mine(&self, cell: Cell) -> bool {
        let dims = self.dimensions();
        dims.contains(cell) && self.cells[cell.row * dims.width + cell.col]
    }

    /// In-bounds cells within one row and column, not including `cell`.
    pub fn neighbors(&self, cell: Cell) -> &[Cell] {
        self.neighbors.get(cell)
    }

    /// Number of mines around `cell`.
    pub fn probe(&self, cell: Cell) -> AiResult<usize> {
        let dims = self.dimensions();
        if !dims.contains(cell) {
            return Err(AiError::InvalidCell {
                cell,
                height: dims.height,
                width: dims.width,
            });
        }
        Ok(self.neighbors(cell).iter().filter(|&&n| self.is_mine(n)).count())
    }

    /// All mines have been found.
    pub fn won(&self, found: &BTreeSet<Cell>) -> bool {
        found == &self.mines
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims = self.dimensions();
        let rule = format!("{}-", "--".repeat(dims.width));
        for row in 0..dims.height {
            writeln!(f, "{rule}")?;
            for col in 0..dims.width {
                f.write_str(if self.is_mine(Cell::new(row, col)) { "|X" } else { "| " })?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{rule}")
    }
}

//! Core data types shared by the board, the knowledge base and the agent.
//!
//! Cells are addressed as `(row, col)` and every board-shaped table uses
//! row-major layout: `cells[row * width + col]`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[inline(always)]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Board geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub height: usize,
    pub width: usize,
}

impl Dimensions {
    pub const fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    #[inline(always)]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Total number of cells on the board.
    pub fn len(&self) -> usize {
        self.height * self.width
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every cell of the board in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let width = self.width;
        (0..self.height).flat_map(move |row| (0..width).map(move |col| Cell::new(row, col)))
    }

    #[inline(always)]
    fn index(&self, cell: Cell) -> usize {
        cell.row * self.width + cell.col
    }
}

/// Pre-computed neighbor cache for all cells.
///
/// Stores the 8-directional neighbors (clipped to board bounds) for every cell.
/// Indexed row-major, each entry is a slice of cells.
#[derive(Debug, Clone)]
pub struct NeighborCache {
    dimensions: Dimensions,
    /// Flat storage of all neighbor cells.
    data: Vec<Cell>,
    /// offsets[i] = start index in `data` for cell i.
    /// offsets[i+1] - offsets[i] = number of neighbors for cell i.
    offsets: Vec<usize>,
}

impl NeighborCache {
    /// Build the neighbor cache for a board of the given dimensions.
    pub fn new(dimensions: Dimensions) -> Self {
        let total = dimensions.len();
        let mut data = Vec::with_capacity(total * 8);
        let mut offsets = Vec::with_capacity(total + 1);

        for cell in dimensions.cells() {
            offsets.push(data.len());
            for dr in -1i64..=1 {
                for dc in -1i64..=1 {
                    if dr == 0 && dc == 0 {
                        continue;
                    }
                    let nr = cell.row as i64 + dr;
                    let nc = cell.col as i64 + dc;
                    let in_rows = nr >= 0 && nr < dimensions.height as i64;
                    let in_cols = nc >= 0 && nc < dimensions.width as i64;
                    if in_rows && in_cols {
                        data.push(Cell::new(nr as usize, nc as usize));
                    }
                }
            }
        }
        offsets.push(data.len()); // sentinel

        Self {
            dimensions,
            data,
            offsets,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Get the pre-computed neighbors of `cell`, or an empty slice when the
    /// cell is off the board.
    #[inline(always)]
    pub fn get(&self, cell: Cell) -> &[Cell] {
        if !self.dimensions.contains(cell) {
            return &[];
        }
        let idx = self.dimensions.index(cell);
        &self.data[self.offsets[idx]..self.offsets[idx + 1]]
    }
}

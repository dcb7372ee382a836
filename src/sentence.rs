//! A single logical statement about the board.
//!
//! A sentence asserts that exactly `count` of `cells` are mines. Cells are
//! kept in a `BTreeSet` so iteration, display and comparison are
//! deterministic.

use crate::error::{AiError, AiResult};
use crate::types::Cell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Sentence {
    cells: BTreeSet<Cell>,
    count: usize,
}

impl Sentence {
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: usize) -> Self {
        Self {
            cells: cells.into_iter().collect(),
            count,
        }
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// All cells are mines when the count covers every cell.
    pub fn known_mines(&self) -> BTreeSet<Cell> {
        if self.count > 0 && self.count == self.cells.len() {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// All cells are safe when the count is zero.
    pub fn known_safes(&self) -> BTreeSet<Cell> {
        if self.count == 0 {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Remove a cell known to be a mine, keeping the statement true for the
    /// remaining cells. Returns whether the sentence changed.
    pub fn mark_mine(&mut self, cell: Cell) -> AiResult<bool> {
        if !self.cells.contains(&cell) {
            return Ok(false);
        }
        if self.count == 0 {
            return Err(AiError::contradiction(format!("{self} with mine at {cell}")));
        }
        self.cells.remove(&cell);
        self.count -= 1;
        Ok(true)
    }

    /// Remove a cell known to be safe. Returns whether the sentence changed.
    pub fn mark_safe(&mut self, cell: Cell) -> bool {
        self.cells.remove(&cell)
    }

    /// Nothing left to say: every cell has been classified.
    pub fn is_resolved(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_consistent(&self) -> bool {
        self.count <= self.cells.len()
    }

    /// Subtract `subset` from this sentence.
    ///
    /// Returns `None` unless `subset.cells` is a non-empty strict subset of
    /// `self.cells`. The mines of the shared cells are exactly `subset.count`,
    /// so the remaining cells hold `self.count - subset.count`.
    pub fn difference(&self, subset: &Sentence) -> AiResult<Option<Sentence>> {
        if subset.cells.is_empty()
            || subset.cells.len() >= self.cells.len()
            || !subset.cells.is_subset(&self.cells)
        {
            return Ok(None);
        }

        let count = self
            .count
            .checked_sub(subset.count)
            .ok_or_else(|| AiError::contradiction(format!("{self} minus {subset}")))?;
        let derived = Sentence::new(self.cells.difference(&subset.cells).copied(), count);
        if !derived.is_consistent() {
            return Err(AiError::contradiction(derived));
        }
        Ok(Some(derived))
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{cell}")?;
        }
        write!(f, "}} = {}", self.count)
    }
}

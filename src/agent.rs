//! Minesweeper-playing agent: a knowledge base plus a move-selection policy.

use crate::error::AiResult;
use crate::knowledge::{Inference, KnowledgeBase};
use crate::rng::GameRng;
use crate::types::{Cell, Dimensions};

/// A move chosen by the agent and how it was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Proven safe by the knowledge base.
    Safe(Cell),
    /// Guessed among the cells not known to be mines.
    Random(Cell),
}

impl Move {
    pub fn cell(&self) -> Cell {
        match self {
            Move::Safe(cell) | Move::Random(cell) => *cell,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Agent {
    knowledge: KnowledgeBase,
    rng: GameRng,
}

impl Agent {
    /// Agent whose random moves draw from system entropy.
    pub fn new(dimensions: Dimensions) -> Self {
        Self::with_rng(dimensions, GameRng::new())
    }

    /// Agent whose random moves are reproducible.
    pub fn with_seed(dimensions: Dimensions, seed: u64) -> Self {
        Self::with_rng(dimensions, GameRng::from_seed(seed))
    }

    pub fn with_rng(dimensions: Dimensions, rng: GameRng) -> Self {
        Self {
            knowledge: KnowledgeBase::new(dimensions),
            rng,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Feed back the result of probing `cell`.
    pub fn observe(&mut self, cell: Cell, count: usize) -> AiResult<Inference> {
        self.knowledge.observe(cell, count)
    }

    /// A known-safe cell that has not been probed yet.
    ///
    /// The smallest such cell in row-major order, so the choice is stable.
    pub fn safe_move(&self) -> Option<Cell> {
        let kb = &self.knowledge;
        kb.safes().difference(kb.moves_made()).next().copied()
    }

    /// A uniformly random cell that is neither probed nor a known mine.
    pub fn random_move(&mut self) -> Option<Cell> {
        let kb = &self.knowledge;
        let candidates: Vec<Cell> = kb
            .dimensions()
            .cells()
            .filter(|cell| !kb.moves_made().contains(cell) && !kb.mines().contains(cell))
            .collect();
        self.rng.choose(&candidates)
    }

    /// Prefer a safe move and fall back to a random one.
    pub fn next_move(&mut self) -> Option<Move> {
        if let Some(cell) = self.safe_move() {
            return Some(Move::Safe(cell));
        }
        self.random_move().map(Move::Random)
    }
}

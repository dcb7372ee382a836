//! Knowledge-based Minesweeper agent and propositional model checker.
//!
//! The agent keeps a knowledge base of sentences "exactly `count` of these
//! cells are mines" and, after every probe, infers known-safe and known-mine
//! cells to a fixed point. The `logic` and `knights` modules solve knights
//! and knaves puzzles by model checking.
//!
//! Exports for JavaScript live behind `wasm32`; cells cross the boundary as
//! `{ row, col }` objects.

pub mod agent;
pub mod board;
pub mod error;
pub mod game;
pub mod knights;
pub mod knowledge;
pub mod logic;
pub mod rng;
pub mod sentence;
pub mod types;

pub use agent::{Agent, Move};
pub use board::Board;
pub use error::{AiError, AiResult};
pub use game::{Game, GameConfig, GameStatus};
pub use knowledge::{Inference, KnowledgeBase};
pub use sentence::Sentence;
pub use types::{Cell, Dimensions};

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use wasm_bindgen::prelude::*;
    use crate::agent::Agent;
    use crate::error::AiError;
    use crate::knights::{self, Puzzle};
    use crate::types::{Cell, Dimensions};

    fn js_error(err: AiError) -> JsValue {
        js_sys::Error::new(&err.to_string()).into()
    }

    fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(value).map_err(Into::into)
    }

    /// `None` crosses as `null`.
    fn cell_or_null(cell: Option<Cell>) -> Result<JsValue, JsValue> {
        match cell {
            Some(cell) => to_js(&cell),
            None => Ok(JsValue::NULL),
        }
    }

    /// Minesweeper agent owned by the JS game loop.
    #[wasm_bindgen(js_name = "MinesweeperAgent")]
    pub struct WasmAgent {
        inner: Agent,
    }

    #[wasm_bindgen(js_class = "MinesweeperAgent")]
    impl WasmAgent {
        #[wasm_bindgen(constructor)]
        pub fn new(height: usize, width: usize) -> WasmAgent {
            WasmAgent {
                inner: Agent::new(Dimensions::new(height, width)),
            }
        }

        /// Agent with reproducible random moves.
        #[wasm_bindgen(js_name = "withSeed")]
        pub fn with_seed(height: usize, width: usize, seed: u64) -> WasmAgent {
            WasmAgent {
                inner: Agent::with_seed(Dimensions::new(height, width), seed),
            }
        }

        /// Feed back a probe result. Throws on an impossible observation.
        /// Returns `{ new_safes, new_mines, derived, rounds }`.
        pub fn observe(
            &mut self,
            row: usize,
            col: usize,
            count: usize,
        ) -> Result<JsValue, JsValue> {
            let inference = self
                .inner
                .observe(Cell::new(row, col), count)
                .map_err(js_error)?;
            to_js(&inference)
        }

        /// `{ row, col }` of a known-safe unprobed cell, or `null`.
        #[wasm_bindgen(js_name = "safeMove")]
        pub fn safe_move(&self) -> Result<JsValue, JsValue> {
            cell_or_null(self.inner.safe_move())
        }

        /// `{ row, col }` of a random cell not known to be a mine, or `null`.
        #[wasm_bindgen(js_name = "randomMove")]
        pub fn random_move(&mut self) -> Result<JsValue, JsValue> {
            cell_or_null(self.inner.random_move())
        }

        /// Snapshot of moves made, safes, mines and sentences.
        pub fn knowledge(&self) -> Result<JsValue, JsValue> {
            to_js(&self.inner.knowledge().snapshot())
        }
    }

    /// Solve knights and knaves puzzle 0 to 3.
    /// Returns `{ puzzle, facts }` or `null` for an unknown puzzle.
    #[wasm_bindgen(js_name = "solveKnights")]
    pub fn wasm_solve_knights(puzzle: usize) -> Result<JsValue, JsValue> {
        match Puzzle::from_index(puzzle) {
            Some(p) => to_js(&knights::solve(p).map_err(js_error)?),
            None => Ok(JsValue::NULL),
        }
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "WASM agent ready".to_string()
    }

}

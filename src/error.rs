//! Error types for the agent, the board and the model checker.

use crate::types::Cell;
use thiserror::Error;

/// Result type alias for fallible operations in this crate.
pub type AiResult<T> = std::result::Result<T, AiError>;

/// Errors that can occur while playing or reasoning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AiError {
    /// A cell outside the board was passed in
    #[error("cell {cell} is outside the {height}x{width} board")]
    InvalidCell {
        cell: Cell,
        height: usize,
        width: usize,
    },

    /// The observation cannot be true for the cell's neighbourhood
    #[error("invalid observation at {cell}: {reason}")]
    InvalidObservation { cell: Cell, reason: String },

    /// Inference reached a sentence that no mine layout satisfies
    #[error("contradiction in knowledge base: {sentence}")]
    Contradiction { sentence: String },

    /// Game configuration cannot be played
    #[error("invalid game configuration: {0}")]
    InvalidConfig(String),

    /// Model has no value for a symbol
    #[error("symbol '{0}' is not bound in the model")]
    UnboundSymbol(String),
}

impl AiError {
    pub fn observation(cell: Cell, reason: impl Into<String>) -> Self {
        AiError::InvalidObservation {
            cell,
            reason: reason.into(),
        }
    }

    pub fn contradiction(sentence: impl ToString) -> Self {
        AiError::Contradiction {
            sentence: sentence.to_string(),
        }
    }
}

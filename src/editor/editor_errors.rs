//! Error types surfaced by the editor session.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),
    #[error("illegal move {from}-{to}")]
    IllegalMove { from: String, to: String },
    #[error("cannot edit position: {0}")]
    InvalidEdit(String),
    #[error("cannot replay move text at '{token}': {reason}")]
    UnparseableMoveText { token: String, reason: String },
    #[error(transparent)]
    History(#[from] HistoryError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("history index {index} out of range for {len} entries")]
    OutOfRange { index: usize, len: usize },
}

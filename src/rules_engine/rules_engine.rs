//! Boundary between the editor and whatever knows the rules of chess.
//!
//! The editor only ever talks to a [`RulesEngine`]: it loads positions,
//! submits move requests and reads back FEN and the applied-move log.

use thiserror::Error;

use crate::game_state::chess_types::{PieceKind, Square};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
    #[error("illegal move: {0}")]
    IllegalMove(String),
    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),
    #[error("rules engine failure: {0}")]
    Internal(String),
}

/// A move the caller would like to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveRequest {
    /// Board interaction: origin and target squares.
    Squares {
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    },
    /// Typed notation. `tolerant` accepts sloppy SAN and coordinate moves.
    Notation { text: String, tolerant: bool },
}

impl MoveRequest {
    pub fn notation(text: impl Into<String>, tolerant: bool) -> Self {
        MoveRequest::Notation {
            text: text.into(),
            tolerant,
        }
    }
}

/// A move the engine accepted and played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    pub from: Square,
    pub to: Square,
    pub san: String,
    pub fen_before: String,
    pub fen_after: String,
}

pub trait RulesEngine: Clone {
    /// Replace the position and clear the move log. On error the engine is
    /// left unchanged.
    fn load(&mut self, fen: &str) -> Result<(), RulesError>;

    /// Validate and play a move. On error the engine is left unchanged.
    fn apply(&mut self, request: &MoveRequest) -> Result<AppliedMove, RulesError>;

    fn fen(&self) -> String;

    /// Moves applied since the last `load`.
    fn history(&self) -> &[AppliedMove];
}

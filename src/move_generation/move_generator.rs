//! Shared types for the move-generation pipeline.

use thiserror::Error;

use crate::game_state::board_state::BoardState;
use crate::game_state::chess_types::Square;
use crate::moves::move_descriptions::MoveDescription;

pub type MoveGenResult<T> = Result<T, MoveGenerationError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveGenerationError {
    #[error("no piece on from-square {0}")]
    EmptyFromSquare(Square),
    #[error("invalid game state: {0}")]
    InvalidState(String),
}

/// A legal move paired with the position it produces.
#[derive(Debug, Clone)]
pub struct GeneratedMove {
    pub move_description: MoveDescription,
    pub game_after_move: BoardState,
}

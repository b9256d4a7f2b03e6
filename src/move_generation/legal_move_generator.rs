//! Full legal move generation pipeline.
//!
//! Generates pseudo-legal candidates, applies each one and drops those that
//! leave the mover's king attacked.

use crate::game_state::board_state::BoardState;
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenResult, MoveGenerationError};
use crate::move_generation::pseudo_moves::generate_pseudo_legal_moves;
use crate::moves::move_descriptions::MoveDescription;

pub fn generate_legal_moves(board: &BoardState) -> MoveGenResult<Vec<GeneratedMove>> {
    let mut pseudo = Vec::<MoveDescription>::with_capacity(128);
    generate_pseudo_legal_moves(board, &mut pseudo);

    let mut legal = Vec::<GeneratedMove>::with_capacity(pseudo.len());
    for mv in pseudo {
        let next = apply_move(board, mv).map_err(|x| {
            MoveGenerationError::InvalidState(format!("apply_move failed: {x}"))
        })?;

        // Illegal if own king is in check after move.
        if is_king_in_check(&next, board.side_to_move) {
            continue;
        }

        legal.push(GeneratedMove {
            move_description: mv,
            game_after_move: next,
        });
    }

    Ok(legal)
}

/// Side to move is checkmated.
pub fn is_checkmate(board: &BoardState) -> MoveGenResult<bool> {
    Ok(is_king_in_check(board, board.side_to_move) && generate_legal_moves(board)?.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{generate_legal_moves, is_checkmate};
    use crate::game_state::board_state::BoardState;

    #[test]
    fn pinned_piece_cannot_leave_the_pin_line() {
        // e2 knight is pinned by the e8 rook.
        let board = BoardState::from_fen("4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1")
            .expect("FEN should parse");
        let moves = generate_legal_moves(&board).expect("generation should succeed");
        assert!(moves
            .iter()
            .all(|m| m.move_description.from() != 12));
    }

    #[test]
    fn fools_mate_is_checkmate() {
        let board = BoardState::from_fen(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
        )
        .expect("FEN should parse");
        assert!(generate_legal_moves(&board)
            .expect("generation should succeed")
            .is_empty());
        assert!(is_checkmate(&board).expect("generation should succeed"));
        assert!(!is_checkmate(&BoardState::new_game()).expect("generation should succeed"));
    }
}

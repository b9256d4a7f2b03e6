//! Copy-make move application.
//!
//! Produces the successor position for a packed move, updating castling
//! rights, en-passant target, clocks and occupancy caches.

use crate::game_state::{board_state::BoardState, chess_types::*};
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerationError};
use crate::moves::move_descriptions::{MoveDescription, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT};

pub fn apply_move(board: &BoardState, mv: MoveDescription) -> MoveGenResult<BoardState> {
    let from = mv.from();
    let to = mv.to();

    let moving_color = board.side_to_move;
    let enemy_color = moving_color.opposite();

    let moved_piece = board
        .piece_of_color_at(moving_color, from)
        .ok_or(MoveGenerationError::EmptyFromSquare(from))?;

    let mut next = board.clone();
    next.pieces[moving_color.index()][moved_piece.index()] &= !(1u64 << from);

    if mv.has_flag(FLAG_EN_PASSANT) {
        let capture_sq = match moving_color {
            Color::White => to.checked_sub(8),
            Color::Black => to.checked_add(8),
        }
        .ok_or_else(|| {
            MoveGenerationError::InvalidState(format!("bad en-passant target {to}"))
        })?;
        next.clear_square(enemy_color, capture_sq);
    } else if mv.is_capture() {
        next.clear_square(enemy_color, to);
    }

    let placed = mv.promotion_piece().unwrap_or(moved_piece);
    next.put_piece(moving_color, placed, to);

    if mv.is_castling() && moved_piece == PieceKind::King {
        let (rook_from, rook_to) = if to > from {
            (from + 3, from + 1)
        } else {
            (from - 4, from - 1)
        };
        next.clear_square(moving_color, rook_from);
        next.put_piece(moving_color, PieceKind::Rook, rook_to);
    }

    update_castling_rights(&mut next, moving_color, from, to, moved_piece);

    next.en_passant_square = if mv.has_flag(FLAG_DOUBLE_PAWN_PUSH) {
        Some((from + to) / 2)
    } else {
        None
    };

    if moved_piece == PieceKind::Pawn || mv.is_capture() {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
    }
    if moving_color == Color::Black {
        next.fullmove_number = next.fullmove_number.saturating_add(1);
    }

    next.side_to_move = enemy_color;
    next.recalc_occupancy();

    Ok(next)
}

fn update_castling_rights(
    board: &mut BoardState,
    moving_color: Color,
    from: Square,
    to: Square,
    moved_piece: PieceKind,
) {
    if moved_piece == PieceKind::King {
        board.castling_rights &= match moving_color {
            Color::White => !(CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE),
            Color::Black => !(CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE),
        };
    }

    // Any move from or onto a rook corner (rook moving, rook captured) drops
    // that corner's right.
    for square in [from, to] {
        board.castling_rights &= match square {
            0 => !CASTLE_WHITE_QUEENSIDE,
            7 => !CASTLE_WHITE_KINGSIDE,
            56 => !CASTLE_BLACK_QUEENSIDE,
            63 => !CASTLE_BLACK_KINGSIDE,
            _ => !0,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::apply_move;
    use crate::game_state::board_state::BoardState;
    use crate::game_state::chess_types::PieceKind;
    use crate::moves::move_descriptions::{
        MoveDescription, FLAG_CAPTURE, FLAG_CASTLING, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT,
    };

    #[test]
    fn double_push_sets_en_passant_target() {
        let board = BoardState::new_game();
        let mv = MoveDescription::pack(12, 28, PieceKind::Pawn, None, None, FLAG_DOUBLE_PAWN_PUSH);
        let next = apply_move(&board, mv).expect("e2e4 should apply");
        assert_eq!(
            next.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn castling_moves_the_rook_and_clears_rights() {
        let board =
            BoardState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10").expect("FEN should parse");
        let mv = MoveDescription::pack(4, 6, PieceKind::King, None, None, FLAG_CASTLING);
        let next = apply_move(&board, mv).expect("O-O should apply");
        assert_eq!(next.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 4 10");
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let board =
            BoardState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 5").expect("FEN should parse");
        let mv = MoveDescription::pack(
            36,
            43,
            PieceKind::Pawn,
            Some(PieceKind::Pawn),
            None,
            FLAG_CAPTURE | FLAG_EN_PASSANT,
        );
        let next = apply_move(&board, mv).expect("exd6 should apply");
        assert_eq!(next.to_fen(), "4k3/8/3P4/8/8/8/8/4K3 b - - 0 5");
    }

    #[test]
    fn capturing_a_corner_rook_drops_that_right() {
        let board = BoardState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")
            .expect("FEN should parse");
        let mv = MoveDescription::pack(
            0,
            56,
            PieceKind::Rook,
            Some(PieceKind::Rook),
            None,
            FLAG_CAPTURE,
        );
        let next = apply_move(&board, mv).expect("Rxa8 should apply");
        assert_eq!(next.to_fen(), "R3k2r/8/8/8/8/8/8/4K2R b Kk - 0 1");
    }

    #[test]
    fn empty_from_square_is_an_error() {
        let board = BoardState::new_game();
        let mv = MoveDescription::pack(28, 36, PieceKind::Pawn, None, None, 0);
        assert!(apply_move(&board, mv).is_err());
    }
}

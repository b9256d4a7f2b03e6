//! Attack and check detection.

use crate::game_state::{board_state::BoardState, chess_types::*};
use crate::moves::attack_tables::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};

#[inline]
pub fn king_square(board: &BoardState, color: Color) -> Option<Square> {
    let kings = board.bitboard(color, PieceKind::King);
    if kings == 0 {
        None
    } else {
        Some(kings.trailing_zeros() as Square)
    }
}

#[inline]
pub fn is_king_in_check(board: &BoardState, color: Color) -> bool {
    let Some(king_sq) = king_square(board, color) else {
        return false;
    };
    is_square_attacked(board, king_sq, color.opposite())
}

pub fn is_square_attacked(board: &BoardState, square: Square, attacker_color: Color) -> bool {
    // A pawn of the defending color on `square` would capture exactly the
    // squares attacker pawns must stand on.
    let attacker_pawns = board.bitboard(attacker_color, PieceKind::Pawn);
    if pawn_attacks(attacker_color.opposite(), square) & attacker_pawns != 0 {
        return true;
    }

    if knight_attacks(square) & board.bitboard(attacker_color, PieceKind::Knight) != 0 {
        return true;
    }

    if king_attacks(square) & board.bitboard(attacker_color, PieceKind::King) != 0 {
        return true;
    }

    let queens = board.bitboard(attacker_color, PieceKind::Queen);
    let bishops_queens = board.bitboard(attacker_color, PieceKind::Bishop) | queens;
    if bishop_attacks(square, board.occupancy_all) & bishops_queens != 0 {
        return true;
    }

    let rooks_queens = board.bitboard(attacker_color, PieceKind::Rook) | queens;
    rook_attacks(square, board.occupancy_all) & rooks_queens != 0
}

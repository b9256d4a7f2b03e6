//! Pseudo-legal move generation.
//!
//! Emits packed move descriptions for the side to move. Moves that leave the
//! mover's own king in check are filtered later by the legal generator.

use crate::game_state::chess_rules::{KING_HOME_SQUARE, PAWN_START_RANK, PROMOTION_RANK};
use crate::game_state::{board_state::BoardState, chess_types::*};
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::moves::attack_tables::{pawn_attacks, piece_attacks};
use crate::moves::move_descriptions::{
    MoveDescription, FLAG_CAPTURE, FLAG_CASTLING, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT,
};

pub fn generate_pseudo_legal_moves(board: &BoardState, out: &mut Vec<MoveDescription>) {
    generate_pawn_moves(board, out);
    for piece in [
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ] {
        generate_piece_moves(board, piece, out);
    }
    generate_castling_moves(board, out);
}

fn generate_piece_moves(board: &BoardState, piece: PieceKind, out: &mut Vec<MoveDescription>) {
    let side = board.side_to_move;
    let own_occ = board.occupancy_by_color[side.index()];
    let enemy_occ = board.occupancy_by_color[side.opposite().index()];

    let mut pieces = board.bitboard(side, piece);
    while pieces != 0 {
        let from = pieces.trailing_zeros() as Square;
        let mut targets = piece_attacks(piece, from, board.occupancy_all) & !own_occ;

        while targets != 0 {
            let to = targets.trailing_zeros() as Square;
            let captured = if (1u64 << to) & enemy_occ != 0 {
                board.piece_of_color_at(side.opposite(), to)
            } else {
                None
            };
            let flags = if captured.is_some() { FLAG_CAPTURE } else { 0 };
            out.push(MoveDescription::pack(from, to, piece, captured, None, flags));
            targets &= targets - 1;
        }

        pieces &= pieces - 1;
    }
}

fn generate_pawn_moves(board: &BoardState, out: &mut Vec<MoveDescription>) {
    let side = board.side_to_move;
    let enemy = side.opposite();
    let enemy_occ = board.occupancy_by_color[enemy.index()];
    let empty = !board.occupancy_all;
    let promotion_rank = PROMOTION_RANK[side.index()];

    let mut pawns = board.bitboard(side, PieceKind::Pawn);
    while pawns != 0 {
        let from = pawns.trailing_zeros() as Square;
        pawns &= pawns - 1;

        let one_step = match side {
            Color::White => from.checked_add(8),
            Color::Black => from.checked_sub(8),
        };

        if let Some(to) = one_step.filter(|to| *to < 64 && (1u64 << to) & empty != 0) {
            if square_rank(to) == promotion_rank {
                push_promotions(out, from, to, None, 0);
            } else {
                out.push(MoveDescription::pack(from, to, PieceKind::Pawn, None, None, 0));

                if square_rank(from) == PAWN_START_RANK[side.index()] {
                    let two_step = match side {
                        Color::White => from + 16,
                        Color::Black => from - 16,
                    };
                    if (1u64 << two_step) & empty != 0 {
                        out.push(MoveDescription::pack(
                            from,
                            two_step,
                            PieceKind::Pawn,
                            None,
                            None,
                            FLAG_DOUBLE_PAWN_PUSH,
                        ));
                    }
                }
            }
        }

        let mut captures = pawn_attacks(side, from);
        while captures != 0 {
            let to = captures.trailing_zeros() as Square;
            captures &= captures - 1;

            if (1u64 << to) & enemy_occ != 0 {
                let captured = board.piece_of_color_at(enemy, to);
                if square_rank(to) == promotion_rank {
                    push_promotions(out, from, to, captured, FLAG_CAPTURE);
                } else {
                    out.push(MoveDescription::pack(
                        from,
                        to,
                        PieceKind::Pawn,
                        captured,
                        None,
                        FLAG_CAPTURE,
                    ));
                }
            } else if board.en_passant_square == Some(to) {
                out.push(MoveDescription::pack(
                    from,
                    to,
                    PieceKind::Pawn,
                    Some(PieceKind::Pawn),
                    None,
                    FLAG_CAPTURE | FLAG_EN_PASSANT,
                ));
            }
        }
    }
}

fn push_promotions(
    out: &mut Vec<MoveDescription>,
    from: Square,
    to: Square,
    captured: Option<PieceKind>,
    flags: u64,
) {
    for promo in PieceKind::PROMOTIONS {
        out.push(MoveDescription::pack(
            from,
            to,
            PieceKind::Pawn,
            captured,
            Some(promo),
            flags,
        ));
    }
}

fn generate_castling_moves(board: &BoardState, out: &mut Vec<MoveDescription>) {
    let side = board.side_to_move;
    let enemy = side.opposite();
    let king_from = KING_HOME_SQUARE[side.index()];

    if board.piece_of_color_at(side, king_from) != Some(PieceKind::King) {
        return;
    }
    // Cannot castle out of check.
    if is_square_attacked(board, king_from, enemy) {
        return;
    }

    let (kingside, queenside) = match side {
        Color::White => (CASTLE_WHITE_KINGSIDE, CASTLE_WHITE_QUEENSIDE),
        Color::Black => (CASTLE_BLACK_KINGSIDE, CASTLE_BLACK_QUEENSIDE),
    };

    // (right, squares that must be empty, squares the king crosses, king target)
    let wings = [
        (kingside, [1u8, 2, 0], [1u8, 2], king_from + 2),
        (queenside, [1u8, 2, 3], [1u8, 2], king_from - 2),
    ];

    for (right, must_be_empty, crossed, king_to) in wings {
        if board.castling_rights & right == 0 {
            continue;
        }
        let toward_h = king_to > king_from;
        let offset = |d: u8| if toward_h { king_from + d } else { king_from - d };
        let rook_square = if toward_h { king_from + 3 } else { king_from - 4 };
        if board.piece_of_color_at(side, rook_square) != Some(PieceKind::Rook) {
            continue;
        }

        let blocked = must_be_empty
            .iter()
            .filter(|d| **d != 0)
            .any(|d| board.occupancy_all & (1u64 << offset(*d)) != 0);
        if blocked {
            continue;
        }
        if crossed.iter().any(|d| is_square_attacked(board, offset(*d), enemy)) {
            continue;
        }

        out.push(MoveDescription::pack(
            king_from,
            king_to,
            PieceKind::King,
            None,
            None,
            FLAG_CASTLING,
        ));
    }
}

//! Coordinate ("long algebraic") notation: `e2e4`, `e7e8q`.
//!
//! Text is resolved against the legal move list, so any move returned here
//! is playable in the given position.

use crate::game_state::chess_types::{PieceKind, Square};
use crate::move_generation::move_generator::GeneratedMove;
use crate::moves::move_descriptions::MoveDescription;
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

pub fn move_description_to_long_algebraic(mv: MoveDescription) -> String {
    let mut out = square_to_algebraic(mv.from());
    out.push_str(&square_to_algebraic(mv.to()));
    if let Some(promotion) = mv.promotion_piece() {
        out.push(promotion.fen_char());
    }
    out
}

/// Split `e7e8q` into squares and an optional promotion piece. Does not
/// consult any position.
pub fn parse_long_algebraic(text: &str) -> Option<(Square, Square, Option<PieceKind>)> {
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return None;
    }

    let from = algebraic_to_square(&text[0..2])?;
    let to = algebraic_to_square(&text[2..4])?;
    let promotion = match text[4..].chars().next() {
        Some(ch) => Some(PieceKind::from_fen_char(ch).filter(|p| p.is_promotion_target())?),
        None => None,
    };

    Some((from, to, promotion))
}

/// Legal move from `from` to `to`. The promotion piece is only compared
/// when the candidate actually promotes.
pub fn find_legal_move(
    legal_moves: &[GeneratedMove],
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
) -> Option<&GeneratedMove> {
    legal_moves.iter().find(|candidate| {
        let mv = candidate.move_description;
        mv.from() == from
            && mv.to() == to
            && match mv.promotion_piece() {
                Some(piece) => promotion == Some(piece),
                None => true,
            }
    })
}

pub fn long_algebraic_to_legal_move<'a>(
    text: &str,
    legal_moves: &'a [GeneratedMove],
) -> Option<&'a GeneratedMove> {
    let (from, to, promotion) = parse_long_algebraic(text)?;
    find_legal_move(legal_moves, from, to, promotion)
}

#[cfg(test)]
mod tests {
    use super::{long_algebraic_to_legal_move, move_description_to_long_algebraic, parse_long_algebraic};
    use crate::game_state::board_state::BoardState;
    use crate::game_state::chess_types::PieceKind;
    use crate::move_generation::legal_move_generator::generate_legal_moves;
    use crate::moves::move_descriptions::FLAG_DOUBLE_PAWN_PUSH;

    #[test]
    fn resolves_a_double_push() {
        let board = BoardState::new_game();
        let legal = generate_legal_moves(&board).expect("generation should succeed");
        let found = long_algebraic_to_legal_move("e2e4", &legal).expect("e2e4 should be legal");
        assert!(found.move_description.has_flag(FLAG_DOUBLE_PAWN_PUSH));
        assert_eq!(move_description_to_long_algebraic(found.move_description), "e2e4");
        assert!(long_algebraic_to_legal_move("e2e5", &legal).is_none());
    }

    #[test]
    fn promotion_requires_the_piece_letter() {
        let board = BoardState::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").expect("FEN should parse");
        let legal = generate_legal_moves(&board).expect("generation should succeed");
        let found = long_algebraic_to_legal_move("a7a8n", &legal).expect("a7a8n should be legal");
        assert_eq!(found.move_description.promotion_piece(), Some(PieceKind::Knight));
        assert!(long_algebraic_to_legal_move("a7a8", &legal).is_none());
        assert_eq!(move_description_to_long_algebraic(found.move_description), "a7a8n");
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(parse_long_algebraic("e2").is_none());
        assert!(parse_long_algebraic("e2e4k").is_none());
        assert!(parse_long_algebraic("z2e4").is_none());
        assert_eq!(
            parse_long_algebraic("e7e8Q"),
            Some((52, 60, Some(PieceKind::Queen)))
        );
    }
}

//! FEN-to-BoardState parser.
//!
//! Builds a fully-populated position from a Forsyth-Edwards Notation string
//! and rejects positions the rules engine cannot play from: wrong king
//! counts, pawns on a back rank, an en-passant square on the wrong rank, or
//! the side that just moved still standing in check.

use thiserror::Error;

use crate::game_state::{board_state::BoardState, chess_types::*};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::utils::algebraic::algebraic_to_square;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("FEN must have 6 space-separated fields, found {0}")]
    FieldCount(usize),
    #[error("board layout must contain 8 ranks")]
    RankCount,
    #[error("rank {rank} does not sum to 8 files")]
    RankWidth { rank: usize },
    #[error("invalid piece character '{0}' in board layout")]
    PieceChar(char),
    #[error("invalid side-to-move field: {0}")]
    SideToMove(String),
    #[error("invalid castling rights field: {0}")]
    Castling(String),
    #[error("invalid en-passant square: {0}")]
    EnPassant(String),
    #[error("invalid halfmove clock: {0}")]
    HalfmoveClock(String),
    #[error("invalid fullmove number: {0}")]
    FullmoveNumber(String),
    #[error("{color:?} must have exactly one king, found {count}")]
    KingCount { color: Color, count: u32 },
    #[error("pawns may not stand on the first or eighth rank")]
    PawnOnBackRank,
    #[error("side not to move is in check")]
    OpponentInCheck,
}

const BACK_RANKS: u64 = 0xFF00_0000_0000_00FF;

pub fn parse_fen(fen: &str) -> Result<BoardState, FenError> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    let &[board_part, side_part, castling_part, en_passant_part, halfmove_part, fullmove_part] =
        parts.as_slice()
    else {
        return Err(FenError::FieldCount(parts.len()));
    };

    let mut board = BoardState::new_empty();

    parse_board(board_part, &mut board)?;
    board.side_to_move = parse_side_to_move(side_part)?;
    board.castling_rights = parse_castling_rights(castling_part)?;
    board.en_passant_square = parse_en_passant_square(en_passant_part, board.side_to_move)?;
    board.halfmove_clock = halfmove_part
        .parse::<u32>()
        .map_err(|_| FenError::HalfmoveClock(halfmove_part.to_owned()))?;
    board.fullmove_number = fullmove_part
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| FenError::FullmoveNumber(fullmove_part.to_owned()))?;

    board.recalc_occupancy();
    validate_position(&board)?;

    Ok(board)
}

fn parse_board(board_part: &str, board: &mut BoardState) -> Result<(), FenError> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::RankCount);
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx;
        let mut file = 0usize;
        let mut previous_was_digit = false;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                // Adjacent digits ("44") are not valid FEN.
                if !(1..=8).contains(&empty_count) || previous_was_digit {
                    return Err(FenError::RankWidth { rank: board_rank + 1 });
                }
                file += empty_count as usize;
                previous_was_digit = true;
                continue;
            }
            previous_was_digit = false;

            let piece = PieceKind::from_fen_char(ch).ok_or(FenError::PieceChar(ch))?;
            let color = if ch.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };

            if file >= 8 {
                return Err(FenError::RankWidth { rank: board_rank + 1 });
            }

            board.put_piece(color, piece, (board_rank * 8 + file) as Square);
            file += 1;
        }

        if file != 8 {
            return Err(FenError::RankWidth { rank: board_rank + 1 });
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, FenError> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(FenError::SideToMove(side_part.to_owned())),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, FenError> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;
    for ch in castling_part.chars() {
        let bit = match ch {
            'K' => CASTLE_WHITE_KINGSIDE,
            'Q' => CASTLE_WHITE_QUEENSIDE,
            'k' => CASTLE_BLACK_KINGSIDE,
            'q' => CASTLE_BLACK_QUEENSIDE,
            _ => return Err(FenError::Castling(castling_part.to_owned())),
        };
        if rights & bit != 0 {
            return Err(FenError::Castling(castling_part.to_owned()));
        }
        rights |= bit;
    }

    Ok(rights)
}

fn parse_en_passant_square(
    en_passant_part: &str,
    side_to_move: Color,
) -> Result<Option<Square>, FenError> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let square = algebraic_to_square(en_passant_part)
        .ok_or_else(|| FenError::EnPassant(en_passant_part.to_owned()))?;
    // White to move captures onto rank 6, black onto rank 3.
    let expected_rank = match side_to_move {
        Color::White => 5,
        Color::Black => 2,
    };
    if square_rank(square) != expected_rank {
        return Err(FenError::EnPassant(en_passant_part.to_owned()));
    }

    Ok(Some(square))
}

fn validate_position(board: &BoardState) -> Result<(), FenError> {
    for color in Color::BOTH {
        let count = board.bitboard(color, PieceKind::King).count_ones();
        if count != 1 {
            return Err(FenError::KingCount { color, count });
        }
    }

    let pawns = board.bitboard(Color::White, PieceKind::Pawn)
        | board.bitboard(Color::Black, PieceKind::Pawn);
    if pawns & BACK_RANKS != 0 {
        return Err(FenError::PawnOnBackRank);
    }

    if is_king_in_check(board, board.side_to_move.opposite()) {
        return Err(FenError::OpponentInCheck);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_fen, FenError};
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Color, PieceKind, CASTLE_WHITE_KINGSIDE};

    #[test]
    fn parses_starting_position() {
        let board = parse_fen(STARTING_POSITION_FEN).expect("start FEN should parse");
        assert_eq!(board.side_to_move, Color::White);
        assert_eq!(board.castling_rights.count_ones(), 4);
        assert_eq!(board.piece_at(3), Some((Color::White, PieceKind::Queen)));
        assert_eq!(board.occupancy_all.count_ones(), 32);
    }

    #[test]
    fn parses_side_rights_and_en_passant() {
        let board = parse_fen("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b K e3 0 3")
            .expect("FEN should parse");
        assert_eq!(board.side_to_move, Color::Black);
        assert_eq!(board.castling_rights, CASTLE_WHITE_KINGSIDE);
        assert_eq!(board.en_passant_square, Some(20));
        assert_eq!(board.fullmove_number, 3);
    }

    #[test]
    fn accepts_clocks_past_sixteen_bits() {
        let fen = "4k3/8/8/8/8/8/8/4K3 w - - 70000 123456";
        let board = parse_fen(fen).expect("large clocks should parse");
        assert_eq!(board.halfmove_clock, 70_000);
        assert_eq!(board.fullmove_number, 123_456);
        assert_eq!(board.to_fen(), fen);
    }

    #[test]
    fn rejects_malformed_fields() {
        assert_eq!(
            parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"),
            Err(FenError::FieldCount(4))
        );
        assert_eq!(
            parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1"),
            Err(FenError::RankCount)
        );
        assert!(matches!(
            parse_fen("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::RankWidth { rank: 7 })
        ));
        assert_eq!(
            parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"),
            Err(FenError::SideToMove("x".to_owned()))
        );
        assert!(parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 0").is_err());
        assert!(parse_fen("rnbqkbnr/pppppppp/44/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").is_err());
        assert!(parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4 0 1").is_err());
    }

    #[test]
    fn rejects_unplayable_positions() {
        assert!(matches!(
            parse_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::KingCount { color: Color::Black, count: 0 })
        ));
        assert_eq!(
            parse_fen("P3k3/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::PawnOnBackRank)
        );
        // White to move while the black king is attacked.
        assert_eq!(
            parse_fen("4k3/8/8/8/8/8/8/4R1K1 w - - 0 1"),
            Err(FenError::OpponentInCheck)
        );
    }
}

//! Standard Algebraic Notation.
//!
//! Formatting follows the usual rules: piece letter, minimal disambiguation,
//! `x` for captures, `=Q` for promotions and a `+`/`#` suffix. Parsing has a
//! strict mode and a tolerant mode for hand-typed movetext; both resolve
//! against the legal move list and require exactly one match.

use thiserror::Error;

use crate::game_state::chess_types::{square_file, square_rank, PieceKind, Square};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenResult};
use crate::utils::algebraic::{algebraic_to_square, file_char, rank_char, square_to_algebraic};
use crate::utils::long_algebraic::long_algebraic_to_legal_move;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanError {
    #[error("invalid SAN: {0}")]
    InvalidFormat(String),
    #[error("no legal move matches {0}")]
    NoLegalMove(String),
    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),
}

/// A parsed SAN token, not yet checked against a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum San {
    Normal {
        role: PieceKind,
        file: Option<u8>,
        rank: Option<u8>,
        capture: bool,
        to: Square,
        promotion: Option<PieceKind>,
    },
    CastleShort,
    CastleLong,
}

pub fn parse_san(text: &str, tolerant: bool) -> Result<San, SanError> {
    let invalid = || SanError::InvalidFormat(text.to_owned());

    let stripped = if tolerant {
        text.trim_end_matches(&['+', '#', '!', '?'][..])
    } else {
        text.trim_end_matches(&['+', '#'][..])
    };

    match stripped {
        "O-O" => return Ok(San::CastleShort),
        "O-O-O" => return Ok(San::CastleLong),
        "0-0" if tolerant => return Ok(San::CastleShort),
        "0-0-0" if tolerant => return Ok(San::CastleLong),
        _ => {}
    }

    let mut chars: Vec<char> = stripped.chars().collect();

    let role = match chars.first() {
        Some(ch) if ch.is_ascii_uppercase() => {
            let role = PieceKind::from_fen_char(*ch)
                .filter(|p| *p != PieceKind::Pawn)
                .ok_or_else(invalid)?;
            chars.remove(0);
            role
        }
        Some(_) => PieceKind::Pawn,
        None => return Err(invalid()),
    };

    let promotion = take_promotion(&mut chars, tolerant).ok_or_else(invalid)?;
    if promotion.is_some() && role != PieceKind::Pawn {
        return Err(invalid());
    }

    let capture_marks = chars.iter().filter(|c| **c == 'x').count();
    if !tolerant {
        // A single `x`, directly before the destination square.
        let well_placed = chars.len() >= 3 && chars[chars.len() - 3] == 'x';
        if capture_marks > 1 || (capture_marks == 1 && !well_placed) {
            return Err(invalid());
        }
    }
    let body: String = chars.iter().filter(|c| **c != 'x').collect();
    if !body.is_ascii() || !(2..=4).contains(&body.len()) {
        return Err(invalid());
    }

    let (disambiguation, destination) = body.split_at(body.len() - 2);
    let to = algebraic_to_square(destination).ok_or_else(invalid)?;

    let mut file = None;
    let mut rank = None;
    for ch in disambiguation.chars() {
        match ch {
            'a'..='h' if file.is_none() && rank.is_none() => file = Some(ch as u8 - b'a'),
            '1'..='8' if rank.is_none() => rank = Some(ch as u8 - b'1'),
            _ => return Err(invalid()),
        }
    }

    Ok(San::Normal {
        role,
        file,
        rank,
        capture: capture_marks > 0,
        to,
        promotion,
    })
}

/// Strip a trailing promotion piece. `Some(None)` means no promotion,
/// `None` means malformed.
fn take_promotion(chars: &mut Vec<char>, tolerant: bool) -> Option<Option<PieceKind>> {
    let len = chars.len();
    if len < 3 {
        return Some(None);
    }

    let last = chars[len - 1];
    let before = chars[len - 2];
    if !(last.is_ascii_uppercase() || (tolerant && last.is_ascii_lowercase())) {
        return Some(None);
    }

    let has_equals = before == '=';
    if !has_equals && !(tolerant && before.is_ascii_digit()) {
        // Lowercase letters after a file are part of the body.
        return if last.is_ascii_uppercase() { None } else { Some(None) };
    }

    let piece = PieceKind::from_fen_char(last).filter(|p| p.is_promotion_target())?;
    chars.truncate(if has_equals { len - 2 } else { len - 1 });
    Some(Some(piece))
}

impl San {
    /// Resolve against the legal moves of a position.
    pub fn to_move<'a>(
        &self,
        legal_moves: &'a [GeneratedMove],
        tolerant: bool,
        text: &str,
    ) -> Result<&'a GeneratedMove, SanError> {
        let mut candidates = legal_moves.iter().filter(|candidate| {
            let mv = candidate.move_description;
            match *self {
                San::Normal {
                    role,
                    file,
                    rank,
                    capture,
                    to,
                    promotion,
                } => {
                    !mv.is_castling()
                        && mv.moved_piece() == role
                        && mv.to() == to
                        && file.map_or(true, |f| f == square_file(mv.from()))
                        && rank.map_or(true, |r| r == square_rank(mv.from()))
                        && mv.promotion_piece() == promotion
                        && (tolerant || capture == mv.is_capture())
                }
                San::CastleShort => mv.is_kingside_castle(),
                San::CastleLong => mv.is_castling() && !mv.is_kingside_castle(),
            }
        });

        match (candidates.next(), candidates.next()) {
            (Some(found), None) => Ok(found),
            (Some(_), Some(_)) => Err(SanError::AmbiguousMove(text.to_owned())),
            (None, _) => Err(SanError::NoLegalMove(text.to_owned())),
        }
    }
}

/// Parse and resolve `text` in one step. Tolerant mode also accepts
/// coordinate notation.
pub fn resolve_san<'a>(
    text: &str,
    legal_moves: &'a [GeneratedMove],
    tolerant: bool,
) -> Result<&'a GeneratedMove, SanError> {
    if tolerant {
        if let Some(found) = long_algebraic_to_legal_move(text, legal_moves) {
            return Ok(found);
        }
    }
    let found = parse_san(text, tolerant)?.to_move(legal_moves, tolerant, text)?;
    // Strict input must be the canonical spelling, check marks aside.
    if !tolerant && san_without_suffix(found, legal_moves) != text.trim_end_matches(&['+', '#'][..]) {
        return Err(SanError::NoLegalMove(text.to_owned()));
    }
    Ok(found)
}

/// SAN for a legal move, including the check or mate suffix.
pub fn san_for_move(
    generated: &GeneratedMove,
    legal_moves: &[GeneratedMove],
) -> MoveGenResult<String> {
    let mut out = san_without_suffix(generated, legal_moves);

    let after = &generated.game_after_move;
    if is_king_in_check(after, after.side_to_move) {
        if generate_legal_moves(after)?.is_empty() {
            out.push('#');
        } else {
            out.push('+');
        }
    }

    Ok(out)
}

fn san_without_suffix(
    generated: &GeneratedMove,
    legal_moves: &[GeneratedMove],
) -> String {
    let mv = generated.move_description;
    if mv.is_castling() {
        return if mv.is_kingside_castle() { "O-O" } else { "O-O-O" }.to_owned();
    }

    let from = mv.from();
    let role = mv.moved_piece();
    let mut out = String::with_capacity(8);

    if role == PieceKind::Pawn {
        if mv.is_capture() {
            out.push(file_char(from));
        }
    } else {
        out.push(role.fen_char().to_ascii_uppercase());

        // File if it tells the rivals apart, else rank, else both.
        let (rivals, same_file, same_rank) = legal_moves
            .iter()
            .map(|other| other.move_description)
            .filter(|other| {
                other.moved_piece() == role && other.to() == mv.to() && other.from() != from
            })
            .fold((0, 0, 0), |(rivals, file, rank), other| {
                (
                    rivals + 1,
                    file + usize::from(square_file(other.from()) == square_file(from)),
                    rank + usize::from(square_rank(other.from()) == square_rank(from)),
                )
            });
        let need_file = rivals > 0 && (same_file == 0 || same_rank > 0);
        let need_rank = same_file > 0;

        if need_file {
            out.push(file_char(from));
        }
        if need_rank {
            out.push(rank_char(from));
        }
    }

    if mv.is_capture() {
        out.push('x');
    }
    out.push_str(&square_to_algebraic(mv.to()));

    if let Some(promotion) = mv.promotion_piece() {
        out.push('=');
        out.push(promotion.fen_char().to_ascii_uppercase());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{parse_san, resolve_san, san_for_move, San, SanError};
    use crate::game_state::board_state::BoardState;
    use crate::game_state::chess_types::PieceKind;
    use crate::move_generation::legal_move_generator::generate_legal_moves;

    fn san_list(fen: &str) -> Vec<String> {
        let board = BoardState::from_fen(fen).expect("FEN should parse");
        let legal = generate_legal_moves(&board).expect("generation should succeed");
        legal
            .iter()
            .map(|m| san_for_move(m, &legal).expect("SAN should format"))
            .collect()
    }

    fn resolve(fen: &str, text: &str, tolerant: bool) -> Result<String, SanError> {
        let board = BoardState::from_fen(fen).expect("FEN should parse");
        let legal = generate_legal_moves(&board).expect("generation should succeed");
        resolve_san(text, &legal, tolerant)
            .map(|m| san_for_move(m, &legal).expect("SAN should format"))
    }

    #[test]
    fn parses_standard_tokens() {
        assert_eq!(
            parse_san("Nbd7", false),
            Ok(San::Normal {
                role: PieceKind::Knight,
                file: Some(1),
                rank: None,
                capture: false,
                to: 51,
                promotion: None,
            })
        );
        assert_eq!(parse_san("O-O-O+", false), Ok(San::CastleLong));
        assert!(matches!(
            parse_san("exd8=Q#", false),
            Ok(San::Normal { promotion: Some(PieceKind::Queen), capture: true, .. })
        ));
        assert!(parse_san("e8Q", false).is_err());
        assert!(parse_san("Nf3!?", false).is_err());
        assert!(parse_san("", false).is_err());
        assert!(parse_san("Zf3", true).is_err());
    }

    #[test]
    fn formats_start_position_moves() {
        let sans = san_list("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(sans.len(), 20);
        assert!(sans.contains(&"e4".to_owned()));
        assert!(sans.contains(&"Nf3".to_owned()));
        assert!(sans.contains(&"Na3".to_owned()));
    }

    #[test]
    fn disambiguates_by_file_then_rank() {
        // Knights on b1 and f1 both reach d2; rooks on a1 and a5 both reach a3.
        let sans = san_list("4k3/8/8/R7/8/8/8/RN2KN2 w - - 0 1");
        assert!(sans.contains(&"Nbd2".to_owned()));
        assert!(sans.contains(&"Nfd2".to_owned()));
        assert!(sans.contains(&"R1a3".to_owned()));
        assert!(sans.contains(&"R5a3".to_owned()));
        assert!(sans.contains(&"Rb5".to_owned()));
    }

    #[test]
    fn three_queens_use_the_shortest_disambiguation() {
        let fen = "8/8/8/7k/8/Q1Q5/8/Q6K w - - 0 1";
        let mut to_b2: Vec<String> = san_list(fen)
            .into_iter()
            .filter(|san| san.ends_with("b2"))
            .collect();
        to_b2.sort();
        assert_eq!(to_b2, ["Q1b2", "Qa3b2", "Qcb2"]);

        assert_eq!(resolve(fen, "Q1b2", false), Ok("Q1b2".to_owned()));
        assert_eq!(
            resolve(fen, "Qa1b2", false),
            Err(SanError::NoLegalMove("Qa1b2".to_owned()))
        );
        assert_eq!(resolve(fen, "Qa1b2", true), Ok("Q1b2".to_owned()));
    }

    #[test]
    fn appends_check_and_mate_suffixes() {
        let sans = san_list("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        assert!(sans.contains(&"Ra8#".to_owned()));
        let sans = san_list("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert!(sans.contains(&"O-O-O".to_owned()));
        assert!(sans.contains(&"Ra8+".to_owned()));
    }

    #[test]
    fn formats_promotions_and_en_passant() {
        let sans = san_list("1n2k3/P7/8/3pP3/8/8/8/4K3 w - d6 0 2");
        assert!(sans.contains(&"a8=Q".to_owned()));
        assert!(sans.contains(&"axb8=N".to_owned()));
        assert!(sans.contains(&"exd6".to_owned()));
    }

    #[test]
    fn strict_resolution_requires_exact_tokens() {
        let start = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert_eq!(resolve(start, "Nf3", false), Ok("Nf3".to_owned()));
        assert_eq!(resolve(start, "e4+", false), Ok("e4".to_owned()));
        assert!(matches!(
            resolve(start, "Nxf3", false),
            Err(SanError::NoLegalMove(_))
        ));
        assert!(matches!(resolve(start, "g1f3", false), Err(_)));
        assert!(matches!(
            resolve(start, "Ng1f3", false),
            Err(SanError::NoLegalMove(_))
        ));
        assert!(matches!(
            resolve(start, "Ke2", false),
            Err(SanError::NoLegalMove(_))
        ));
    }

    #[test]
    fn tolerant_resolution_accepts_sloppy_input() {
        let start = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert_eq!(resolve(start, "Ng1f3", true), Ok("Nf3".to_owned()));
        assert_eq!(resolve(start, "Nxf3", true), Ok("Nf3".to_owned()));
        assert_eq!(resolve(start, "g1f3", true), Ok("Nf3".to_owned()));
        assert_eq!(resolve(start, "e4!?", true), Ok("e4".to_owned()));

        let castle = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        assert_eq!(resolve(castle, "0-0", true), Ok("O-O".to_owned()));
        assert_eq!(resolve(castle, "0-0-0", true), Ok("O-O-O".to_owned()));
        assert!(resolve(castle, "0-0", false).is_err());

        let promote = "8/P6k/8/8/8/8/8/K7 w - - 0 1";
        assert_eq!(resolve(promote, "a8Q", true), Ok("a8=Q".to_owned()));
        assert_eq!(resolve(promote, "a8=n", true), Ok("a8=N".to_owned()));
        assert_eq!(resolve(promote, "a7a8r", true), Ok("a8=R".to_owned()));
    }

    #[test]
    fn ambiguous_tokens_are_rejected() {
        assert!(matches!(
            resolve("4k3/8/8/8/8/8/8/RN2KN2 w - - 0 1", "Nd2", true),
            Err(SanError::AmbiguousMove(_))
        ));
    }
}

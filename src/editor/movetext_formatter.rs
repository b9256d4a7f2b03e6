//! Movetext rendering (`"1.e4 e5 2.Nf3"`) and the output annotation tag.

/// Move number and side to move taken from a FEN's second and sixth fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnContext {
    pub move_number: u32,
    pub white_to_move: bool,
}

impl TurnContext {
    /// Missing, zero or unparsable move numbers fall back to 1.
    pub fn from_fen(fen: &str) -> Self {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let move_number = fields
            .get(5)
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(1);

        Self {
            move_number,
            white_to_move: fields.get(1) == Some(&"w"),
        }
    }
}

pub fn format_movetext<S: AsRef<str>>(starting_fen: &str, sans: &[S]) -> String {
    let TurnContext {
        mut move_number,
        mut white_to_move,
    } = TurnContext::from_fen(starting_fen);
    let started_with_black = !white_to_move;

    let mut out = String::new();
    for (i, san) in sans.iter().enumerate() {
        let san = san.as_ref();
        if white_to_move {
            out.push_str(&format!("{move_number}.{san} "));
            white_to_move = false;
        } else {
            if i == 0 && started_with_black {
                out.push_str(&format!("{move_number}...{san} "));
            } else {
                out.push_str(&format!("{san} "));
            }
            move_number += 1;
            white_to_move = true;
        }
    }

    out.trim_end().to_owned()
}

/// `[moves flip=true start=<fen>]<movetext> [/moves]`; the flip attribute
/// only appears for a flipped board.
pub fn format_annotation(starting_fen: &str, flipped: bool, moves_text: &str) -> String {
    let flip = if flipped { " flip=true" } else { "" };
    format!("[moves{flip} start={starting_fen}]{moves_text} [/moves]")
}

#[cfg(test)]
mod tests {
    use super::{format_annotation, format_movetext, TurnContext};
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;

    #[test]
    fn white_start_numbers_every_white_move() {
        assert_eq!(
            format_movetext(STARTING_POSITION_FEN, &["e4", "e5", "Nf3", "Nc6", "Bb5"]),
            "1.e4 e5 2.Nf3 Nc6 3.Bb5"
        );
        assert_eq!(format_movetext::<&str>(STARTING_POSITION_FEN, &[]), "");
    }

    #[test]
    fn black_start_uses_the_actual_move_number() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 5";
        assert_eq!(format_movetext(fen, &["c5"]), "5...c5");
        assert_eq!(format_movetext(fen, &["c5", "Nf3", "d6"]), "5...c5 6.Nf3 d6");
    }

    #[test]
    fn bad_move_number_defaults_to_one() {
        assert_eq!(TurnContext::from_fen("8/8/8/8/8/8/8/8 w - - 0 0").move_number, 1);
        assert_eq!(TurnContext::from_fen("8/8/8/8/8/8/8/8 w - - 0 x").move_number, 1);
        assert_eq!(TurnContext::from_fen("8/8/8/8/8/8/8/8 b").move_number, 1);
        assert!(!TurnContext::from_fen("8/8/8/8/8/8/8/8 b").white_to_move);
    }

    #[test]
    fn annotation_is_bit_exact() {
        assert_eq!(
            format_annotation(STARTING_POSITION_FEN, false, "1.e4 e5 2.Nf3"),
            format!("[moves start={STARTING_POSITION_FEN}]1.e4 e5 2.Nf3 [/moves]")
        );
        assert_eq!(
            format_annotation("FEN", true, ""),
            "[moves flip=true start=FEN] [/moves]"
        );
    }
}

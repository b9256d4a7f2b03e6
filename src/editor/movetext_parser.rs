//! Replays user-edited movetext into a rules engine.
//!
//! Tokens are whitespace-separated. Move numbers only track the expected
//! side; they are not checked against the position. Replay runs on a
//! scratch engine the caller owns, so a failed parse never touches live
//! state.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::editor::editor_config::ParserConfig;
use crate::editor::editor_errors::EditorError;
use crate::editor::movetext_formatter::TurnContext;
use crate::rules_engine::rules_engine::{MoveRequest, RulesEngine};

// number, optional second/third dot, remainder
static MOVE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\.\.)?(.*)$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveToken {
    /// `12.`
    MoveNumberOnly(u32),
    /// `12...`
    BlackMoveNumberOnly(u32),
    /// `12...Nf6`
    BlackMoveWithNumber(u32, String),
    /// `12.e4`
    CombinedWhiteMove(u32, String),
    /// `Nf6`
    BareMove(String),
}

pub fn classify_token(token: &str) -> MoveToken {
    let bare = || MoveToken::BareMove(token.to_owned());

    let Some(caps) = MOVE_NUMBER_RE.captures(token) else {
        return bare();
    };
    let Some(number) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) else {
        return bare();
    };
    let ellipsis = caps.get(2).is_some();
    let rest = caps.get(3).map_or("", |m| m.as_str());

    match (ellipsis, rest.is_empty()) {
        (false, true) => MoveToken::MoveNumberOnly(number),
        (true, true) => MoveToken::BlackMoveNumberOnly(number),
        (true, false) => MoveToken::BlackMoveWithNumber(number, rest.to_owned()),
        (false, false) => MoveToken::CombinedWhiteMove(number, rest.to_owned()),
    }
}

pub fn tokenize(text: &str) -> Vec<MoveToken> {
    text.split_whitespace().map(classify_token).collect()
}

/// Replay `text` into `engine`, which must already hold the starting
/// position. On error the engine may hold a partial replay and should be
/// discarded.
pub fn replay_movetext<E: RulesEngine>(
    engine: &mut E,
    text: &str,
    config: &ParserConfig,
) -> Result<(), EditorError> {
    let TurnContext {
        mut move_number,
        white_to_move: mut expecting_white,
    } = TurnContext::from_fen(&engine.fen());

    for raw in text.split_whitespace() {
        let token = classify_token(raw);
        debug!("movetext token {token:?} (move {move_number}, white {expecting_white})");

        let notation = match token {
            MoveToken::MoveNumberOnly(n) => {
                move_number = n;
                expecting_white = true;
                continue;
            }
            MoveToken::BlackMoveNumberOnly(n) => {
                move_number = n;
                expecting_white = false;
                continue;
            }
            MoveToken::BlackMoveWithNumber(n, notation) => {
                move_number = n;
                expecting_white = false;
                notation
            }
            MoveToken::CombinedWhiteMove(n, notation) => {
                move_number = n;
                expecting_white = true;
                notation
            }
            MoveToken::BareMove(notation) => notation,
        };

        engine
            .apply(&MoveRequest::notation(notation, config.tolerant))
            .map_err(|err| EditorError::UnparseableMoveText {
                token: raw.to_owned(),
                reason: err.to_string(),
            })?;

        if expecting_white {
            expecting_white = false;
        } else {
            move_number += 1;
            expecting_white = true;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{classify_token, replay_movetext, tokenize, MoveToken};
    use crate::editor::editor_config::ParserConfig;
    use crate::editor::editor_errors::EditorError;
    use crate::editor::movetext_formatter::format_movetext;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::rules_engine::bitboard_rules::BitboardRules;
    use crate::rules_engine::rules_engine::{MoveRequest, RulesEngine};
    use rand::rngs::StdRng;
    use rand::seq::IndexedRandom;
    use rand::SeedableRng;

    fn sans(engine: &BitboardRules) -> Vec<String> {
        engine.history().iter().map(|m| m.san.clone()).collect()
    }

    #[test]
    fn classifies_each_token_shape() {
        assert_eq!(classify_token("12."), MoveToken::MoveNumberOnly(12));
        assert_eq!(classify_token("12..."), MoveToken::BlackMoveNumberOnly(12));
        assert_eq!(
            classify_token("12...Nf6"),
            MoveToken::BlackMoveWithNumber(12, "Nf6".to_owned())
        );
        assert_eq!(
            classify_token("1.e4"),
            MoveToken::CombinedWhiteMove(1, "e4".to_owned())
        );
        assert_eq!(classify_token("Nf6"), MoveToken::BareMove("Nf6".to_owned()));
        assert_eq!(classify_token("O-O"), MoveToken::BareMove("O-O".to_owned()));
        assert_eq!(tokenize("  1. e4\n e5 ").len(), 3);
    }

    #[test]
    fn replays_mixed_token_styles() {
        let mut engine = BitboardRules::new();
        replay_movetext(
            &mut engine,
            "1.e4 e5 2. Nf3 2...Nc6 3.Bb5 a6",
            &ParserConfig::default(),
        )
        .expect("movetext should replay");
        assert_eq!(sans(&engine), vec!["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"]);
    }

    #[test]
    fn replays_a_black_start() {
        let start = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 5";
        let mut engine = BitboardRules::from_fen(start).expect("FEN should load");
        replay_movetext(&mut engine, "5...c5 6.Nf3", &ParserConfig::default())
            .expect("movetext should replay");
        assert_eq!(sans(&engine), vec!["c5", "Nf3"]);

        let mut detached = BitboardRules::from_fen(start).expect("FEN should load");
        replay_movetext(&mut detached, "5... c5 Nf3", &ParserConfig::default())
            .expect("movetext should replay");
        assert_eq!(sans(&detached), vec!["c5", "Nf3"]);
    }

    #[test]
    fn reports_the_failing_token() {
        let mut engine = BitboardRules::new();
        let err = replay_movetext(&mut engine, "1.e4 e5 2.Nf3 bogus", &ParserConfig::default())
            .expect_err("bogus should not replay");
        assert!(matches!(
            err,
            EditorError::UnparseableMoveText { ref token, .. } if token == "bogus"
        ));
    }

    #[test]
    fn strict_mode_rejects_sloppy_tokens() {
        let strict = ParserConfig { tolerant: false };
        let mut engine = BitboardRules::new();
        assert!(replay_movetext(&mut engine, "1.e2e4", &strict).is_err());

        let mut engine = BitboardRules::new();
        replay_movetext(&mut engine, "1.e2e4 Ng8f6 2.0-0?!", &ParserConfig::default())
            .expect_err("castling is not legal yet");
        assert_eq!(sans(&engine), vec!["e4", "Nf6"]);
    }

    #[test]
    fn formatted_random_games_replay_to_the_same_position() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..20 {
            let mut played = BitboardRules::new();
            for _ in 0..40 {
                let options = played.legal_sans().expect("SANs should format");
                let Some(choice) = options.choose(&mut rng) else {
                    break;
                };
                played
                    .apply(&MoveRequest::notation(choice.clone(), false))
                    .expect("generated SAN should be legal");
            }

            let text = format_movetext(STARTING_POSITION_FEN, &sans(&played));

            let mut replayed = BitboardRules::new();
            replay_movetext(&mut replayed, &text, &ParserConfig { tolerant: false })
                .expect("formatted movetext should replay");
            assert_eq!(replayed.fen(), played.fen());
            assert_eq!(sans(&replayed), sans(&played));
        }
    }
}

//! PGN export for the current line.
//!
//! Writes the seven-tag roster, a SetUp/FEN pair when the line does not
//! start from the standard position, and movetext wrapped at 80 columns.

use chrono::{Local, NaiveDate};

use crate::game_state::chess_rules::STARTING_POSITION_FEN;

const MAX_LINE_WIDTH: usize = 80;

pub fn write_pgn(start_fen: &str, sans: &[String], result: &str) -> String {
    write_pgn_dated(start_fen, sans, result, Local::now().date_naive())
}

pub fn write_pgn_dated(start_fen: &str, sans: &[String], result: &str, date: NaiveDate) -> String {
    let result = normalize_result(result);

    let mut headers: Vec<(&str, String)> = vec![
        ("Event", "Position editor line".to_owned()),
        ("Site", "Local".to_owned()),
        ("Date", date.format("%Y.%m.%d").to_string()),
        ("Round", "-".to_owned()),
        ("White", "White".to_owned()),
        ("Black", "Black".to_owned()),
        ("Result", result.to_owned()),
    ];
    if start_fen != STARTING_POSITION_FEN {
        headers.push(("SetUp", "1".to_owned()));
        headers.push(("FEN", start_fen.to_owned()));
    }

    let mut out = String::new();
    for (key, value) in &headers {
        out.push_str(&format!("[{} \"{}\"]\n", key, escape_pgn_value(value)));
    }
    out.push('\n');

    let mut tokens = movetext_tokens(start_fen, sans);
    tokens.push(result.to_owned());
    out.push_str(&wrap_tokens(&tokens));
    out.push('\n');

    out
}

fn movetext_tokens(start_fen: &str, sans: &[String]) -> Vec<String> {
    let fields: Vec<&str> = start_fen.split_whitespace().collect();
    let mut white_to_move = fields.get(1).map_or(true, |side| *side != "b");
    let mut move_number = fields
        .get(5)
        .and_then(|n| n.parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(1);

    let mut tokens = Vec::with_capacity(sans.len() * 2);
    for (ply, san) in sans.iter().enumerate() {
        if white_to_move {
            tokens.push(format!("{move_number}."));
        } else if ply == 0 {
            tokens.push(format!("{move_number}..."));
        }
        tokens.push(san.clone());

        if !white_to_move {
            move_number += 1;
        }
        white_to_move = !white_to_move;
    }
    tokens
}

fn wrap_tokens(tokens: &[String]) -> String {
    let mut out = String::new();
    let mut line_len = 0usize;

    for token in tokens {
        if line_len > 0 && line_len + 1 + token.len() > MAX_LINE_WIDTH {
            out.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(token);
        line_len += token.len();
    }

    out
}

fn normalize_result(result: &str) -> &'static str {
    match result.trim() {
        "1-0" => "1-0",
        "0-1" => "0-1",
        "1/2-1/2" => "1/2-1/2",
        _ => "*",
    }
}

fn escape_pgn_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

//! Crate root module declarations for the chess position editor.
//!
//! The editor core (`editor`) talks to a rules engine through the
//! `rules_engine::RulesEngine` trait; the bundled bitboard engine is built
//! from `game_state`, `moves`, `move_generation` and the notation helpers in
//! `utils`. `cli` is the terminal front-end used by the binary.

pub mod game_state {
    pub mod board_state;
    pub mod chess_rules;
    pub mod chess_types;
}

pub mod moves {
    pub mod attack_tables;
    pub mod move_descriptions;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod move_generator;
    pub mod perft;
    pub mod pseudo_moves;
}

pub mod rules_engine {
    pub mod bitboard_rules;
    pub mod rules_engine;
}

pub mod editor {
    pub mod board_widget;
    pub mod editor_config;
    pub mod editor_errors;
    pub mod movetext_formatter;
    pub mod movetext_parser;
    pub mod navigation;
    pub mod position_history;
    pub mod session;
    pub mod update_guard;
}

pub mod cli {
    pub mod command_loop;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod pgn;
    pub mod render_game_state;
    pub mod san;
}

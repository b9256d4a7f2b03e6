//! Board-rendering collaborator.
//!
//! The session only tells the widget what to show (`position`, `flip`);
//! user gestures come back to the session as [`DragStart`] and
//! [`DropEvent`] values.

use serde::Deserialize;

use crate::game_state::board_state::BoardState;
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::{Color, PieceKind};
use crate::rules_engine::rules_engine::AppliedMove;
use crate::utils::algebraic::algebraic_to_square;
use crate::utils::render_game_state::render_game_state;

/// Drag source for pieces taken from the spare trays.
pub const SPARE_SOURCE: &str = "spare";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    White,
    Black,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Orientation::White => Orientation::Black,
            Orientation::Black => Orientation::White,
        }
    }
}

/// What happens to a piece dropped outside the board. `Trash` removes it
/// from the position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropOffBoard {
    #[default]
    Snapback,
    Trash,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub piece_theme: String,
    pub draggable: bool,
    pub drop_off_board: DropOffBoard,
    pub orientation: Orientation,
    pub touch_enabled: bool,
    pub spare_pieces: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            piece_theme: "img/chesspieces/alpha/{piece}.svg".to_owned(),
            draggable: true,
            drop_off_board: DropOffBoard::Snapback,
            orientation: Orientation::White,
            touch_enabled: true,
            spare_pieces: false,
        }
    }
}

/// Two-letter piece code used by drag events and piece images, e.g. `wN`.
pub fn piece_code(color: Color, piece: PieceKind) -> String {
    format!("{}{}", color.fen_char(), piece.fen_char().to_ascii_uppercase())
}

pub fn parse_piece_code(code: &str) -> Option<(Color, PieceKind)> {
    let mut chars = code.chars();
    let color = match chars.next()? {
        'w' => Color::White,
        'b' => Color::Black,
        _ => return None,
    };
    let piece = chars.next().filter(char::is_ascii_uppercase)?;
    if chars.next().is_some() {
        return None;
    }
    Some((color, PieceKind::from_fen_char(piece)?))
}

pub trait BoardWidget {
    fn position(&mut self, fen: &str);
    fn flip(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragStart {
    pub source: String,
    pub piece: String,
    pub orientation: Orientation,
    pub touch: bool,
}

/// A piece released over `target`. Any non-square target, such as
/// `"offboard"`, is off the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropEvent {
    pub source: String,
    pub target: String,
    pub piece: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Moved(AppliedMove),
    /// A piece was trashed or placed from the spares; carries the new
    /// starting position.
    Edited(String),
    Snapback,
}

/// Terminal widget: remembers the last position and draws it on demand.
#[derive(Debug, Clone)]
pub struct TextBoard {
    config: BoardConfig,
    fen: String,
    orientation: Orientation,
}

impl TextBoard {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            orientation: config.orientation,
            config,
            fen: STARTING_POSITION_FEN.to_owned(),
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn fen(&self) -> &str {
        &self.fen
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Piece code on `square` in the displayed position.
    pub fn piece_on(&self, square: &str) -> Option<String> {
        let square = algebraic_to_square(square)?;
        let board = BoardState::from_fen(&self.fen).ok()?;
        board
            .piece_at(square)
            .map(|(color, piece)| piece_code(color, piece))
    }

    pub fn piece_image(&self, code: &str) -> String {
        self.config.piece_theme.replace("{piece}", code)
    }

    pub fn render(&self) -> String {
        match BoardState::from_fen(&self.fen) {
            Ok(board) => render_game_state(&board, self.orientation == Orientation::Black),
            Err(err) => format!("(unrenderable position: {err})"),
        }
    }
}

impl BoardWidget for TextBoard {
    fn position(&mut self, fen: &str) {
        self.fen = fen.to_owned();
    }

    fn flip(&mut self) {
        self.orientation = self.orientation.flipped();
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_piece_code, piece_code, BoardConfig, BoardWidget, Orientation, TextBoard};
    use crate::game_state::chess_types::{Color, PieceKind};

    #[test]
    fn text_board_tracks_position_and_orientation() {
        let mut board = TextBoard::new(BoardConfig::default());
        assert!(board.render().starts_with("  a b c d e f g h\n8 ♜"));

        board.position("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        board.flip();
        assert_eq!(board.orientation(), Orientation::Black);
        assert_eq!(board.fen(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        assert!(board.render().starts_with("  h g f e d c b a\n1 · · · ♔"));

        board.flip();
        assert_eq!(board.orientation(), Orientation::White);
    }

    #[test]
    fn piece_codes_and_images() {
        assert_eq!(piece_code(Color::Black, PieceKind::Knight), "bN");
        assert_eq!(parse_piece_code("wQ"), Some((Color::White, PieceKind::Queen)));
        assert_eq!(parse_piece_code("wq"), None);
        assert_eq!(parse_piece_code("xQ"), None);
        assert_eq!(parse_piece_code("wQQ"), None);

        let board = TextBoard::new(BoardConfig::default());
        assert_eq!(board.piece_on("g8").as_deref(), Some("bN"));
        assert_eq!(board.piece_on("e4"), None);
        assert_eq!(board.piece_image("wK"), "img/chesspieces/alpha/wK.svg");
    }
}

//! Bitboard position representation.
//!
//! `BoardState` is the value the rules engine clones, mutates and serializes.
//! It stores piece bitboards, occupancy caches, turn/state flags and clocks.
//! Every applied move produces a fresh `BoardState`, so there is no
//! make/unmake stack.

use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::*;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::{parse_fen, FenError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    // [color][piece_kind]
    pub pieces: [[u64; 6]; 2],

    pub occupancy_by_color: [u64; 2],
    pub occupancy_all: u64,

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,

            side_to_move: Color::White,
            castling_rights: 0,
            en_passant_square: None,

            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}

impl BoardState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Standard starting position.
    pub fn new_game() -> Self {
        match parse_fen(STARTING_POSITION_FEN) {
            Ok(state) => state,
            Err(err) => unreachable!("starting FEN must parse: {err}"),
        }
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        parse_fen(fen)
    }

    #[inline]
    pub fn to_fen(&self) -> String {
        generate_fen(self)
    }

    /// Color and kind of whatever stands on `square`.
    pub fn piece_at(&self, square: Square) -> Option<(Color, PieceKind)> {
        let mask = 1u64 << square;
        if self.occupancy_all & mask == 0 {
            return None;
        }
        for color in Color::BOTH {
            if let Some(piece) = self.piece_of_color_at(color, square) {
                return Some((color, piece));
            }
        }
        None
    }

    pub fn piece_of_color_at(&self, color: Color, square: Square) -> Option<PieceKind> {
        let mask = 1u64 << square;
        PieceKind::ALL
            .into_iter()
            .find(|piece| self.pieces[color.index()][piece.index()] & mask != 0)
    }

    #[inline]
    pub fn bitboard(&self, color: Color, piece: PieceKind) -> u64 {
        self.pieces[color.index()][piece.index()]
    }

    pub fn put_piece(&mut self, color: Color, piece: PieceKind, square: Square) {
        self.pieces[color.index()][piece.index()] |= 1u64 << square;
    }

    /// Remove anything of `color` standing on `square`.
    pub fn clear_square(&mut self, color: Color, square: Square) {
        let mask = !(1u64 << square);
        for bb in self.pieces[color.index()].iter_mut() {
            *bb &= mask;
        }
    }

    /// Drop castling rights whose king or rook is no longer on its home
    /// square. Used after pieces are added or removed by hand.
    pub fn prune_castling_rights(&mut self) {
        let corners = [
            (CASTLE_WHITE_KINGSIDE, Color::White, 4, 7),
            (CASTLE_WHITE_QUEENSIDE, Color::White, 4, 0),
            (CASTLE_BLACK_KINGSIDE, Color::Black, 60, 63),
            (CASTLE_BLACK_QUEENSIDE, Color::Black, 60, 56),
        ];
        for (right, color, king, rook) in corners {
            let intact = self.piece_of_color_at(color, king) == Some(PieceKind::King)
                && self.piece_of_color_at(color, rook) == Some(PieceKind::Rook);
            if !intact {
                self.castling_rights &= !right;
            }
        }
    }

    pub fn recalc_occupancy(&mut self) {
        for color in Color::BOTH {
            self.occupancy_by_color[color.index()] = self.pieces[color.index()]
                .iter()
                .copied()
                .fold(0u64, |acc, bb| acc | bb);
        }
        self.occupancy_all = self.occupancy_by_color[Color::White.index()]
            | self.occupancy_by_color[Color::Black.index()];
    }
}

#[cfg(test)]
mod tests {
    use super::BoardState;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Color, PieceKind, CASTLE_WHITE_QUEENSIDE};

    #[test]
    fn new_game_serializes_to_start_fen() {
        let state = BoardState::new_game();
        assert_eq!(state.to_fen(), STARTING_POSITION_FEN);
        assert_eq!(state.occupancy_all.count_ones(), 32);
    }

    #[test]
    fn piece_lookup_reports_color_and_kind() {
        let state = BoardState::new_game();
        assert_eq!(state.piece_at(4), Some((Color::White, PieceKind::King)));
        assert_eq!(state.piece_at(59), Some((Color::Black, PieceKind::Queen)));
        assert_eq!(state.piece_at(28), None);
    }

    #[test]
    fn clear_square_then_recalc_updates_occupancy() {
        let mut state = BoardState::new_game();
        state.clear_square(Color::White, 12);
        state.recalc_occupancy();
        assert_eq!(state.piece_at(12), None);
        assert_eq!(state.occupancy_by_color[Color::White.index()].count_ones(), 15);
    }

    #[test]
    fn pruning_drops_rights_for_missing_rooks() {
        let mut state = BoardState::new_game();
        state.clear_square(Color::White, 7);
        state.clear_square(Color::Black, 60);
        state.prune_castling_rights();
        assert_eq!(state.castling_rights, CASTLE_WHITE_QUEENSIDE);
    }
}

//! Packed move descriptions.
//!
//! A move is a `u64` bit field: from/to squares, moved/captured/promotion
//! piece codes and special-move flags. The `MoveDescription` newtype keeps
//! the packing in one place.

use crate::game_state::chess_types::{PieceKind, Square};

const FROM_SHIFT: u64 = 0;
const TO_SHIFT: u64 = 6;
const MOVED_PIECE_SHIFT: u64 = 12;
const CAPTURED_PIECE_SHIFT: u64 = 15;
const PROMOTION_PIECE_SHIFT: u64 = 18;

const SQUARE_MASK: u64 = 0x3F;
const PIECE_MASK: u64 = 0x7;
const NO_PIECE_CODE: u64 = 0x7;

pub const FLAG_CAPTURE: u64 = 1u64 << 21;
pub const FLAG_DOUBLE_PAWN_PUSH: u64 = 1u64 << 22;
pub const FLAG_EN_PASSANT: u64 = 1u64 << 23;
pub const FLAG_CASTLING: u64 = 1u64 << 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveDescription(pub u64);

impl MoveDescription {
    pub fn pack(
        from: Square,
        to: Square,
        moved_piece: PieceKind,
        captured_piece: Option<PieceKind>,
        promotion_piece: Option<PieceKind>,
        flags: u64,
    ) -> Self {
        let mut out = 0u64;
        out |= (from as u64) << FROM_SHIFT;
        out |= (to as u64) << TO_SHIFT;
        out |= piece_code(Some(moved_piece)) << MOVED_PIECE_SHIFT;
        out |= piece_code(captured_piece) << CAPTURED_PIECE_SHIFT;
        out |= piece_code(promotion_piece) << PROMOTION_PIECE_SHIFT;
        out |= flags;
        Self(out)
    }

    #[inline]
    pub fn from(self) -> Square {
        ((self.0 >> FROM_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub fn to(self) -> Square {
        ((self.0 >> TO_SHIFT) & SQUARE_MASK) as Square
    }

    /// Moved piece; a packed move always carries one.
    #[inline]
    pub fn moved_piece(self) -> PieceKind {
        PieceKind::from_index((self.0 >> MOVED_PIECE_SHIFT) & PIECE_MASK).unwrap_or(PieceKind::Pawn)
    }

    #[inline]
    pub fn captured_piece(self) -> Option<PieceKind> {
        PieceKind::from_index((self.0 >> CAPTURED_PIECE_SHIFT) & PIECE_MASK)
    }

    #[inline]
    pub fn promotion_piece(self) -> Option<PieceKind> {
        PieceKind::from_index((self.0 >> PROMOTION_PIECE_SHIFT) & PIECE_MASK)
    }

    #[inline]
    pub fn has_flag(self, flag: u64) -> bool {
        self.0 & flag != 0
    }

    #[inline]
    pub fn is_capture(self) -> bool {
        self.has_flag(FLAG_CAPTURE)
    }

    #[inline]
    pub fn is_castling(self) -> bool {
        self.has_flag(FLAG_CASTLING)
    }

    /// Castling toward the h-file.
    #[inline]
    pub fn is_kingside_castle(self) -> bool {
        self.is_castling() && self.to() > self.from()
    }
}

#[inline]
fn piece_code(piece: Option<PieceKind>) -> u64 {
    piece
        .map(|p| p.index() as u64)
        .unwrap_or(NO_PIECE_CODE)
}

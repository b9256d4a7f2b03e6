//! Canonical chess-rule constants.
//!
//! Static rule literals used to initialize and validate positions and to
//! decide when a PGN export needs a SetUp/FEN header pair.

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Rank index (0-based) a pawn of each color promotes on, indexed by `Color::index()`.
pub const PROMOTION_RANK: [u8; 2] = [7, 0];

/// Rank index (0-based) a pawn of each color may double-push from.
pub const PAWN_START_RANK: [u8; 2] = [1, 6];

/// King origin squares (e1, e8) used by castling, indexed by `Color::index()`.
pub const KING_HOME_SQUARE: [u8; 2] = [4, 60];

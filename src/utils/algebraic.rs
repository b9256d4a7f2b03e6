//! Square-name conversions (`e4` <-> square index).

use crate::game_state::chess_types::{square_file, square_rank, Square};

/// Parse a square name such as `"e4"`.
#[inline]
pub fn algebraic_to_square(square: &str) -> Option<Square> {
    let &[file, rank] = square.as_bytes() else {
        return None;
    };

    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return None;
    }

    Some((rank - b'1') * 8 + (file - b'a'))
}

/// Square name for an index in `0..=63`.
#[inline]
pub fn square_to_algebraic(square: Square) -> String {
    let mut out = String::with_capacity(2);
    out.push(file_char(square));
    out.push(rank_char(square));
    out
}

#[inline]
pub fn file_char(square: Square) -> char {
    char::from(b'a' + square_file(square))
}

#[inline]
pub fn rank_char(square: Square) -> char {
    char::from(b'1' + square_rank(square))
}

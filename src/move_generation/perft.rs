//! Perft node counting used to validate the generator.

use crate::game_state::board_state::BoardState;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::move_generation::move_generator::MoveGenResult;
use crate::moves::move_descriptions::FLAG_EN_PASSANT;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
    }
}

pub fn perft(board: &BoardState, depth: u8) -> MoveGenResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let mut total = PerftCounts::default();
    for generated in generate_legal_moves(board)? {
        if depth == 1 {
            let mv = generated.move_description;
            total.merge(PerftCounts {
                nodes: 1,
                captures: usize::from(mv.is_capture()),
                en_passant: usize::from(mv.has_flag(FLAG_EN_PASSANT)),
                castles: usize::from(mv.is_castling()),
                promotions: usize::from(mv.promotion_piece().is_some()),
            });
        } else {
            total.merge(perft(&generated.game_after_move, depth - 1)?);
        }
    }

    Ok(total)
}

//! Bitboard-backed [`RulesEngine`].

use log::debug;

use crate::game_state::board_state::BoardState;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenerationError};
use crate::rules_engine::rules_engine::{AppliedMove, MoveRequest, RulesEngine, RulesError};
use crate::utils::algebraic::square_to_algebraic;
use crate::utils::long_algebraic::find_legal_move;
use crate::utils::san::{resolve_san, san_for_move, SanError};

#[derive(Debug, Clone)]
pub struct BitboardRules {
    current: BoardState,
    history: Vec<AppliedMove>,
}

impl Default for BitboardRules {
    fn default() -> Self {
        Self {
            current: BoardState::new_game(),
            history: Vec::new(),
        }
    }
}

impl From<MoveGenerationError> for RulesError {
    fn from(err: MoveGenerationError) -> Self {
        RulesError::Internal(err.to_string())
    }
}

impl From<SanError> for RulesError {
    fn from(err: SanError) -> Self {
        match err {
            SanError::AmbiguousMove(text) => RulesError::AmbiguousMove(text),
            SanError::InvalidFormat(text) | SanError::NoLegalMove(text) => {
                RulesError::IllegalMove(text)
            }
        }
    }
}

impl BitboardRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        let mut rules = Self::default();
        rules.load(fen)?;
        Ok(rules)
    }

    pub fn board(&self) -> &BoardState {
        &self.current
    }

    /// SAN of every legal move in the current position.
    pub fn legal_sans(&self) -> Result<Vec<String>, RulesError> {
        let legal = generate_legal_moves(&self.current)?;
        legal
            .iter()
            .map(|m| san_for_move(m, &legal).map_err(RulesError::from))
            .collect()
    }

    fn resolve<'a>(
        request: &MoveRequest,
        legal: &'a [GeneratedMove],
    ) -> Result<&'a GeneratedMove, RulesError> {
        match request {
            MoveRequest::Squares {
                from,
                to,
                promotion,
            } => find_legal_move(legal, *from, *to, *promotion).ok_or_else(|| {
                RulesError::IllegalMove(format!(
                    "{}{}",
                    square_to_algebraic(*from),
                    square_to_algebraic(*to)
                ))
            }),
            MoveRequest::Notation { text, tolerant } => {
                Ok(resolve_san(text.trim(), legal, *tolerant)?)
            }
        }
    }
}

impl RulesEngine for BitboardRules {
    fn load(&mut self, fen: &str) -> Result<(), RulesError> {
        let board =
            BoardState::from_fen(fen).map_err(|e| RulesError::InvalidFen(e.to_string()))?;
        self.current = board;
        self.history.clear();
        Ok(())
    }

    fn apply(&mut self, request: &MoveRequest) -> Result<AppliedMove, RulesError> {
        let legal = generate_legal_moves(&self.current)?;
        let chosen = Self::resolve(request, &legal)?;
        let san = san_for_move(chosen, &legal)?;

        let applied = AppliedMove {
            from: chosen.move_description.from(),
            to: chosen.move_description.to(),
            san,
            fen_before: self.current.to_fen(),
            fen_after: chosen.game_after_move.to_fen(),
        };
        debug!("applied {} -> {}", applied.san, applied.fen_after);

        self.current = chosen.game_after_move.clone();
        self.history.push(applied.clone());
        Ok(applied)
    }

    fn fen(&self) -> String {
        self.current.to_fen()
    }

    fn history(&self) -> &[AppliedMove] {
        &self.history
    }
}

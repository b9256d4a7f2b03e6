//! Linear move history with a cursor.
//!
//! Entry 0 is the starting position and carries no notation. Recording a
//! move while the cursor is behind the tail discards the redo tail first.

use crate::editor::editor_errors::HistoryError;
use crate::rules_engine::rules_engine::AppliedMove;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub position: String,
    pub move_notation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionHistory {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

#[allow(clippy::len_without_is_empty)]
impl PositionHistory {
    pub fn new(starting_position: impl Into<String>) -> Self {
        Self {
            entries: vec![HistoryEntry {
                position: starting_position.into(),
                move_notation: None,
            }],
            cursor: 0,
        }
    }

    /// History for `moves` played from `starting_position`, cursor at the tail.
    pub fn from_applied(starting_position: impl Into<String>, moves: &[AppliedMove]) -> Self {
        let mut history = Self::new(starting_position);
        for mv in moves {
            history.record_move(mv.san.clone(), mv.fen_after.clone());
        }
        history
    }

    pub fn reset(&mut self, starting_position: impl Into<String>) {
        *self = Self::new(starting_position);
    }

    pub fn record_move(&mut self, notation: impl Into<String>, resulting_position: impl Into<String>) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry {
            position: resulting_position.into(),
            move_notation: Some(notation.into()),
        });
        self.cursor = self.entries.len() - 1;
    }

    pub fn seek(&mut self, index: usize) -> Result<&HistoryEntry, HistoryError> {
        if index >= self.entries.len() {
            return Err(HistoryError::OutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        self.cursor = index;
        Ok(&self.entries[index])
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    pub fn starting_position(&self) -> &str {
        &self.entries[0].position
    }

    pub fn is_at_start(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor + 1 == self.entries.len()
    }

    /// Notation of every move up to and including the cursor.
    pub fn notations_to_cursor(&self) -> Vec<String> {
        self.entries[1..=self.cursor]
            .iter()
            .filter_map(|entry| entry.move_notation.clone())
            .collect()
    }
}

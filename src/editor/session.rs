//! Editor session: one owned state value and the handlers that mutate it.
//!
//! The front-end owns a [`SessionState`] and forwards every user action to
//! one of its handlers. Each handler runs to completion and leaves the rules
//! engine, board widget, history and rendered text consistent with one
//! another.

use log::{debug, info, warn};

use crate::editor::board_widget::{
    parse_piece_code, BoardWidget, DragStart, DropEvent, DropOffBoard, DropOutcome, Orientation,
    SPARE_SOURCE,
};
use crate::editor::editor_config::EditorConfig;
use crate::editor::editor_errors::EditorError;
use crate::editor::movetext_formatter::{format_annotation, format_movetext};
use crate::editor::movetext_parser::replay_movetext;
use crate::editor::navigation::{Navigation, NavigationControls};
use crate::editor::position_history::PositionHistory;
use crate::editor::update_guard::UpdateFlag;
use crate::game_state::board_state::BoardState;
use crate::game_state::chess_types::{Color, PieceKind};
use crate::rules_engine::rules_engine::{AppliedMove, MoveRequest, RulesEngine};
use crate::utils::algebraic::algebraic_to_square;
use crate::utils::pgn::write_pgn;

pub struct SessionState<E: RulesEngine, W: BoardWidget> {
    config: EditorConfig,
    starting_position: String,
    flipped: bool,
    history: PositionHistory,
    engine: E,
    widget: W,
    moves_text: String,
    output: String,
    updating: UpdateFlag,
}

impl<E: RulesEngine, W: BoardWidget> SessionState<E, W> {
    /// Start editing from whatever position `engine` currently holds.
    pub fn new(engine: E, mut widget: W, config: EditorConfig) -> Self {
        let starting_position = engine.fen();
        widget.position(&starting_position);

        let mut session = Self {
            flipped: config.board.orientation == Orientation::Black,
            config,
            history: PositionHistory::new(starting_position.clone()),
            starting_position,
            engine,
            widget,
            moves_text: String::new(),
            output: String::new(),
            updating: UpdateFlag::default(),
        };
        session.update_moves();
        session
    }

    pub fn load_fen(&mut self, input: &str) -> Result<(), EditorError> {
        let mut fen = input.trim().to_owned();
        if self.config.loader.normalize_trailing_char && fen.pop().is_some() {
            fen.push('1');
        }
        self.start_from(fen)
    }

    /// Validate `fen` on a scratch engine, then make it the new start.
    fn start_from(&mut self, fen: String) -> Result<(), EditorError> {
        let mut scratch = self.engine.clone();
        if let Err(err) = scratch.load(&fen) {
            warn!("rejected FEN '{fen}': {err}");
            return Err(EditorError::InvalidFen(fen));
        }

        self.engine = scratch;
        self.starting_position = self.engine.fen();
        self.history.reset(self.starting_position.clone());
        self.widget.position(&self.starting_position);
        info!("loaded FEN {}", self.starting_position);
        self.update_moves();
        Ok(())
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
        self.widget.flip();
        debug!("board flipped: {}", self.flipped);
        self.update_moves();
    }

    /// Legality is decided on drop; here only the board options apply.
    pub fn on_drag_start(&mut self, drag: &DragStart) -> bool {
        let board = &self.config.board;
        let allowed = board.draggable
            && (board.touch_enabled || !drag.touch)
            && (board.spare_pieces || drag.source != SPARE_SOURCE);
        debug!(
            "drag start {} {} ({:?}, touch={}): {}",
            drag.piece,
            drag.source,
            drag.orientation,
            drag.touch,
            if allowed { "allowed" } else { "refused" }
        );
        allowed
    }

    pub fn on_drop(&mut self, drop: &DropEvent) -> DropOutcome {
        debug!("drop {} from {} to {}", drop.piece, drop.source, drop.target);
        if !self.config.board.draggable {
            return DropOutcome::Snapback;
        }

        let off_board = algebraic_to_square(&drop.target).is_none();
        let result = if drop.source == SPARE_SOURCE {
            self.place_spare(&drop.piece, &drop.target).map(DropOutcome::Edited)
        } else if off_board && self.config.board.drop_off_board == DropOffBoard::Trash {
            self.trash_piece(&drop.source).map(DropOutcome::Edited)
        } else {
            self.play_drop(&drop.source, &drop.target).map(DropOutcome::Moved)
        };

        result.unwrap_or_else(|err| {
            warn!("{err}");
            DropOutcome::Snapback
        })
    }

    /// Remove the piece on `source`. The edited position becomes the new
    /// start, so the line is cleared.
    pub fn trash_piece(&mut self, source: &str) -> Result<String, EditorError> {
        let refused = || EditorError::InvalidEdit(format!("nothing to remove on {source}"));
        let square = algebraic_to_square(source).ok_or_else(refused)?;
        self.edit_position(|board| {
            let (color, _) = board.piece_at(square).ok_or_else(refused)?;
            board.clear_square(color, square);
            Ok(())
        })
    }

    /// Put a spare piece (`wN`, `bQ`, ...) on `target`, replacing whatever
    /// stands there.
    pub fn place_spare(&mut self, piece: &str, target: &str) -> Result<String, EditorError> {
        if !self.config.board.spare_pieces {
            return Err(EditorError::InvalidEdit("spare pieces are disabled".to_owned()));
        }
        let (color, kind) = parse_piece_code(piece)
            .ok_or_else(|| EditorError::InvalidEdit(format!("unknown piece '{piece}'")))?;
        let square = algebraic_to_square(target)
            .ok_or_else(|| EditorError::InvalidEdit(format!("{piece} dropped off the board")))?;
        self.edit_position(|board| {
            for side in Color::BOTH {
                board.clear_square(side, square);
            }
            board.put_piece(color, kind, square);
            Ok(())
        })
    }

    fn edit_position(
        &mut self,
        edit: impl FnOnce(&mut BoardState) -> Result<(), EditorError>,
    ) -> Result<String, EditorError> {
        let current = self.engine.fen();
        let mut board =
            BoardState::from_fen(&current).map_err(|_| EditorError::InvalidFen(current))?;
        edit(&mut board)?;
        board.recalc_occupancy();
        board.prune_castling_rights();
        board.en_passant_square = None;

        self.start_from(board.to_fen())?;
        Ok(self.starting_position.clone())
    }

    /// Drop handling that reports why a move was refused. Promotions
    /// always choose a queen.
    pub fn play_drop(&mut self, source: &str, target: &str) -> Result<AppliedMove, EditorError> {
        let illegal = || EditorError::IllegalMove {
            from: source.to_owned(),
            to: target.to_owned(),
        };
        let (Some(from), Some(to)) = (algebraic_to_square(source), algebraic_to_square(target))
        else {
            return Err(illegal());
        };

        let applied = self
            .engine
            .apply(&MoveRequest::Squares {
                from,
                to,
                promotion: Some(PieceKind::Queen),
            })
            .map_err(|_| illegal())?;

        self.history
            .record_move(applied.san.clone(), applied.fen_after.clone());
        self.widget.position(&self.engine.fen());
        info!("played {} ({source}{target})", applied.san);
        self.update_moves();
        Ok(applied)
    }

    pub fn on_snap_end(&mut self) {
        self.widget.position(&self.engine.fen());
    }

    /// Replace the line with the one typed in the move-text field. A
    /// nested call made while an edit is being applied is ignored.
    pub fn on_moves_text_edited(&mut self, text: &str) -> Result<(), EditorError> {
        let Some(_guard) = self.updating.engage() else {
            debug!("ignoring move-text edit during update");
            return Ok(());
        };

        let mut scratch = self.engine.clone();
        scratch
            .load(&self.starting_position)
            .map_err(|err| EditorError::InvalidFen(err.to_string()))?;

        if let Err(err) = replay_movetext(&mut scratch, text, &self.config.parser) {
            warn!("discarding move-text edit: {err}");
            return Err(err);
        }

        self.history = PositionHistory::from_applied(self.starting_position.clone(), scratch.history());
        self.engine = scratch;
        self.widget.position(&self.engine.fen());
        self.moves_text = text.trim().to_owned();
        info!("replayed {} moves from edited text", self.history.len() - 1);
        self.update_moves();
        Ok(())
    }

    /// Move the cursor and re-sync engine, board and text. Returns the new
    /// cursor.
    pub fn navigate(&mut self, step: Navigation) -> Result<usize, EditorError> {
        let target = step.target(self.history.cursor(), self.history.len());
        let position = self.history.seek(target)?.position.clone();

        self.engine
            .load(&position)
            .map_err(|err| EditorError::InvalidFen(err.to_string()))?;
        self.widget.position(&position);
        debug!("navigate {step} -> {target}/{}", self.history.len() - 1);
        self.update_moves();
        Ok(target)
    }

    pub fn controls(&self) -> NavigationControls {
        NavigationControls::for_cursor(self.history.cursor(), self.history.len())
    }

    pub fn copy_output(&self) -> &str {
        &self.output
    }

    pub fn pgn(&self, result: &str) -> String {
        write_pgn(&self.starting_position, &self.history.notations_to_cursor(), result)
    }

    pub fn moves_text(&self) -> &str {
        &self.moves_text
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn starting_position(&self) -> &str {
        &self.starting_position
    }

    pub fn history(&self) -> &PositionHistory {
        &self.history
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Regenerate movetext and output. While an edit is being applied the
    /// user's text is left as typed.
    fn update_moves(&mut self) {
        let moves_text = format_movetext(&self.starting_position, &self.history.notations_to_cursor());
        self.output = format_annotation(&self.starting_position, self.flipped, &moves_text);
        if !self.updating.is_suppressed() {
            self.moves_text = moves_text;
        }
    }
}

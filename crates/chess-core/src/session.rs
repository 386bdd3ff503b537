//! The self-play game session: a board, the moves that produced it, and
//! whether a game is currently being played.
//!
//! Legality is never decided here. Moves are parsed as UCI and checked
//! against the position by shakmaty; this module only keeps the board and
//! the move history in lockstep.

use serde::Serialize;
use shakmaty::{uci::UciMove, Chess, Position};

/// Result label written when the player resigns.
pub const RESIGNED_RESULT: &str = "Resigned";

/// Result label written when the player finishes a game. The outcome is not
/// computed from the final position.
pub const FINISHED_RESULT: &str = "Win/Loss/Draw";

/// Separator used when a move history is flattened into one column.
pub const MOVE_SEPARATOR: &str = ",";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("Invalid move format.")]
    InvalidFormat,

    #[error("Illegal move.")]
    Illegal,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("No game in progress.")]
    NoActiveGame,

    #[error(transparent)]
    Move(#[from] MoveError),
}

/// How a game was brought to an end by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conclusion {
    Resigned,
    Finished,
}

impl Conclusion {
    pub fn result_label(self) -> &'static str {
        match self {
            Conclusion::Resigned => RESIGNED_RESULT,
            Conclusion::Finished => FINISHED_RESULT,
        }
    }
}

/// What gets written to the game log when a game ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameTranscript {
    pub moves: String,
    pub result: &'static str,
}

/// Informational read of the current position. Never used as a stored result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionStatus {
    Ongoing,
    Checkmate,
    Stalemate,
    InsufficientMaterial,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    board: Chess,
    /// Position before each applied move; always the same length as `history`.
    undo_stack: Vec<Chess>,
    history: Vec<String>,
    active: bool,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            board: Chess::default(),
            undo_stack: Vec::new(),
            history: Vec::new(),
            active: false,
        }
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to the standard starting position with an empty history and
    /// mark the game active. Any previous game is discarded.
    pub fn start(&mut self) {
        self.board = Chess::default();
        self.undo_stack.clear();
        self.history.clear();
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn board(&self) -> &Chess {
        &self.board
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Apply a move given in UCI notation (e.g. `e2e4`, `e7e8q`).
    ///
    /// On any error the board and history are left untouched. The notation
    /// is recorded exactly as entered.
    pub fn make_move(&mut self, notation: &str) -> Result<(), SessionError> {
        self.require_active()?;

        let uci: UciMove = notation.parse().map_err(|_| MoveError::InvalidFormat)?;
        let legal_move = uci.to_move(&self.board).map_err(|_| MoveError::Illegal)?;

        let previous = self.board.clone();
        self.board.play_unchecked(legal_move);
        self.undo_stack.push(previous);
        self.history.push(notation.to_string());
        Ok(())
    }

    /// Take back the last ply. Returns `false` when there was nothing to undo.
    pub fn undo(&mut self) -> Result<bool, SessionError> {
        self.require_active()?;

        match self.undo_stack.pop() {
            Some(previous) => {
                self.board = previous;
                self.history.pop();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Build the log entry for ending the current game. The session stays
    /// active until [`GameSession::end`] is called, so a failed write leaves
    /// the game playable.
    pub fn conclude(&self, how: Conclusion) -> Result<GameTranscript, SessionError> {
        self.require_active()?;

        Ok(GameTranscript {
            moves: self.history.join(MOVE_SEPARATOR),
            result: how.result_label(),
        })
    }

    /// Clear the active flag. Board and history are kept until the next
    /// [`GameSession::start`].
    pub fn end(&mut self) {
        self.active = false;
    }

    pub fn status(&self) -> PositionStatus {
        if self.board.is_checkmate() {
            PositionStatus::Checkmate
        } else if self.board.is_stalemate() {
            PositionStatus::Stalemate
        } else if self.board.is_insufficient_material() {
            PositionStatus::InsufficientMaterial
        } else {
            PositionStatus::Ongoing
        }
    }

    fn require_active(&self) -> Result<(), SessionError> {
        if self.active {
            Ok(())
        } else {
            Err(SessionError::NoActiveGame)
        }
    }
}

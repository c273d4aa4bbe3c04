use crate::constants::COLS;

/// Errors raised by the board and the searchers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("illegal move: column {0} is out of range (0..{COLS})")]
    ColumnOutOfRange(usize),

    #[error("illegal move: column {0} is full")]
    ColumnFull(usize),

    #[error("game is already over")]
    GameOver,

    #[error("cannot undo column {column}: last move was {last:?}")]
    UndoMismatch { column: usize, last: Option<usize> },

    #[error("no legal moves available")]
    NoLegalMove,

    #[error("invalid move {0:?}: expected a column digit")]
    InvalidMoveChar(char),
}

impl GameError {
    /// True for errors caused by dropping into a bad column.
    pub fn is_illegal_move(&self) -> bool {
        matches!(self, GameError::ColumnOutOfRange(_) | GameError::ColumnFull(_))
    }
}

/// Errors raised when validating searcher configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config validation error: {0}")]
    Validation(String),
}

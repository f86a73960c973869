//! Error types for the core

use crate::board::{Position, Status, Symbol};

/// Why a placement was refused
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IllegalReason {
    #[error("position is outside the board")]
    OutOfRange,

    #[error("cell is already occupied")]
    Occupied,

    #[error("center cell is disabled by the rules")]
    CenterDisabled,
}

/// Errors raised by board operations, the controller and the mind
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("illegal move at {position}: {reason}")]
    IllegalMove {
        position: Position,
        reason: IllegalReason,
    },

    #[error("it is {expected}'s turn, not {actual}'s")]
    NotYourTurn { expected: Symbol, actual: Symbol },

    #[error("game is already over: {0}")]
    GameOver(Status),

    #[error("no legal move available")]
    NoLegalMove,

    #[error("board has {found} columns but the rules require {expected}")]
    BoardShape { expected: usize, found: usize },
}

/// Invalid rule configuration
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    #[error("win condition {win_condition} must be between 1 and {max}")]
    WinCondition { win_condition: usize, max: usize },

    #[error("unknown rules preset: {0}")]
    UnknownPreset(String),
}

/// Failure to parse a board or symbol from text
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown symbol: {0:?}")]
    UnknownSymbol(String),

    #[error("unknown cell character: {0:?}")]
    UnknownCell(char),

    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },

    #[error("row {row} has {found} cells, expected 3 or 4 and the same as row 0")]
    RowLength { row: usize, found: usize },

    #[error("board has {found} cells, expected {expected}")]
    CellCount { expected: usize, found: usize },
}

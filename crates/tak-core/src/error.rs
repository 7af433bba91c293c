//! Error types for notation parsing, move application and legality checks.

use thiserror::Error;

/// Malformed notation text. No partial state is ever produced alongside one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid square label: {0}")]
    Square(String),

    #[error("Invalid TPS snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Invalid move token: {0}")]
    Move(String),
}

/// A move that is well-formed but cannot legally be played on the given board.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Square {square} is outside the {size}x{size} board")]
    OutOfBounds { square: String, size: usize },

    #[error("Cannot place on occupied square {0}")]
    Occupied(String),

    #[error("Opening placements must be flat stones")]
    OpeningNotFlat,

    #[error("Stacks cannot be moved on the opening move")]
    OpeningMovement,

    #[error("No stack to move on {0}")]
    EmptySource(String),

    #[error("Stack on {0} is not controlled by the side to move")]
    NotController(String),

    #[error("Cannot lift {count} stones from a stack of height {height}")]
    LiftTooTall { count: usize, height: usize },

    #[error("Cannot carry {count} stones on a board of size {size}")]
    CarryLimit { count: usize, size: usize },

    #[error("Capstone on {0} blocks movement")]
    BlockedByCapstone(String),

    #[error("Standing stone on {0} blocks movement")]
    BlockedByStanding(String),

    #[error("Move number {0} cannot advance any further")]
    MoveNumberOverflow(u32),
}

/// Error returned when applying move tokens to a game state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TakError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Errors raised while extracting a game from a PTN document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PtnError {
    #[error("Unable to determine board size: the PTN must include a TPS and/or Size tag")]
    MissingBoardSize,

    #[error("Invalid board size: {0}")]
    InvalidSize(String),

    #[error("Invalid TPS tag: {0}")]
    Snapshot(#[from] ParseError),
}

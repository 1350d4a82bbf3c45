//! Error taxonomy for the rules engine.

use thiserror::Error;

/// Coordinate outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

/// Rejected engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid must be at least {min}x{min} (got {width}x{height})")]
    TooSmall { width: usize, height: usize, min: usize },
    #[error("grid must be at most {max}x{max} (got {width}x{height})")]
    TooLarge { width: usize, height: usize, max: usize },
    #[error("token kinds must be in {min}..={max} (got {kinds})")]
    Kinds { kinds: u8, min: u8, max: u8 },
    #[error("cascade cap must be at least 1")]
    ZeroCascadeCap,
    #[error("move budget must be at least 1")]
    ZeroMoveBudget,
}

/// Failure of a board-level operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Grid(#[from] GridError),
    /// A swap arrived while a cascade was still settling.
    #[error("board is settling a cascade; swap rejected")]
    Busy,
    /// `step` was called with no cascade in progress.
    #[error("no cascade in progress")]
    Idle,
}

use thiserror::Error;

use crate::Coord;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Mine layout must be a non-empty rectangle")]
    InvalidShape,
    #[error("Grid dimensions must be positive")]
    InvalidDimension,
    #[error("Coordinates ({row}, {col}) are outside the grid")]
    OutOfBounds { row: Coord, col: Coord },
    #[error("Mine count does not match the mine layout")]
    MineCountMismatch,
    #[error("Mine grid changed size under the board")]
    GridMismatch,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;

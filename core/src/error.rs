use thiserror::Error;

use crate::Coord2;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Board must be at least one cell wide and tall")]
    EmptyBoard,
    #[error("Clue {clue} at {coords:?} exceeds its {neighbors} neighbors")]
    InvalidClue {
        coords: Coord2,
        clue: u8,
        neighbors: u8,
    },
    #[error("Cell {coords:?} is both flagged and revealed")]
    ConflictingCell { coords: Coord2 },
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::Coord2;

/// A move the engine asks the caller to apply to a hidden, unflagged cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Reveal(Coord2),
    Flag(Coord2),
}

impl Action {
    pub const fn coords(self) -> Coord2 {
        match self {
            Self::Reveal(coords) | Self::Flag(coords) => coords,
        }
    }

    pub const fn is_reveal(self) -> bool {
        matches!(self, Self::Reveal(_))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reveal((x, y)) => write!(f, "reveal ({x}, {y})"),
            Self::Flag((x, y)) => write!(f, "flag ({x}, {y})"),
        }
    }
}

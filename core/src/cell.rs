use serde::{Deserialize, Serialize};

/// Player-visible state of one cell.
///
/// The mine flag of a cell is only exposed once it has been revealed, either as a clue
/// or as the mine that ended the game.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineCell {
    #[default]
    Hidden,
    Flagged,
    Revealed(u8),
    Detonated,
}

impl EngineCell {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }

    pub const fn clue(self) -> Option<u8> {
        match self {
            Self::Revealed(clue) => Some(clue),
            _ => None,
        }
    }
}

use crate::*;
pub use random::*;

mod random;

pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<Minefield>;
}

/// How much of the opening cell's surroundings is guaranteed free of mines.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StartTile {
    #[default]
    Random,
    SimpleSafe,
    AlwaysZero,
}

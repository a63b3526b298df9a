use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Player-visible snapshot of a board, detached from the minefield behind it.
///
/// Unlike a [`Board`], an observation can describe any combination of clues, including
/// inconsistent ones, which makes it the input of choice for diagnostics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub size: Coord2,
    pub mine_count: CellCount,
    pub revealed: Array2<Option<u8>>,
    pub flags: Array2<bool>,
    pub detonated: Option<Coord2>,
}

impl Observation {
    pub fn new(
        size: Coord2,
        mine_count: CellCount,
        revealed: Array2<Option<u8>>,
        flags: Array2<bool>,
    ) -> Result<Self> {
        let obs = Self {
            size,
            mine_count,
            revealed,
            flags,
            detonated: None,
        };
        obs.validate()?;
        Ok(obs)
    }

    /// Builds a snapshot from row strings: `.` hidden, `F` flagged, `*` detonated, and a
    /// digit for a revealed clue. Rows run top to bottom.
    pub fn parse(rows: &[&str], mine_count: CellCount) -> Result<Self> {
        let size_y = Coord::try_from(rows.len()).map_err(|_| GameError::InvalidBoardShape)?;
        let size_x = rows.first().map_or(0, |row| row.chars().count());
        let size_x = Coord::try_from(size_x).map_err(|_| GameError::InvalidBoardShape)?;
        let size = (size_x, size_y);

        let mut revealed = Array2::from_elem(size.to_nd_index(), None);
        let mut flags = Array2::from_elem(size.to_nd_index(), false);
        let mut detonated = None;

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != usize::from(size_x) {
                return Err(GameError::InvalidBoardShape);
            }
            for (x, symbol) in row.chars().enumerate() {
                let index = [x, y];
                match symbol {
                    '.' => {}
                    'F' => flags[index] = true,
                    // both fit a `Coord`, checked above
                    '*' => detonated = Some((x as Coord, y as Coord)),
                    digit => {
                        let clue = digit.to_digit(10).ok_or(GameError::InvalidBoardShape)?;
                        revealed[index] = Some(clue as u8);
                    }
                }
            }
        }

        let obs = Self {
            size,
            mine_count,
            revealed,
            flags,
            detonated,
        };
        obs.validate()?;
        Ok(obs)
    }

    pub fn from_board(board: &Board) -> Self {
        let size = board.size();
        let mut revealed = Array2::from_elem(size.to_nd_index(), None);
        let mut flags = Array2::from_elem(size.to_nd_index(), false);
        let mut detonated = None;

        for coords in iter_row_major(size) {
            match board.cell_at(coords) {
                EngineCell::Hidden => {}
                EngineCell::Revealed(count) => revealed[coords.to_nd_index()] = Some(count),
                EngineCell::Flagged => flags[coords.to_nd_index()] = true,
                EngineCell::Detonated => detonated = Some(coords),
            }
        }

        Self {
            size,
            mine_count: board.total_mines(),
            revealed,
            flags,
            detonated,
        }
    }
}

impl GridView for Observation {
    fn size(&self) -> Coord2 {
        self.size
    }

    fn cell_at(&self, coords: Coord2) -> EngineCell {
        let index = coords.to_nd_index();
        if let Some(clue) = self.revealed[index] {
            EngineCell::Revealed(clue)
        } else if self.flags[index] {
            EngineCell::Flagged
        } else if self.detonated == Some(coords) {
            EngineCell::Detonated
        } else {
            EngineCell::Hidden
        }
    }

    fn total_mines(&self) -> CellCount {
        self.mine_count
    }

    fn detonated_count(&self) -> CellCount {
        CellCount::from(self.detonated.is_some())
    }

    fn validate(&self) -> Result<()> {
        let expected = (usize::from(self.size.0), usize::from(self.size.1));
        if self.revealed.dim() != expected || self.flags.dim() != expected {
            return Err(GameError::InvalidBoardShape);
        }

        for coords in iter_row_major(self.size) {
            let index = coords.to_nd_index();
            if self.flags[index] && self.revealed[index].is_some() {
                return Err(GameError::ConflictingCell { coords });
            }
        }

        validate_cells(self)
    }
}

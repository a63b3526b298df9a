use alloc::vec::Vec;

use crate::*;

/// Read-only view of a board, as seen by the player.
///
/// The decision engine only ever reads through this trait and never learns where the
/// unrevealed mines are.
pub trait GridView {
    fn size(&self) -> Coord2;

    fn cell_at(&self, coords: Coord2) -> EngineCell;

    /// Mines placed on the board when it was created.
    fn total_mines(&self) -> CellCount;

    fn neighbors_of(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    fn flagged_count(&self) -> CellCount {
        let flagged = iter_row_major(self.size())
            .filter(|&coords| self.cell_at(coords).is_flagged())
            .count();
        CellCount::try_from(flagged).unwrap_or(CellCount::MAX)
    }

    fn detonated_count(&self) -> CellCount {
        let detonated = iter_row_major(self.size())
            .filter(|&coords| self.cell_at(coords) == EngineCell::Detonated)
            .count();
        CellCount::try_from(detonated).unwrap_or(CellCount::MAX)
    }

    /// Total mines minus flags and detonated cells; negative once the player has
    /// over-flagged.
    fn remaining_mine_budget(&self) -> i32 {
        i32::from(self.total_mines())
            - i32::from(self.flagged_count())
            - i32::from(self.detonated_count())
    }

    /// Hidden, unflagged cells in row-major order.
    fn hidden_unflagged_cells(&self) -> Vec<Coord2> {
        iter_row_major(self.size())
            .filter(|&coords| self.cell_at(coords).is_hidden())
            .collect()
    }

    /// Rejects boards the engine cannot reason about soundly.
    fn validate(&self) -> Result<()> {
        validate_cells(self)
    }
}

/// Checks the board size, the mine total and that every clue fits its neighborhood.
pub fn validate_cells<G: GridView + ?Sized>(grid: &G) -> Result<()> {
    let size = grid.size();
    if size.0 == 0 || size.1 == 0 {
        return Err(GameError::EmptyBoard);
    }
    if grid.total_mines() > mult(size.0, size.1) {
        return Err(GameError::TooManyMines);
    }

    for coords in iter_row_major(size) {
        let Some(clue) = grid.cell_at(coords).clue() else {
            continue;
        };
        // at most eight, always fits
        let neighbors = grid.neighbors_of(coords).count() as u8;
        if clue > neighbors {
            return Err(GameError::InvalidClue {
                coords,
                clue,
                neighbors,
            });
        }
    }

    Ok(())
}

impl<G: GridView + ?Sized> GridView for &G {
    fn size(&self) -> Coord2 {
        (**self).size()
    }

    fn cell_at(&self, coords: Coord2) -> EngineCell {
        (**self).cell_at(coords)
    }

    fn total_mines(&self) -> CellCount {
        (**self).total_mines()
    }

    fn flagged_count(&self) -> CellCount {
        (**self).flagged_count()
    }

    fn detonated_count(&self) -> CellCount {
        (**self).detonated_count()
    }

    fn validate(&self) -> Result<()> {
        (**self).validate()
    }
}

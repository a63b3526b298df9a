//! Minesweeper decision engine.
//!
//! Given a partially revealed board, the engine derives clue constraints, applies the
//! two certain deduction rules, estimates the mine probability of every hidden cell and
//! picks the next action by one-step expected value. The board model it plays on lives
//! here too, behind the read-only [`GridView`] trait the engine consumes.

#![no_std]

extern crate alloc;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use action::*;
pub use analysis::*;
pub use board::*;
pub use cell::*;
pub use config::*;
pub use decision::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use types::*;

mod action;
mod analysis;
mod board;
mod cell;
mod config;
mod decision;
mod error;
mod generator;
mod grid;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Clamps the size to at least one cell per axis and the mine count to what fits.
    pub fn new((size_x, size_y): Coord2, mines: CellCount) -> Self {
        let size_x = size_x.max(1);
        let size_y = size_y.max(1);
        let mines = mines.min(mult(size_x, size_y));
        Self::new_unchecked((size_x, size_y), mines)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

/// Hidden mine layout of one game, with every clue computed once up front.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Minefield {
    mine_mask: Array2<bool>,
    clues: Array2<u8>,
    mine_count: CellCount,
}

impl Minefield {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (dim_x, dim_y) = mine_mask.dim();
        if dim_x == 0 || dim_y == 0 {
            return Err(GameError::EmptyBoard);
        }
        if Coord::try_from(dim_x).is_err() || Coord::try_from(dim_y).is_err() {
            return Err(GameError::InvalidBoardShape);
        }

        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        let mine_count = CellCount::try_from(mine_count).map_err(|_| GameError::TooManyMines)?;

        let clues = Array2::from_shape_fn(mine_mask.dim(), |(x, y)| {
            // both axes were checked to fit a `Coord` above
            let coords = (x as Coord, y as Coord);
            mine_mask
                .iter_neighbors(coords)
                .filter(|&pos| mine_mask[pos.to_nd_index()])
                .count() as u8
        });

        Ok(Self {
            mine_mask,
            clues,
            mine_count,
        })
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::EmptyBoard);
        }

        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        let (dim_x, dim_y) = self.mine_mask.dim();
        // checked on construction
        (dim_x as Coord, dim_y as Coord)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        let (size_x, size_y) = self.size();
        mult(size_x, size_y)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self.mine_mask[coords.to_nd_index()]
    }

    /// Number of mines around `coords`, fixed when the minefield was built.
    pub fn clue(&self, coords: Coord2) -> u8 {
        self.clues[coords.to_nd_index()]
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

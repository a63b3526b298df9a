use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::num::Saturating;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardState {
    #[default]
    Ready,
    Active,
    Won,
    Lost,
}

impl BoardState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// A game in progress: the hidden minefield plus everything the player has done to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    minefield: Minefield,
    cells: Array2<EngineCell>,
    revealed_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    state: BoardState,
    triggered_mine: Option<Coord2>,
}

impl Board {
    pub fn new(minefield: Minefield) -> Self {
        let size = minefield.size();
        Self {
            minefield,
            cells: Array2::default(size.to_nd_index()),
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            state: BoardState::default(),
            triggered_mine: None,
        }
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn minefield(&self) -> &Minefield {
        &self.minefield
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count.0
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Applies an engine decision. `Flag` only ever places a flag, it never removes one.
    pub fn apply(&mut self, action: Action) -> Result<RevealOutcome> {
        match action {
            Action::Reveal(coords) => self.reveal(coords),
            Action::Flag(coords) => {
                let coords = self.minefield.validate_coords(coords)?;
                if self.cells[coords.to_nd_index()].is_hidden() {
                    self.toggle_flag(coords)?;
                }
                Ok(RevealOutcome::NoChange)
            }
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use EngineCell::*;
        use MarkOutcome::*;

        let coords = self.minefield.validate_coords(coords)?;
        self.check_not_finished()?;

        Ok(match self.cells[coords.to_nd_index()] {
            Hidden => {
                self.cells[coords.to_nd_index()] = Flagged;
                self.flagged_count += 1;
                Changed
            }
            Flagged => {
                self.cells[coords.to_nd_index()] = Hidden;
                self.flagged_count -= 1;
                Changed
            }
            Revealed(_) | Detonated => NoChange,
        })
    }

    /// Reveals a hidden cell, opening the whole zero region around it.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.minefield.validate_coords(coords)?;

        if !self.cells[coords.to_nd_index()].is_hidden() {
            return Ok(RevealOutcome::NoChange);
        }
        self.check_not_finished()?;

        if self.minefield.contains_mine(coords) {
            self.cells[coords.to_nd_index()] = EngineCell::Detonated;
            self.triggered_mine = Some(coords);
            self.end_game(false);
            return Ok(RevealOutcome::HitMine);
        }

        let mut visited = BTreeSet::from([coords]);
        let mut to_visit = Vec::from([coords]);

        while let Some(visit_coords) = to_visit.pop() {
            let clue = self.minefield.clue(visit_coords);
            self.cells[visit_coords.to_nd_index()] = EngineCell::Revealed(clue);
            self.revealed_count += 1;

            if clue == 0 {
                for pos in self.minefield.iter_neighbors(visit_coords) {
                    if self.cells[pos.to_nd_index()].is_hidden() && visited.insert(pos) {
                        to_visit.push(pos);
                    }
                }
            }
        }

        if self.revealed_count == Saturating(self.minefield.safe_cell_count()) {
            self.end_game(true);
            Ok(RevealOutcome::Won)
        } else {
            self.mark_started();
            Ok(RevealOutcome::Revealed)
        }
    }

    fn mark_started(&mut self) {
        if self.state.is_ready() {
            self.state = BoardState::Active;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won {
            BoardState::Won
        } else {
            BoardState::Lost
        };
        if won {
            self.triggered_mine = None;
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

impl GridView for Board {
    fn size(&self) -> Coord2 {
        self.minefield.size()
    }

    fn cell_at(&self, coords: Coord2) -> EngineCell {
        self.cells[coords.to_nd_index()]
    }

    fn total_mines(&self) -> CellCount {
        self.minefield.mine_count()
    }

    fn flagged_count(&self) -> CellCount {
        self.flagged_count.0
    }

    fn detonated_count(&self) -> CellCount {
        CellCount::from(self.triggered_mine.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: Coord2, mines: &[Coord2]) -> Board {
        Board::new(Minefield::from_mine_coords(size, mines).unwrap())
    }

    #[test]
    fn reveal_hits_mine_and_marks_it_detonated() {
        let mut board = board((2, 2), &[(0, 0)]);

        let outcome = board.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(board.state(), BoardState::Lost);
        assert_eq!(board.triggered_mine(), Some((0, 0)));
        assert_eq!(board.cell_at((0, 0)), EngineCell::Detonated);
        assert_eq!(board.remaining_mine_budget(), 0);
        assert_eq!(board.reveal((1, 1)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn reveal_flood_fill_opens_zero_region() {
        let mut board = board((3, 3), &[(2, 2)]);

        let outcome = board.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(board.cell_at((0, 0)), EngineCell::Revealed(0));
        assert_eq!(board.cell_at((1, 1)), EngineCell::Revealed(1));
        assert_eq!(board.cell_at((2, 2)), EngineCell::Hidden);
        assert_eq!(board.revealed_count(), 8);
    }

    #[test]
    fn flood_fill_stops_at_flags() {
        let mut board = board((4, 1), &[(3, 0)]);
        board.toggle_flag((1, 0)).unwrap();

        assert_eq!(board.reveal((0, 0)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(board.cell_at((1, 0)), EngineCell::Flagged);
        assert_eq!(board.cell_at((2, 0)), EngineCell::Hidden);
    }

    #[test]
    fn flood_fill_handles_large_open_boards() {
        let mut board = board((200, 200), &[(199, 199)]);

        assert_eq!(board.reveal((0, 0)).unwrap(), RevealOutcome::Won);
        assert_eq!(board.revealed_count(), 200 * 200 - 1);
    }

    #[test]
    fn toggle_flag_ignores_revealed_cells() {
        let mut board = board((4, 1), &[(0, 0), (3, 0)]);
        board.reveal((2, 0)).unwrap();

        assert_eq!(board.toggle_flag((0, 0)).unwrap(), MarkOutcome::Changed);
        assert_eq!(board.flagged_count(), 1);
        assert_eq!(board.toggle_flag((2, 0)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(board.toggle_flag((0, 0)).unwrap(), MarkOutcome::Changed);
        assert_eq!(board.flagged_count(), 0);
    }

    #[test]
    fn apply_flag_never_unflags() {
        let mut board = board((3, 1), &[(0, 0)]);
        board.apply(Action::Flag((0, 0))).unwrap();
        board.apply(Action::Flag((0, 0))).unwrap();

        assert_eq!(board.cell_at((0, 0)), EngineCell::Flagged);
        assert_eq!(board.reveal((0, 0)).unwrap(), RevealOutcome::NoChange);
    }

    #[test]
    fn winning_board_transitions_to_won_state() {
        let mut board = board((2, 1), &[(0, 0)]);

        assert_eq!(board.apply(Action::Reveal((1, 0))).unwrap(), RevealOutcome::Won);
        assert_eq!(board.state(), BoardState::Won);
        assert!(board.is_finished());
    }
}

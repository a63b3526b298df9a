use alloc::vec::Vec;

use rand::prelude::*;
use rand::seq::index;
use rand_pcg::Pcg64;

use super::*;

/// Generation strategy that can optionally keep the starting tile zero or at least safe,
/// but other than that samples mine positions uniformly without replacement.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
    start: Coord2,
    start_tile: StartTile,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64, start: Coord2, start_tile: StartTile) -> Self {
        Self {
            seed,
            start,
            start_tile,
        }
    }

    fn reserved_cells(&self, size: Coord2, start_tile: StartTile) -> Vec<Coord2> {
        match start_tile {
            StartTile::Random => Vec::new(),
            StartTile::SimpleSafe => Vec::from([self.start]),
            StartTile::AlwaysZero => core::iter::once(self.start)
                .chain(NeighborIter::new(self.start, size))
                .collect(),
        }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<Minefield> {
        use StartTile::*;

        let total_cells = config.total_cells();
        if config.mines > total_cells {
            return Err(GameError::TooManyMines);
        }
        if self.start.0 >= config.size.0 || self.start.1 >= config.size.1 {
            return Err(GameError::InvalidCoords);
        }

        let zero_reserve = NeighborIter::new(self.start, config.size).count() as CellCount + 1;
        let actual_start_tile = match self.start_tile {
            Random => Random,
            SimpleSafe | AlwaysZero if config.mines + 1 > total_cells => {
                log::warn!("Cannot make start tile safe, fallback to random");
                Random
            }
            SimpleSafe => SimpleSafe,
            AlwaysZero if config.mines + zero_reserve > total_cells => {
                log::warn!("Cannot make start tile zero, fallback to simple safe");
                SimpleSafe
            }
            AlwaysZero => AlwaysZero,
        };

        let reserved = self.reserved_cells(config.size, actual_start_tile);
        let candidates: Vec<Coord2> = iter_row_major(config.size)
            .filter(|coords| !reserved.contains(coords))
            .collect();

        let mut rng = Pcg64::seed_from_u64(self.seed);
        let mines: Vec<Coord2> = index::sample(&mut rng, candidates.len(), config.mines.into())
            .into_iter()
            .map(|i| candidates[i])
            .collect();

        log::debug!(
            "Placed {} mines on a {}x{} board with seed {}",
            mines.len(),
            config.size.0,
            config.size.1,
            self.seed
        );
        Minefield::from_mine_coords(config.size, &mines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_exactly_the_requested_mines() {
        let config = GameConfig::new((9, 9), 10);
        let field = RandomMinefieldGenerator::new(7, (4, 4), StartTile::Random)
            .generate(config)
            .unwrap();

        assert_eq!(field.mine_count(), 10);
        assert_eq!(field.size(), (9, 9));
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let config = GameConfig::new((8, 8), 12);
        let first = RandomMinefieldGenerator::new(42, (0, 0), StartTile::Random).generate(config);
        let second = RandomMinefieldGenerator::new(42, (0, 0), StartTile::Random).generate(config);

        assert_eq!(first, second);
    }

    #[test]
    fn always_zero_start_clears_the_neighborhood() {
        let config = GameConfig::new((5, 5), 16);
        for seed in 0..20 {
            let field = RandomMinefieldGenerator::new(seed, (2, 2), StartTile::AlwaysZero)
                .generate(config)
                .unwrap();

            assert!(!field.contains_mine((2, 2)));
            assert_eq!(field.clue((2, 2)), 0);
            assert_eq!(field.mine_count(), 16);
        }
    }

    #[test]
    fn crowded_board_degrades_to_simple_safe() {
        let config = GameConfig::new((3, 3), 8);
        let field = RandomMinefieldGenerator::new(1, (1, 1), StartTile::AlwaysZero)
            .generate(config)
            .unwrap();

        assert!(!field.contains_mine((1, 1)));
        assert_eq!(field.mine_count(), 8);
    }

    #[test]
    fn rejects_start_outside_the_board() {
        let config = GameConfig::new((3, 3), 1);
        let result = RandomMinefieldGenerator::new(1, (3, 0), StartTile::SimpleSafe).generate(config);

        assert_eq!(result, Err(GameError::InvalidCoords));
    }
}

use hashbrown::HashSet;
use minewise_core::*;
use rand::prelude::*;
use rand_pcg::Pcg64;
use serde::Serialize;

use crate::render;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    Won,
    Lost,
    /// Ran out of steps, or the player had nothing left to try.
    Stalled,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GameReport {
    pub outcome: GameOutcome,
    pub steps: usize,
}

/// Who picks the moves after the opening reveal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Player {
    Engine,
    /// Reveals a uniformly random hidden cell every step.
    Baseline,
}

/// Results of one player over every game.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Tally {
    pub wins: u64,
    pub losses: u64,
    pub stalls: u64,
    pub win_rate: f64,
    pub average_steps: f64,
    #[serde(skip)]
    total_steps: usize,
}

impl Tally {
    fn record(&mut self, report: GameReport) {
        match report.outcome {
            GameOutcome::Won => self.wins += 1,
            GameOutcome::Lost => self.losses += 1,
            GameOutcome::Stalled => self.stalls += 1,
        }
        self.total_steps += report.steps;

        let games = (self.wins + self.losses + self.stalls) as f64;
        self.win_rate = self.wins as f64 / games;
        self.average_steps = self.total_steps as f64 / games;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Summary {
    pub games: u64,
    pub engine: Tally,
    /// Present when the random baseline played the same boards.
    pub baseline: Option<Tally>,
}

#[derive(Copy, Clone, Debug)]
pub struct Simulation {
    pub engine: DecisionEngine,
    pub game_config: GameConfig,
    pub start_tile: StartTile,
    pub max_steps: usize,
}

impl Simulation {
    /// Plays `games` boards, seeding game `i` with `seed + i`. With `baseline`, the
    /// random player also plays every one of those boards.
    pub fn run(&self, seed: u64, games: u64, baseline: bool) -> anyhow::Result<Summary> {
        let mut summary = Summary {
            baseline: baseline.then(Tally::default),
            ..Summary::default()
        };

        for index in 0..games {
            let game_seed = seed.wrapping_add(index);
            let report = self.play(game_seed, Player::Engine)?;
            log::info!(
                "Game {index} (seed {game_seed}): {:?} after {} steps",
                report.outcome,
                report.steps
            );
            summary.engine.record(report);

            if let Some(tally) = &mut summary.baseline {
                let report = self.play(game_seed, Player::Baseline)?;
                log::info!(
                    "Baseline game {index} (seed {game_seed}): {:?} after {} steps",
                    report.outcome,
                    report.steps
                );
                tally.record(report);
            }
            summary.games += 1;
        }
        Ok(summary)
    }

    /// Opens the centre cell, then lets `player` move until the game ends or the step
    /// limit is hit.
    pub fn play(&self, seed: u64, player: Player) -> anyhow::Result<GameReport> {
        let (size_x, size_y) = self.game_config.size;
        let start = (size_x / 2, size_y / 2);
        let field = RandomMinefieldGenerator::new(seed, start, self.start_tile)
            .generate(self.game_config)?;
        let mut board = Board::new(field);

        board.reveal(start)?;
        let steps = match player {
            Player::Engine => self.play_engine(&mut board)?,
            Player::Baseline => self.play_random(&mut board, seed)?,
        };

        let outcome = match board.state() {
            BoardState::Won => GameOutcome::Won,
            BoardState::Lost => GameOutcome::Lost,
            BoardState::Ready | BoardState::Active => GameOutcome::Stalled,
        };
        if outcome == GameOutcome::Lost {
            log::debug!("Lost on {:?}:\n{}", board.triggered_mine(), render::board(&board));
        }
        Ok(GameReport { outcome, steps })
    }

    /// Alternates between every forced move and a single best guess.
    fn play_engine(&self, board: &mut Board) -> anyhow::Result<usize> {
        let mut steps = 1;
        let mut applied = HashSet::new();

        'game: while !board.is_finished() && steps < self.max_steps {
            let forced = self.engine.find_forced_moves_excluding(&*board, &applied)?;
            if !forced.is_empty() {
                log::trace!("Applying {} forced moves", forced.len());
                for action in forced {
                    if board.is_finished() || steps >= self.max_steps {
                        break 'game;
                    }
                    board.apply(action)?;
                    applied.insert(action);
                    steps += 1;
                }
                continue;
            }

            if log::log_enabled!(log::Level::Debug) {
                let probabilities = self.engine.estimate_probabilities(&*board)?;
                log::debug!(
                    "Board before guess:\n{}\nProbabilities:\n{}",
                    render::board(&*board),
                    render::probabilities(board.size(), &probabilities)
                );
            }

            let Some(action) = self.engine.decide_next_action(&*board)? else {
                break;
            };
            log::debug!("Guessing {action}");
            board.apply(action)?;
            applied.insert(action);
            steps += 1;
        }
        Ok(steps)
    }

    fn play_random(&self, board: &mut Board, seed: u64) -> anyhow::Result<usize> {
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut steps = 1;

        while !board.is_finished() && steps < self.max_steps {
            let hidden = board.hidden_unflagged_cells();
            let Some(&coords) = hidden.choose(&mut rng) else {
                break;
            };
            log::trace!("Baseline reveals {coords:?}");
            board.reveal(coords)?;
            steps += 1;
        }
        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulation(size: Coord2, mines: CellCount, max_steps: usize) -> Simulation {
        Simulation {
            engine: DecisionEngine::default(),
            game_config: GameConfig::new(size, mines),
            start_tile: StartTile::AlwaysZero,
            max_steps,
        }
    }

    #[test]
    fn mine_free_board_is_won_on_the_opening() {
        let report = simulation((5, 5), 0, 100).play(7, Player::Engine).unwrap();

        assert_eq!(
            report,
            GameReport {
                outcome: GameOutcome::Won,
                steps: 1,
            }
        );
    }

    #[test]
    fn step_limit_stalls_the_game() {
        let report = simulation((16, 16), 40, 1).play(3, Player::Engine).unwrap();

        assert_eq!(report.steps, 1);
        assert_ne!(report.outcome, GameOutcome::Lost);
    }

    #[test]
    fn games_are_reproducible_from_their_seed() {
        let sim = simulation((9, 9), 10, 1_000);

        assert_eq!(
            sim.play(11, Player::Engine).unwrap(),
            sim.play(11, Player::Engine).unwrap()
        );
        assert_eq!(
            sim.play(11, Player::Baseline).unwrap(),
            sim.play(11, Player::Baseline).unwrap()
        );
    }

    #[test]
    fn baseline_plays_until_the_game_ends() {
        let report = simulation((9, 9), 10, 1_000).play(5, Player::Baseline).unwrap();

        assert_ne!(report.outcome, GameOutcome::Stalled);
        assert!(report.steps >= 1);
    }

    #[test]
    fn summary_counts_every_game() {
        let summary = simulation((9, 9), 10, 1_000).run(100, 5, false).unwrap();

        assert_eq!(summary.games, 5);
        let engine = &summary.engine;
        assert_eq!(engine.wins + engine.losses + engine.stalls, 5);
        assert!((0.0..=1.0).contains(&engine.win_rate));
        assert!(engine.average_steps >= 1.0);
        assert_eq!(summary.baseline, None);
    }

    #[test]
    fn baseline_is_tallied_on_the_same_boards() {
        let summary = simulation((9, 9), 10, 1_000).run(100, 4, true).unwrap();

        let baseline = summary.baseline.unwrap();
        assert_eq!(baseline.wins + baseline.losses + baseline.stalls, 4);
        assert!(baseline.win_rate <= 1.0);
    }
}

//! Benchmarks for the probability estimator and the full decision step.
//!
//! Boards are generated from fixed seeds, opened at the centre, then advanced by
//! applying forced moves until none remain, so every case is a position where the
//! engine actually has to estimate.
//!
//! # Running
//!
//! ```sh
//! cargo bench --bench estimator
//! ```

use std::{hint, time::Duration};

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hashbrown::HashSet;
use minewise_core::*;

const SEEDS: [u64; 3] = [0x5eed, 0xdead_beef, 42];

const BOARDS: [(&str, GameConfig); 2] = [
    ("intermediate", GameConfig::new_unchecked((16, 16), 40)),
    ("expert", GameConfig::new_unchecked((30, 16), 99)),
];

fn stuck_board(config: GameConfig, seed: u64) -> Board {
    let start = (config.size.0 / 2, config.size.1 / 2);
    let field = RandomMinefieldGenerator::new(seed, start, StartTile::AlwaysZero)
        .generate(config)
        .unwrap();
    let mut board = Board::new(field);
    board.reveal(start).unwrap();

    let engine = DecisionEngine::default();
    let mut applied = HashSet::new();
    while !board.is_finished() {
        let forced = engine.find_forced_moves_excluding(&board, &applied).unwrap();
        if forced.is_empty() {
            break;
        }
        for action in forced {
            if board.is_finished() {
                break;
            }
            board.apply(action).unwrap();
            applied.insert(action);
        }
    }
    board
}

fn bench_estimate(c: &mut Criterion) {
    let engine = DecisionEngine::default();

    for (name, config) in BOARDS {
        for (i, seed) in SEEDS.into_iter().enumerate() {
            let board = stuck_board(config, seed);
            c.bench_with_input(
                BenchmarkId::new(format!("estimate_{name}"), format!("seed_{i}")),
                &board,
                |b, board| b.iter(|| engine.estimate_probabilities(hint::black_box(board))),
            );
        }
    }
}

fn bench_decide(c: &mut Criterion) {
    let engine = DecisionEngine::default();

    for (name, config) in BOARDS {
        for (i, seed) in SEEDS.into_iter().enumerate() {
            let board = stuck_board(config, seed);
            c.bench_with_input(
                BenchmarkId::new(format!("decide_{name}"), format!("seed_{i}")),
                &board,
                |b, board| b.iter(|| engine.decide_next_action(hint::black_box(board))),
            );
        }
    }
}

criterion_group!(
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(8));
    targets =
        bench_estimate,
        bench_decide
);
criterion_main!(benches);

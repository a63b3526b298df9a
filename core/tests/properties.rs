use minewise_core::*;
use proptest::prelude::*;

/// Reveals safe picks and flags mined picks, so every flag on the board is correct.
fn truthful_board(
    (width, height): Coord2,
    mines: CellCount,
    seed: u64,
    picks: &[(u8, u8, bool)],
) -> Board {
    let config = GameConfig::new((width, height), mines.min(mult(width, height) - 1));
    let field = RandomMinefieldGenerator::new(seed, (0, 0), StartTile::SimpleSafe)
        .generate(config)
        .unwrap();
    let mut board = Board::new(field);
    board.reveal((0, 0)).unwrap();

    for &(a, b, flag) in picks {
        if board.is_finished() {
            break;
        }
        let coords = (a % width, b % height);
        if board.minefield().contains_mine(coords) {
            if flag && board.cell_at(coords).is_hidden() {
                board.toggle_flag(coords).unwrap();
            }
        } else {
            board.reveal(coords).unwrap();
        }
    }
    board
}

fn board_strategy() -> impl Strategy<Value = Board> {
    (
        3u8..8,
        3u8..8,
        1u16..14,
        any::<u64>(),
        prop::collection::vec((any::<u8>(), any::<u8>(), any::<bool>()), 0..14),
    )
        .prop_map(|(width, height, mines, seed, picks)| {
            truthful_board((width, height), mines, seed, &picks)
        })
}

/// Probability of each frontier cell over every consistent subset of at most `budget`
/// mines, by listing all subsets.
fn brute_force(set: &ConstraintSet, budget: usize) -> Option<Vec<f64>> {
    let n = set.frontier.len();
    let mut total = 0u64;
    let mut hits = vec![0u64; n];

    for mask in 0u32..(1 << n) {
        if mask.count_ones() as usize > budget {
            continue;
        }
        let consistent = set.constraints.iter().all(|constraint| {
            let placed = constraint
                .cells
                .iter()
                .filter(|&&cell| {
                    let id = set.frontier_index(cell).unwrap();
                    mask & (1 << id) != 0
                })
                .count();
            placed == usize::from(constraint.needed)
        });
        if consistent {
            total += 1;
            for (id, hit) in hits.iter_mut().enumerate() {
                if mask & (1 << id) != 0 {
                    *hit += 1;
                }
            }
        }
    }

    (total > 0).then(|| hits.iter().map(|&h| h as f64 / total as f64).collect())
}

proptest! {
    #[test]
    fn probabilities_cover_hidden_cells_within_bounds(board in board_strategy()) {
        let map = estimate_probabilities(&board).unwrap();
        let hidden = board.hidden_unflagged_cells();

        prop_assert_eq!(map.len(), hidden.len());
        for cell in hidden {
            let p = map.get(cell).unwrap();
            prop_assert!((0.0..=1.0).contains(&p), "{:?} has probability {}", cell, p);
        }
    }

    #[test]
    fn forced_moves_are_sound(board in board_strategy()) {
        for action in find_forced_moves(&board).unwrap() {
            let coords = action.coords();
            prop_assert!(board.cell_at(coords).is_hidden());
            match action {
                Action::Reveal(_) => prop_assert!(!board.minefield().contains_mine(coords)),
                Action::Flag(_) => prop_assert!(board.minefield().contains_mine(coords)),
            }
        }
    }

    #[test]
    fn decisions_are_deterministic(board in board_strategy()) {
        prop_assert_eq!(decide_next_action(&board).unwrap(), decide_next_action(&board).unwrap());
        prop_assert_eq!(
            estimate_probabilities(&board).unwrap(),
            estimate_probabilities(&board).unwrap()
        );
    }

    #[test]
    fn exact_estimate_matches_brute_force(board in board_strategy()) {
        let set = extract_constraints(&board);
        prop_assume!(!set.is_empty() && set.frontier.len() <= 14);

        let budget = board.remaining_mine_budget() as usize;
        let map = estimate_probabilities(&board).unwrap();
        let expected = brute_force(&set, budget).unwrap();
        let Estimate::Exact(summary) = map.estimate() else {
            panic!("expected an exact estimate, got {:?}", map.estimate());
        };

        let mut frontier_mass = 0.0;
        for (&cell, want) in set.frontier.iter().zip(&expected) {
            let got = map.get(cell).unwrap();
            prop_assert!((got - want).abs() < 1e-9, "{:?}: {} != {}", cell, got, want);
            frontier_mass += got;
        }
        prop_assert!((frontier_mass - summary.expected_frontier_mines).abs() < 1e-9);
    }

    #[test]
    fn no_clues_means_uniform(width in 1u8..10, height in 1u8..10, mines in 0u16..20) {
        let mines = mines.min(mult(width, height));
        let row = ".".repeat(usize::from(width));
        let rows: Vec<&str> = (0..height).map(|_| row.as_str()).collect();
        let obs = Observation::parse(&rows, mines).unwrap();

        let map = estimate_probabilities(&obs).unwrap();
        let uniform = f64::from(mines) / f64::from(mult(width, height));

        prop_assert_eq!(map.estimate(), Estimate::Uniform);
        for (_, p) in map.iter() {
            prop_assert!((p - uniform).abs() < 1e-12);
        }
    }
}

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use super::exact::solve_exact;
use super::relaxation::{LinearRow, solve_relaxed};
use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExactSummary {
    /// Consistent frontier assignments within the mine budget. Saturates to infinity on
    /// very large frontiers.
    pub assignments: f64,
    /// Mean number of frontier mines over those assignments.
    pub expected_frontier_mines: f64,
}

/// Which strategy produced a [`ProbabilityMap`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Estimate {
    /// Every cell shares the remaining mines evenly.
    Uniform,
    /// Frontier cells were counted over every consistent assignment.
    Exact(ExactSummary),
    /// Frontier cells come from a feasible point of the continuous relaxation.
    Relaxed,
}

/// Mine probability of every hidden, unflagged cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityMap {
    // keyed `(y, x)` so iteration is row-major
    probabilities: BTreeMap<(Coord, Coord), f64>,
    estimate: Estimate,
}

impl ProbabilityMap {
    pub(crate) fn new(estimate: Estimate) -> Self {
        Self {
            probabilities: BTreeMap::new(),
            estimate,
        }
    }

    pub(crate) fn insert(&mut self, (x, y): Coord2, probability: f64) {
        self.probabilities.insert((y, x), probability.clamp(0.0, 1.0));
    }

    pub fn estimate(&self) -> Estimate {
        self.estimate
    }

    pub fn get(&self, (x, y): Coord2) -> Option<f64> {
        self.probabilities.get(&(y, x)).copied()
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Cells and their probabilities in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, f64)> + '_ {
        self.probabilities
            .iter()
            .map(|(&(y, x), &probability)| ((x, y), probability))
    }
}

/// Share of the remaining mines per hidden cell, used wherever nothing better is known.
pub fn uniform_probability(set: &ConstraintSet, budget: usize) -> f64 {
    match set.hidden_count() {
        0 => 0.0,
        hidden => (budget as f64 / hidden as f64).clamp(0.0, 1.0),
    }
}

fn uniform_map(set: &ConstraintSet, budget: usize) -> ProbabilityMap {
    let probability = uniform_probability(set, budget);
    let mut map = ProbabilityMap::new(Estimate::Uniform);
    for &cell in set.frontier.iter().chain(&set.interior) {
        map.insert(cell, probability);
    }
    map
}

fn relaxed_frontier(set: &ConstraintSet, budget: usize, config: &EngineConfig) -> Option<Vec<f64>> {
    let mut rows: Vec<LinearRow> = set
        .constraints
        .iter()
        .map(|constraint| LinearRow {
            vars: constraint
                .cells
                .iter()
                .filter_map(|&cell| set.frontier_index(cell))
                .collect(),
            target: f64::from(constraint.needed),
        })
        .collect();

    let uniform = uniform_probability(set, budget);
    let interior_share = set.interior.len() as f64 * uniform;
    rows.push(LinearRow {
        vars: (0..set.frontier.len()).collect(),
        target: budget as f64 - interior_share,
    });

    solve_relaxed(set.frontier.len(), &rows, uniform, config.relaxation).or_else(|| {
        log::debug!("Relaxation infeasible with the global mine count, retrying clues alone");
        rows.pop();
        solve_relaxed(set.frontier.len(), &rows, uniform, config.relaxation)
    })
}

/// Estimates the mine probability of every hidden, unflagged cell of `grid`.
///
/// Frontier cells are counted exactly when every component is small enough, and
/// otherwise taken from the continuous relaxation. Interior cells, and every cell once
/// the clues contradict each other, get the uniform share of the remaining mines.
pub fn estimate_probabilities_with<G: GridView + ?Sized>(
    grid: &G,
    set: &ConstraintSet,
    config: &EngineConfig,
) -> ProbabilityMap {
    let budget = usize::try_from(grid.remaining_mine_budget()).unwrap_or(0);

    if set.hidden_count() == 0 {
        return ProbabilityMap::new(Estimate::Uniform);
    }
    if set.is_empty() {
        log::debug!("No usable clues, uniform estimate for {} cells", set.hidden_count());
        return uniform_map(set, budget);
    }

    let (estimate, frontier_probabilities) =
        if set.stats.max_component_size <= config.max_exact_component {
            match solve_exact(set, budget) {
                Some(solution) => (Estimate::Exact(solution.summary), solution.probabilities),
                None => {
                    log::debug!("No consistent assignment, falling back to uniform estimate");
                    return uniform_map(set, budget);
                }
            }
        } else {
            log::debug!(
                "Component of {} cells exceeds exact limit {}, relaxing",
                set.stats.max_component_size,
                config.max_exact_component
            );
            match relaxed_frontier(set, budget, config) {
                Some(values) => (Estimate::Relaxed, values),
                None => {
                    log::warn!("Relaxation infeasible, falling back to uniform estimate");
                    return uniform_map(set, budget);
                }
            }
        };

    let mut map = ProbabilityMap::new(estimate);
    for (&cell, &probability) in set.frontier.iter().zip(&frontier_probabilities) {
        map.insert(cell, probability);
    }
    let interior = uniform_probability(set, budget);
    for &cell in &set.interior {
        map.insert(cell, interior);
    }
    map
}

//! Exact mine probabilities over the frontier.
//!
//! Each component is enumerated on its own with a pruned backtracking search, tallying
//! consistent assignments by how many mines they use. The per-component tallies are then
//! convolved, so that only combinations using at most the remaining mine budget count.
//! This gives the same numbers as listing every consistent subset of the whole frontier.

use alloc::vec;
use alloc::vec::Vec;

use crate::*;

/// Per-cell probabilities for the frontier, in frontier order.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ExactSolution {
    pub probabilities: Vec<f64>,
    pub summary: ExactSummary,
}

/// Tallies for one component, indexed by the number of mines an assignment uses.
#[derive(Clone, Debug, PartialEq)]
struct ComponentTally {
    ways: Vec<u64>,
    hits: Vec<Vec<u64>>,
}

struct LocalConstraint {
    needed: usize,
    placed: usize,
    unassigned: usize,
}

struct Search<'a> {
    cell_constraints: &'a [Vec<usize>],
    constraints: Vec<LocalConstraint>,
    assignment: Vec<bool>,
    max_mines: usize,
    tally: ComponentTally,
}

impl Search<'_> {
    fn run(&mut self, depth: usize, mines: usize) {
        if depth == self.assignment.len() {
            self.tally.ways[mines] += 1;
            for (cell, _) in self.assignment.iter().enumerate().filter(|(_, mine)| **mine) {
                self.tally.hits[cell][mines] += 1;
            }
            return;
        }

        for mine in [false, true] {
            if mine && mines == self.max_mines {
                continue;
            }

            self.assignment[depth] = mine;
            let mut feasible = true;
            for &id in &self.cell_constraints[depth] {
                let constraint = &mut self.constraints[id];
                constraint.unassigned -= 1;
                constraint.placed += usize::from(mine);
                feasible &= constraint.placed <= constraint.needed
                    && constraint.placed + constraint.unassigned >= constraint.needed;
            }

            if feasible {
                self.run(depth + 1, mines + usize::from(mine));
            }

            for &id in &self.cell_constraints[depth] {
                let constraint = &mut self.constraints[id];
                constraint.unassigned += 1;
                constraint.placed -= usize::from(mine);
            }
        }
        self.assignment[depth] = false;
    }
}

fn tally_component(
    set: &ConstraintSet,
    component: &ConstraintComponent,
    max_mines: usize,
) -> ComponentTally {
    let cell_count = component.cell_ids.len();
    let mut cell_constraints = vec![Vec::new(); cell_count];
    let mut constraints = Vec::with_capacity(component.constraint_ids.len());

    for (local_id, &constraint_id) in component.constraint_ids.iter().enumerate() {
        let constraint = &set.constraints[constraint_id];
        for &cell in &constraint.cells {
            let local_cell = set
                .frontier_index(cell)
                .and_then(|id| component.cell_ids.binary_search(&id).ok());
            if let Some(local_cell) = local_cell {
                cell_constraints[local_cell].push(local_id);
            }
        }
        constraints.push(LocalConstraint {
            needed: usize::from(constraint.needed),
            placed: 0,
            unassigned: constraint.cells.len(),
        });
    }

    let max_mines = max_mines.min(cell_count);
    let mut search = Search {
        cell_constraints: &cell_constraints,
        constraints,
        assignment: vec![false; cell_count],
        max_mines,
        tally: ComponentTally {
            ways: vec![0; max_mines + 1],
            hits: vec![vec![0; max_mines + 1]; cell_count],
        },
    };
    search.run(0, 0);
    search.tally
}

/// Convolves two mine-count distributions, dropping counts above `cap`.
fn convolve(left: &[f64], right: &[f64], cap: usize) -> Vec<f64> {
    let len = (left.len() + right.len()).saturating_sub(1).min(cap + 1);
    let mut out = vec![0.0; len];
    for (i, &a) in left.iter().enumerate() {
        for (j, &b) in right.iter().enumerate().take(len.saturating_sub(i)) {
            out[i + j] += a * b;
        }
    }
    out
}

/// Returns `None` when no assignment satisfies every constraint within `budget` mines.
pub(crate) fn solve_exact(set: &ConstraintSet, budget: usize) -> Option<ExactSolution> {
    let tallies: Vec<ComponentTally> = set
        .components
        .iter()
        .map(|component| tally_component(set, component, budget))
        .collect();

    // Each component is rescaled to total weight one. Ratios are unaffected, and products
    // over many components stay finite.
    let mut weight_scale = 1.0;
    let mut distributions = Vec::with_capacity(tallies.len());
    let mut scales = Vec::with_capacity(tallies.len());
    for tally in &tallies {
        let total: u64 = tally.ways.iter().sum();
        if total == 0 {
            return None;
        }
        let total = total as f64;
        weight_scale *= total;
        scales.push(total);
        distributions.push(tally.ways.iter().map(|&w| w as f64 / total).collect::<Vec<_>>());
    }

    let count = distributions.len();
    let mut prefix = Vec::with_capacity(count + 1);
    prefix.push(vec![1.0]);
    for distribution in &distributions {
        let next = convolve(prefix.last()?, distribution, budget);
        prefix.push(next);
    }
    let mut suffix = vec![vec![1.0]; count + 1];
    for (i, distribution) in distributions.iter().enumerate().rev() {
        suffix[i] = convolve(distribution, &suffix[i + 1], budget);
    }

    let combined = &prefix[count];
    let total: f64 = combined.iter().sum();
    if total <= 0.0 {
        return None;
    }
    let expected_frontier_mines = combined
        .iter()
        .enumerate()
        .map(|(mines, weight)| mines as f64 * weight)
        .sum::<f64>()
        / total;

    let mut probabilities = vec![0.0; set.frontier.len()];
    for (index, (component, tally)) in set.components.iter().zip(&tallies).enumerate() {
        let others = convolve(&prefix[index], &suffix[index + 1], budget);
        // cumulative[m]: weight of the other components using at most `m` mines
        let mut cumulative = Vec::with_capacity(budget + 1);
        let mut running = 0.0;
        for m in 0..=budget {
            running += others.get(m).copied().unwrap_or(0.0);
            cumulative.push(running);
        }

        for (local_cell, &cell_id) in component.cell_ids.iter().enumerate() {
            let hits: f64 = tally.hits[local_cell]
                .iter()
                .enumerate()
                .map(|(mines, &h)| h as f64 / scales[index] * cumulative[budget - mines])
                .sum();
            probabilities[cell_id] = (hits / total).clamp(0.0, 1.0);
        }
    }

    Some(ExactSolution {
        probabilities,
        summary: ExactSummary {
            assignments: total * weight_scale,
            expected_frontier_mines,
        },
    })
}

//! Continuous relaxation of the frontier constraints.
//!
//! Every cell becomes a variable in `[0, 1]` and every constraint a linear equality. A
//! feasible point is found by cyclic projection: each sweep walks the equations in order
//! and moves the variables that are not pinned at a bound until the equation holds.

use alloc::vec::Vec;

use crate::*;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LinearRow {
    pub vars: Vec<usize>,
    pub target: f64,
}

impl LinearRow {
    fn residual(&self, values: &[f64]) -> f64 {
        self.target - self.vars.iter().map(|&v| values[v]).sum::<f64>()
    }
}

/// Moves the free variables of `row` evenly until it holds or every one of them is
/// pinned at the bound it is pushed against.
fn project(row: &LinearRow, values: &mut [f64], tolerance: f64) {
    for _ in 0..row.vars.len() {
        let residual = row.residual(values);
        if residual.abs() <= tolerance {
            return;
        }

        let free: Vec<usize> = row
            .vars
            .iter()
            .copied()
            .filter(|&v| if residual > 0.0 { values[v] < 1.0 } else { values[v] > 0.0 })
            .collect();
        if free.is_empty() {
            return;
        }

        let step = residual / free.len() as f64;
        for v in free {
            values[v] = (values[v] + step).clamp(0.0, 1.0);
        }
    }
}

/// Looks for a point in the unit box satisfying every row, starting from `start`.
pub(crate) fn solve_relaxed(
    var_count: usize,
    rows: &[LinearRow],
    start: f64,
    config: RelaxationConfig,
) -> Option<Vec<f64>> {
    let mut values = alloc::vec![start.clamp(0.0, 1.0); var_count];

    for sweep in 0..config.max_sweeps {
        for row in rows {
            project(row, &mut values, config.tolerance);
        }

        let worst = rows
            .iter()
            .map(|row| row.residual(&values).abs())
            .fold(0.0, f64::max);
        if worst <= config.tolerance {
            log::trace!("Relaxation converged after {} sweeps", sweep + 1);
            return Some(values);
        }
    }

    log::debug!(
        "Relaxation found no feasible point within {} sweeps",
        config.max_sweeps
    );
    None
}

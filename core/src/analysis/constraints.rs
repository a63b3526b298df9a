use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Mines still unaccounted for around one revealed clue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    pub clue: Coord2,
    /// Hidden, unflagged neighbors of the clue, in neighbor order.
    pub cells: Neighbors,
    /// Clue minus flagged or detonated neighbors; always within `0..=cells.len()`.
    pub needed: u8,
}

impl Constraint {
    pub fn is_all_safe(&self) -> bool {
        self.needed == 0 && !self.cells.is_empty()
    }

    pub fn is_all_mines(&self) -> bool {
        !self.cells.is_empty() && usize::from(self.needed) == self.cells.len()
    }
}

/// Frontier cells linked to each other through shared constraints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintComponent {
    /// Indices into [`ConstraintSet::frontier`], ascending.
    pub cell_ids: Vec<usize>,
    /// Indices into [`ConstraintSet::constraints`], ascending.
    pub constraint_ids: Vec<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintStats {
    pub constraint_count: usize,
    pub discarded_count: usize,
    pub frontier_size: usize,
    pub interior_size: usize,
    pub component_count: usize,
    pub max_component_size: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintSet {
    pub constraints: Vec<Constraint>,
    /// Hidden, unflagged cells named by at least one constraint, row-major.
    pub frontier: Vec<Coord2>,
    /// Hidden, unflagged cells no constraint knows about, row-major.
    pub interior: Vec<Coord2>,
    pub components: Vec<ConstraintComponent>,
    pub stats: ConstraintStats,
}

impl ConstraintSet {
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn hidden_count(&self) -> usize {
        self.frontier.len() + self.interior.len()
    }

    pub fn frontier_index(&self, coords: Coord2) -> Option<usize> {
        self.frontier
            .binary_search_by(|probe| row_major(probe, &coords))
            .ok()
    }
}

/// Derives one constraint per revealed clue that still touches a hidden, unflagged cell.
///
/// Clues that can no longer be satisfied (more flags than the clue, or fewer open cells
/// than the mines it still needs) are left out.
pub fn extract_constraints<G: GridView + ?Sized>(grid: &G) -> ConstraintSet {
    let size = grid.size();
    let mut constraints = Vec::new();
    let mut discarded_count = 0;

    for clue in iter_row_major(size) {
        let Some(clue_mines) = grid.cell_at(clue).clue() else {
            continue;
        };

        let mut flagged = 0;
        let mut cells = Neighbors::new();
        for neighbor in grid.neighbors_of(clue) {
            match grid.cell_at(neighbor) {
                // a detonated cell is a mine the player already knows about
                EngineCell::Flagged | EngineCell::Detonated => flagged += 1,
                EngineCell::Hidden => cells.push(neighbor),
                EngineCell::Revealed(_) => {}
            }
        }

        if cells.is_empty() {
            continue;
        }

        let needed = match clue_mines.checked_sub(flagged) {
            Some(needed) if usize::from(needed) <= cells.len() => needed,
            _ => {
                log::trace!(
                    "Discarding clue {clue_mines} at {clue:?}: {flagged} flags, {} open cells",
                    cells.len()
                );
                discarded_count += 1;
                continue;
            }
        };

        constraints.push(Constraint {
            clue,
            cells,
            needed,
        });
    }

    let mut frontier_mask: Array2<bool> = Array2::default(size.to_nd_index());
    for constraint in &constraints {
        for &cell in &constraint.cells {
            frontier_mask[cell.to_nd_index()] = true;
        }
    }

    let (frontier, interior) = grid
        .hidden_unflagged_cells()
        .into_iter()
        .partition::<Vec<_>, _>(|&coords| frontier_mask[coords.to_nd_index()]);

    let mut set = ConstraintSet {
        constraints,
        frontier,
        interior,
        components: Vec::new(),
        stats: ConstraintStats::default(),
    };
    set.components = build_components(&set);

    set.stats = ConstraintStats {
        constraint_count: set.constraints.len(),
        discarded_count,
        frontier_size: set.frontier.len(),
        interior_size: set.interior.len(),
        component_count: set.components.len(),
        max_component_size: set
            .components
            .iter()
            .map(|component| component.cell_ids.len())
            .max()
            .unwrap_or(0),
    };
    set
}

fn build_components(set: &ConstraintSet) -> Vec<ConstraintComponent> {
    let mut dsu = Dsu::new(set.frontier.len());
    let mut constraint_cells = Vec::with_capacity(set.constraints.len());

    for constraint in &set.constraints {
        let ids: Vec<usize> = constraint
            .cells
            .iter()
            .filter_map(|&cell| set.frontier_index(cell))
            .collect();
        if let Some((&first, rest)) = ids.split_first() {
            for &id in rest {
                dsu.union(first, id);
            }
        }
        constraint_cells.push(ids);
    }

    let mut root_to_component = BTreeMap::new();
    let mut components = Vec::new();

    for id in 0..set.frontier.len() {
        let root = dsu.find(id);
        let component_idx = *root_to_component.entry(root).or_insert_with(|| {
            components.push(ConstraintComponent {
                cell_ids: Vec::new(),
                constraint_ids: Vec::new(),
            });
            components.len() - 1
        });
        components[component_idx].cell_ids.push(id);
    }

    for (constraint_id, ids) in constraint_cells.iter().enumerate() {
        if let Some(&first) = ids.first() {
            let component_idx = root_to_component[&dsu.find(first)];
            components[component_idx].constraint_ids.push(constraint_id);
        }
    }

    components
}

#[derive(Clone, Debug)]
struct Dsu {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl Dsu {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, value: usize) -> usize {
        let mut root = value;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut current = value;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    fn union(&mut self, left: usize, right: usize) {
        let mut left_root = self.find(left);
        let mut right_root = self.find(right);

        if left_root == right_root {
            return;
        }

        if self.rank[left_root] < self.rank[right_root] {
            core::mem::swap(&mut left_root, &mut right_root);
        }

        self.parent[right_root] = left_root;
        if self.rank[left_root] == self.rank[right_root] {
            self.rank[left_root] += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_local_clue_constraint() {
        let field = Minefield::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        let mut board = Board::new(field);
        board.reveal((1, 1)).unwrap();

        let set = extract_constraints(&board);

        assert_eq!(set.constraints.len(), 1);
        let constraint = &set.constraints[0];
        assert_eq!(constraint.clue, (1, 1));
        assert_eq!(constraint.needed, 1);
        assert_eq!(constraint.cells.as_slice(), [(0, 0), (1, 0), (0, 1)]);
        assert_eq!(set.frontier, [(0, 0), (1, 0), (0, 1)]);
        assert!(set.interior.is_empty());
    }

    #[test]
    fn flags_reduce_needed_mines() {
        let obs = Observation::parse(&["F2", ".."], 2).unwrap();

        let set = extract_constraints(&obs);

        let constraint = &set.constraints[0];
        assert_eq!(constraint.clue, (1, 0));
        assert_eq!(constraint.needed, 1);
        assert_eq!(constraint.cells.as_slice(), [(0, 1), (1, 1)]);
    }

    #[test]
    fn discards_over_flagged_and_overfull_clues() {
        let over_flagged = Observation::parse(&["F0", ".."], 1).unwrap();
        let overfull = Observation::parse(&["3.", "11"], 3).unwrap();

        let over_flagged = extract_constraints(&over_flagged);
        let overfull = extract_constraints(&overfull);

        assert!(over_flagged.constraints.iter().all(|c| c.clue != (1, 0)));
        assert_eq!(over_flagged.stats.discarded_count, 1);
        assert!(overfull.constraints.iter().all(|c| c.clue != (0, 0)));
        assert_eq!(overfull.constraints.len(), 2);
        assert_eq!(overfull.stats.discarded_count, 1);
    }

    #[test]
    fn clues_without_open_neighbors_are_skipped() {
        let obs = Observation::parse(&["F1", "11"], 1).unwrap();

        let set = extract_constraints(&obs);

        assert!(set.is_empty());
        assert_eq!(set.stats.discarded_count, 0);
        assert_eq!(set.hidden_count(), 0);
    }

    #[test]
    fn splits_independent_components() {
        let obs = Observation::parse(&[".1..0"], 1).unwrap();

        let set = extract_constraints(&obs);

        assert_eq!(set.frontier, [(0, 0), (2, 0), (3, 0)]);
        assert_eq!(set.components.len(), 2);
        assert_eq!(set.components[0].cell_ids, [0, 1]);
        assert_eq!(set.components[0].constraint_ids, [0]);
        assert_eq!(set.components[1].cell_ids, [2]);
        assert_eq!(set.components[1].constraint_ids, [1]);
        assert_eq!(set.stats.max_component_size, 2);
    }

    #[test]
    fn untouched_cells_are_interior() {
        let obs = Observation::parse(&["1..", "...", "..."], 2).unwrap();

        let set = extract_constraints(&obs);

        assert_eq!(set.frontier, [(1, 0), (0, 1), (1, 1)]);
        assert_eq!(set.interior.len(), 5);
        assert_eq!(set.frontier_index((0, 1)), Some(1));
        assert_eq!(set.frontier_index((2, 2)), None);
    }
}

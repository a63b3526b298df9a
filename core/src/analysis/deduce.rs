use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::*;

/// Applies the two certain rules to every constraint: a clue whose mines are all
/// flagged frees its other neighbors, and a clue needing every open neighbor flags them.
///
/// Moves come out in constraint order, without duplicates and without anything in
/// `applied`. A cell forced both ways can only come from inconsistent clues and is
/// dropped.
pub fn deduce_forced_moves(constraints: &[Constraint], applied: &HashSet<Action>) -> Vec<Action> {
    let mut moves = Vec::new();
    let mut seen = HashSet::new();

    for constraint in constraints {
        let make: fn(Coord2) -> Action = if constraint.is_all_safe() {
            Action::Reveal
        } else if constraint.is_all_mines() {
            Action::Flag
        } else {
            continue;
        };

        for &cell in &constraint.cells {
            let action = make(cell);
            if !applied.contains(&action) && seen.insert(action) {
                moves.push(action);
            }
        }
    }

    let conflicting: HashSet<Coord2> = moves
        .iter()
        .filter(|action| action.is_reveal())
        .map(|action| action.coords())
        .filter(|&coords| seen.contains(&Action::Flag(coords)))
        .collect();

    if !conflicting.is_empty() {
        log::warn!(
            "Dropping {} cells forced both safe and mined by inconsistent clues",
            conflicting.len()
        );
        moves.retain(|action| !conflicting.contains(&action.coords()));
    }

    moves
}

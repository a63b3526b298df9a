use std::fmt::Write as _;

use minewise_core::*;

/// Draws the player's view, one text row per board row: `.` hidden, `F` flagged,
/// `*` detonated, and the clue digit for revealed cells.
pub fn board<G: GridView + ?Sized>(grid: &G) -> String {
    let (size_x, size_y) = grid.size();
    let mut out = String::new();
    for y in 0..size_y {
        for x in 0..size_x {
            let symbol = match grid.cell_at((x, y)) {
                EngineCell::Hidden => '.',
                EngineCell::Flagged => 'F',
                EngineCell::Detonated => '*',
                EngineCell::Revealed(clue) => char::from(b'0' + clue),
            };
            out.push(symbol);
        }
        out.push('\n');
    }
    out
}

/// Mine probabilities laid out like the board, with `--` for cells that have none.
pub fn probabilities(size: Coord2, map: &ProbabilityMap) -> String {
    let (size_x, size_y) = size;
    let mut out = String::new();
    for y in 0..size_y {
        for x in 0..size_x {
            if x > 0 {
                out.push(' ');
            }
            match map.get((x, y)) {
                Some(p) => {
                    let _ = write!(out, "{p:.2}");
                }
                None => out.push_str("  --"),
            }
        }
        out.push('\n');
    }
    out
}

/// Glyph selection for walls and floor.
///
/// Walls darken with distance in four nested buckets derived from the
/// camera depth. Each threshold is inclusive (`<=`), so a wall exactly at
/// `depth / 2` gets the denser `▒`. The goal always draws as `/`.
///
/// The floor is bucketed by how far a row sits between the horizon and the
/// bottom of the screen: rows near the bottom are close and dense, rows near
/// the horizon are far and fade to blank.

use super::cell::CellKind;

pub const BLANK: char = ' ';
pub const GOAL_GLYPH: char = '/';

/// Wall glyphs from far to near.
pub const WALL_FAR: char = '\u{2591}';  // ░
pub const WALL_MID: char = '\u{2592}';  // ▒
pub const WALL_NEAR: char = '\u{2593}'; // ▓
pub const WALL_FULL: char = '\u{2588}'; // █

/// Floor glyphs from near (bottom of the screen) to far.
pub const FLOOR_GLYPHS: [char; 5] = ['#', 'x', '-', '.', ' '];
const FLOOR_THRESHOLDS: [f64; 4] = [0.25, 0.5, 0.75, 0.9];

pub fn wall_glyph(distance: f64, depth: f64, kind: CellKind) -> char {
    if kind.is_goal() {
        return GOAL_GLYPH;
    }

    let mut shade = BLANK;
    if distance <= depth {
        shade = WALL_FAR;
    }
    if distance <= depth / 2.0 {
        shade = WALL_MID;
    }
    if distance <= depth / 3.0 {
        shade = WALL_NEAR;
    }
    if distance <= depth / 4.0 {
        shade = WALL_FULL;
    }
    shade
}

/// Glyph for floor row `y` given the integer horizon row.
/// Rows at or above the horizon are ceiling and stay blank.
pub fn floor_glyph(y: i64, rows: i64, horizon: i64) -> char {
    if y <= horizon {
        return BLANK;
    }
    let b = (rows - y) as f64 / (rows - horizon) as f64;
    FLOOR_THRESHOLDS
        .iter()
        .position(|&t| b < t)
        .map_or(FLOOR_GLYPHS[4], |i| FLOOR_GLYPHS[i])
}

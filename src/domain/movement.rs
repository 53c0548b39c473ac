/// Movement, rotation and pitch: the only way the camera changes.
///
/// ## Collision
///
/// Each axis is tested on its own:
///   1. tentative x is kept if the cell at (new_x, y) is not a wall
///   2. tentative y is kept if the cell at (x, new_y) is not a wall,
///      where x is the value after step 1
///
/// Hitting a wall on one axis never cancels the other, so the camera
/// slides along walls it approaches at an angle. Cells outside the grid
/// count as walls.
///
/// ## Time
///
/// Speeds are per second and scaled by the frame delta. A negative or
/// non-finite delta is treated as zero: nothing moves, nothing fails.

use super::camera::Camera;
use super::grid::Grid;
use super::vector::Vec2;

/// Everything the input layer can ask for in one frame.
/// Flags are independent; any subset may be set.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct MovementIntent {
    pub forward: bool,
    pub backward: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub look_up: bool,
    pub look_down: bool,
    pub quit: bool,
}

impl MovementIntent {
    /// Merge two intent sources (keyboard + gamepad).
    pub fn merge(self, other: MovementIntent) -> MovementIntent {
        MovementIntent {
            forward: self.forward || other.forward,
            backward: self.backward || other.backward,
            strafe_left: self.strafe_left || other.strafe_left,
            strafe_right: self.strafe_right || other.strafe_right,
            rotate_left: self.rotate_left || other.rotate_left,
            rotate_right: self.rotate_right || other.rotate_right,
            look_up: self.look_up || other.look_up,
            look_down: self.look_down || other.look_down,
            quit: self.quit || other.quit,
        }
    }
}

/// Clamp a frame delta to something safe to multiply with.
#[inline]
pub fn sanitize_dt(dt: f64) -> f64 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}

/// Apply one displacement with per-axis collision.
pub fn try_move(camera: &mut Camera, grid: &Grid, delta: Vec2) {
    let pos = camera.position;

    let new_x = pos.x + delta.x;
    if !grid.is_wall_at(new_x, pos.y) {
        camera.position.x = new_x;
    }

    let new_y = pos.y + delta.y;
    if !grid.is_wall_at(camera.position.x, new_y) {
        camera.position.y = new_y;
    }
}

/// Apply a frame's intent to the camera.
pub fn apply_intent(camera: &mut Camera, grid: &Grid, intent: &MovementIntent, dt: f64) {
    let dt = sanitize_dt(dt);
    if dt == 0.0 {
        return;
    }

    let step = camera.move_speed * dt;
    let turn = camera.rotate_speed * dt;
    let look = camera.pitch_speed * dt;

    if intent.forward {
        let d = camera.direction * step;
        try_move(camera, grid, d);
    }
    if intent.backward {
        let d = -(camera.direction * step);
        try_move(camera, grid, d);
    }
    if intent.strafe_right {
        let d = camera.plane * step;
        try_move(camera, grid, d);
    }
    if intent.strafe_left {
        let d = -(camera.plane * step);
        try_move(camera, grid, d);
    }

    if intent.rotate_right {
        camera.rotate(turn);
    }
    if intent.rotate_left {
        camera.rotate(-turn);
    }

    if intent.look_up {
        camera.adjust_pitch(look);
    }
    if intent.look_down {
        camera.adjust_pitch(-look);
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::domain::camera::PITCH_LIMIT;

    const EPS: f64 = 1e-9;

    /// Build a grid from a diagram. '#' = wall, 'P' = spawn, '$' = flag.
    fn grid_from(rows: &[&str]) -> Grid {
        let mut text = format!("{} {}\n", rows[0].len(), rows.len());
        for row in rows {
            let codes: Vec<&str> = row
                .chars()
                .map(|c| match c {
                    '#' => "2",
                    'P' => "1",
                    '$' => "3",
                    _ => "0",
                })
                .collect();
            text.push_str(&codes.join(" "));
            text.push('\n');
        }
        Grid::parse(&text).unwrap()
    }

    fn camera(x: f64, y: f64, facing: Vec2) -> Camera {
        Camera::new(Vec2::new(x, y), facing, &CameraConfig::default())
    }

    // Wall at column 3, row 2.
    fn walled() -> Grid {
        grid_from(&[
            "######",
            "#P   #",
            "#  # #",
            "#    #",
            "######",
        ])
    }

    // ── try_move ──

    #[test]
    fn blocked_axis_stays_other_axis_slides() {
        let g = walled();
        let mut c = camera(2.95, 2.5, Vec2::new(0.8, 0.6));
        try_move(&mut c, &g, Vec2::new(0.16, 0.12));
        assert_eq!(c.position.x, 2.95);
        assert!((c.position.y - 2.62).abs() < EPS);
    }

    #[test]
    fn open_move_updates_both_axes() {
        let g = walled();
        let mut c = camera(1.5, 1.5, Vec2::new(1.0, 0.0));
        try_move(&mut c, &g, Vec2::new(0.3, 0.2));
        assert!((c.position.x - 1.8).abs() < EPS);
        assert!((c.position.y - 1.7).abs() < EPS);
    }

    #[test]
    fn y_check_uses_updated_x() {
        // Moving from (2.9, 1.5) by (+0.2, +0.6): x lands in column 3 (open, row 1),
        // then y would enter (3, 2) which is the wall, so y is kept.
        let g = walled();
        let mut c = camera(2.9, 1.5, Vec2::new(1.0, 0.0));
        try_move(&mut c, &g, Vec2::new(0.2, 0.6));
        assert!((c.position.x - 3.1).abs() < EPS);
        assert_eq!(c.position.y, 1.5);
    }

    #[test]
    fn flag_cell_is_walkable() {
        let g = grid_from(&["#####", "#P $#", "#####"]);
        let mut c = camera(2.5, 1.5, Vec2::new(1.0, 0.0));
        try_move(&mut c, &g, Vec2::new(0.7, 0.0));
        assert!((c.position.x - 3.2).abs() < EPS);
    }

    #[test]
    fn outside_grid_blocks() {
        let g = grid_from(&["P  "]);
        let mut c = camera(0.5, 0.5, Vec2::new(-1.0, 0.0));
        try_move(&mut c, &g, Vec2::new(-0.6, -0.6));
        assert_eq!(c.position, Vec2::new(0.5, 0.5));
    }

    // ── apply_intent ──

    #[test]
    fn forward_moves_along_direction() {
        let g = walled();
        let mut c = camera(1.5, 1.5, Vec2::new(1.0, 0.0));
        let speed = c.move_speed;
        let intent = MovementIntent { forward: true, ..Default::default() };
        apply_intent(&mut c, &g, &intent, 0.1);
        assert!((c.position.x - (1.5 + speed * 0.1)).abs() < EPS);
        assert_eq!(c.position.y, 1.5);
    }

    #[test]
    fn backward_into_wall_is_blocked() {
        let g = walled();
        let mut c = camera(1.2, 1.5, Vec2::new(1.0, 0.0));
        let intent = MovementIntent { backward: true, ..Default::default() };
        apply_intent(&mut c, &g, &intent, 0.1);
        assert_eq!(c.position.x, 1.2);
    }

    #[test]
    fn strafe_right_follows_plane() {
        let g = walled();
        // Facing east, right is south (+y).
        let mut c = camera(1.5, 1.5, Vec2::new(1.0, 0.0));
        let intent = MovementIntent { strafe_right: true, ..Default::default() };
        apply_intent(&mut c, &g, &intent, 0.1);
        assert!(c.position.y > 1.5);
        assert!((c.position.x - 1.5).abs() < EPS);
    }

    #[test]
    fn rotate_left_then_right_restores_heading() {
        let g = walled();
        let mut c = camera(1.5, 1.5, Vec2::new(1.0, 0.0));
        let before = (c.direction, c.plane);
        apply_intent(&mut c, &g, &MovementIntent { rotate_left: true, ..Default::default() }, 0.25);
        assert!(c.direction.y < 0.0); // turned toward north
        apply_intent(&mut c, &g, &MovementIntent { rotate_right: true, ..Default::default() }, 0.25);
        assert!((c.direction.x - before.0.x).abs() < EPS);
        assert!((c.direction.y - before.0.y).abs() < EPS);
        assert!((c.plane.x - before.1.x).abs() < EPS);
        assert!((c.plane.y - before.1.y).abs() < EPS);
    }

    #[test]
    fn looking_never_exceeds_pitch_limit() {
        let g = walled();
        let mut c = camera(1.5, 1.5, Vec2::new(1.0, 0.0));
        let up = MovementIntent { look_up: true, ..Default::default() };
        for _ in 0..500 {
            apply_intent(&mut c, &g, &up, 0.5);
            assert!(c.pitch <= PITCH_LIMIT);
        }
        let down = MovementIntent { look_down: true, ..Default::default() };
        for _ in 0..500 {
            apply_intent(&mut c, &g, &down, 0.5);
            assert!(c.pitch >= -PITCH_LIMIT);
        }
        assert_eq!(c.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn bad_delta_time_changes_nothing() {
        let g = walled();
        let all = MovementIntent {
            forward: true,
            rotate_left: true,
            look_up: true,
            ..Default::default()
        };
        for dt in [-0.5, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.0] {
            let mut c = camera(1.5, 1.5, Vec2::new(1.0, 0.0));
            apply_intent(&mut c, &g, &all, dt);
            assert_eq!(c.position, Vec2::new(1.5, 1.5));
            assert_eq!(c.direction, Vec2::new(1.0, 0.0));
            assert_eq!(c.pitch, 0.0);
        }
    }

    #[test]
    fn merge_is_union() {
        let a = MovementIntent { forward: true, ..Default::default() };
        let b = MovementIntent { quit: true, rotate_left: true, ..Default::default() };
        let m = a.merge(b);
        assert!(m.forward && m.quit && m.rotate_left);
        assert!(!m.backward);
    }
}

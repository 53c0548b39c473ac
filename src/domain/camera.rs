/// Camera: the player's eye in the maze.
///
/// `direction` is unit length at construction. `plane` is perpendicular to it
/// and its magnitude sets the field of view (0.66 ≈ 66°). Rotation turns both
/// by the same matrix so the FOV geometry never drifts.

use crate::config::CameraConfig;
use super::vector::Vec2;

/// Pitch limit in screen rows, both directions.
pub const PITCH_LIMIT: f64 = 200.0;

#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec2,
    pub direction: Vec2,
    pub plane: Vec2,
    pub pitch: f64,        // horizon offset in screen rows
    pub depth: f64,        // shading falloff distance
    pub move_speed: f64,   // cells / second
    pub rotate_speed: f64, // radians / second
    pub pitch_speed: f64,  // rows / second
}

impl Camera {
    /// Camera at `position` looking along `facing`.
    pub fn new(position: Vec2, facing: Vec2, cfg: &CameraConfig) -> Self {
        let direction = facing.normalized();
        Camera {
            position,
            direction,
            plane: direction.perp_right() * cfg.fov_plane,
            pitch: 0.0,
            depth: cfg.depth,
            move_speed: cfg.move_speed,
            rotate_speed: cfg.rotate_speed,
            pitch_speed: cfg.pitch_speed,
        }
    }

    /// Camera standing in the middle of spawn cell `(col, row)`, facing east.
    pub fn at_spawn(spawn: (usize, usize), cfg: &CameraConfig) -> Self {
        let position = Vec2::new(spawn.0 as f64 + 0.5, spawn.1 as f64 + 0.5);
        Camera::new(position, Vec2::new(1.0, 0.0), cfg)
    }

    /// Rotate direction and plane together. Positive = clockwise on screen.
    pub fn rotate(&mut self, angle: f64) {
        self.direction = self.direction.rotated(angle);
        self.plane = self.plane.rotated(angle);
    }

    /// Shift the horizon, clamped to ±`PITCH_LIMIT`.
    pub fn adjust_pitch(&mut self, delta: f64) {
        self.pitch = (self.pitch + delta).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Integer cell the camera stands in.
    pub fn cell(&self) -> (i64, i64) {
        (self.position.x.floor() as i64, self.position.y.floor() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn cam() -> Camera {
        Camera::at_spawn((1, 1), &CameraConfig::default())
    }

    #[test]
    fn spawn_centers_in_cell() {
        let c = cam();
        assert_eq!(c.position, Vec2::new(1.5, 1.5));
        assert_eq!(c.cell(), (1, 1));
        assert!((c.direction.length() - 1.0).abs() < EPS);
    }

    #[test]
    fn plane_is_perpendicular_with_fov_magnitude() {
        let c = cam();
        let dot = c.direction.x * c.plane.x + c.direction.y * c.plane.y;
        assert!(dot.abs() < EPS);
        assert!((c.plane.length() - CameraConfig::default().fov_plane).abs() < EPS);
    }

    #[test]
    fn rotation_preserves_magnitudes() {
        let mut c = cam();
        let dir_len = c.direction.length();
        let plane_len = c.plane.length();
        for i in 0..100 {
            c.rotate(0.173 * (i as f64) - 3.0);
            assert!((c.direction.length() - dir_len).abs() < EPS);
            assert!((c.plane.length() - plane_len).abs() < EPS);
        }
    }

    #[test]
    fn rotation_keeps_plane_perpendicular() {
        let mut c = cam();
        c.rotate(1.234);
        let dot = c.direction.x * c.plane.x + c.direction.y * c.plane.y;
        assert!(dot.abs() < EPS);
    }

    #[test]
    fn pitch_clamps_both_ways() {
        let mut c = cam();
        for _ in 0..1000 {
            c.adjust_pitch(7.5);
            assert!(c.pitch <= PITCH_LIMIT);
        }
        assert_eq!(c.pitch, PITCH_LIMIT);
        for _ in 0..1000 {
            c.adjust_pitch(-7.5);
            assert!(c.pitch >= -PITCH_LIMIT);
        }
        assert_eq!(c.pitch, -PITCH_LIMIT);
    }
}

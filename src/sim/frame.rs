/// Frame composition: floor pass, then one wall stripe per column.
///
/// Processing order:
///   1. Floor/ceiling: every row below the horizon gets a distance shade,
///      rows at or above it are cleared.
///   2. Walls: one DDA ray per column. The stripe is centered on the
///      horizon, its height is `rows / distance`, rows above it are cleared
///      and it overwrites the floor where it extends.
///
/// Escaped rays are drawn as boundary walls and counted in the report.

use crate::domain::camera::Camera;
use crate::domain::grid::Grid;
use crate::domain::raycast::{cast_ray, RayHit};
use crate::domain::shade::{self, BLANK};
use super::surface::Surface;

/// Distances below this are clamped before computing stripe height.
const MIN_DISTANCE: f64 = 1e-6;

/// What happened while drawing one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Columns whose ray left the grid without a hit.
    pub escaped_columns: usize,
}

/// Draw the whole frame into `surface`.
pub fn render_frame(grid: &Grid, camera: &Camera, surface: &mut Surface) -> FrameReport {
    if surface.width() == 0 || surface.height() == 0 {
        return FrameReport::default();
    }

    render_floor(camera, surface);
    let report = render_walls(grid, camera, surface);

    if report.escaped_columns > 0 {
        tracing::warn!(
            columns = report.escaped_columns,
            x = camera.position.x,
            y = camera.position.y,
            "rays left the grid without hitting a wall; map is missing its border"
        );
    }
    report
}

/// Integer horizon row: `rows / 2 + pitch`, truncated.
#[inline]
pub fn horizon_row(rows: usize, pitch: f64) -> i64 {
    ((rows / 2) as f64 + pitch) as i64
}

pub fn render_floor(camera: &Camera, surface: &mut Surface) {
    let rows = surface.height();
    let horizon = horizon_row(rows, camera.pitch);

    for y in 0..rows {
        let glyph = shade::floor_glyph(y as i64, rows as i64, horizon);
        for x in 0..surface.width() {
            surface.set(x, y, glyph);
        }
    }
}

pub fn render_walls(grid: &Grid, camera: &Camera, surface: &mut Surface) -> FrameReport {
    let columns = surface.width();
    let mut report = FrameReport::default();

    for x in 0..columns {
        let camera_x = 2.0 * x as f64 / columns as f64 - 1.0;
        let ray_dir = camera.direction + camera.plane * camera_x;

        let hit = cast_ray(grid, camera.position, ray_dir).unwrap_or_else(|escaped| {
            report.escaped_columns += 1;
            escaped.boundary
        });

        draw_stripe(surface, x, &hit, camera);
    }

    report
}

/// Screen rows `[start, end)` covered by a wall at `distance`.
pub fn stripe_extent(rows: usize, distance: f64, pitch: f64) -> (usize, usize) {
    let center = (rows / 2) as f64 + pitch;
    let line_height = (rows as f64 / distance.max(MIN_DISTANCE)) as i64;
    let half = line_height / 2;

    let start = ((-half) as f64 + center) as i64;
    let end = (half as f64 + center) as i64; // inclusive

    let rows = rows as i64;
    let start = start.clamp(0, rows);
    let end = (end + 1).clamp(0, rows);
    (start as usize, end.max(start) as usize)
}

fn draw_stripe(surface: &mut Surface, x: usize, hit: &RayHit, camera: &Camera) {
    let (start, end) = stripe_extent(surface.height(), hit.distance, camera.pitch);
    let glyph = shade::wall_glyph(hit.distance, camera.depth, hit.kind);

    surface.fill_column(x, 0, start, BLANK);
    surface.fill_column(x, start, end, glyph);
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

/// DDA wall search.
///
/// A ray starts in the cell containing `origin` and steps cell by cell along
/// whichever axis reaches its next grid line first, until it enters a cell
/// that blocks rays (wall or goal).
///
/// ## Distances
///
/// `side_x` / `side_y` hold the ray length (in units of `ray_dir`) to the
/// next vertical / horizontal grid line. After the hit, one `delta` is taken
/// back off the stepped axis, which gives the distance to the camera plane
/// rather than to the camera point. No fisheye correction is needed.
///
/// ## Termination
///
/// A map without a wall border would let the ray walk off the grid. Leaving
/// the grid, or taking more than `width + height + 2` steps, ends the search
/// with `RayEscaped`, which still carries a hit at the boundary so the
/// renderer can draw it as a wall.

use super::cell::CellKind;
use super::grid::Grid;
use super::vector::Vec2;

/// Step size used when a ray component is exactly zero.
pub const FAR_DELTA: f64 = 1e30;

/// Which family of grid lines the ray crossed last.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
    X, // stepped along x: hit a vertical face
    Y, // stepped along y: hit a horizontal face
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RayHit {
    /// Perpendicular distance from the camera plane.
    pub distance: f64,
    pub side: Side,
    /// Cell the ray stopped in (may be outside the grid for escapes).
    pub cell: (i64, i64),
    /// Kind of the hit cell. Escaped rays report `Wall`.
    pub kind: CellKind,
}

/// The ray left the grid without meeting a blocking cell.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RayEscaped {
    /// Boundary hit to draw in place of a real wall.
    pub boundary: RayHit,
}

#[inline]
fn delta_for(component: f64) -> f64 {
    if component == 0.0 { FAR_DELTA } else { (1.0 / component).abs() }
}

/// Cast one ray from `origin` along `ray_dir`.
pub fn cast_ray(grid: &Grid, origin: Vec2, ray_dir: Vec2) -> Result<RayHit, RayEscaped> {
    let mut map_x = origin.x.floor() as i64;
    let mut map_y = origin.y.floor() as i64;

    let delta_x = delta_for(ray_dir.x);
    let delta_y = delta_for(ray_dir.y);

    let (step_x, mut side_x) = if ray_dir.x < 0.0 {
        (-1, (origin.x - map_x as f64) * delta_x)
    } else {
        (1, (map_x as f64 + 1.0 - origin.x) * delta_x)
    };
    let (step_y, mut side_y) = if ray_dir.y < 0.0 {
        (-1, (origin.y - map_y as f64) * delta_y)
    } else {
        (1, (map_y as f64 + 1.0 - origin.y) * delta_y)
    };

    let max_steps = grid.width() + grid.height() + 2;
    let mut side = Side::X;

    for _ in 0..max_steps {
        if side_x < side_y {
            side_x += delta_x;
            map_x += step_x;
            side = Side::X;
        } else {
            side_y += delta_y;
            map_y += step_y;
            side = Side::Y;
        }

        let distance = perpendicular(side, side_x, side_y, delta_x, delta_y);
        match grid.cell(map_x, map_y) {
            Some(kind) if kind.blocks_ray() => {
                return Ok(RayHit { distance, side, cell: (map_x, map_y), kind });
            }
            Some(_) => {}
            None => {
                return Err(RayEscaped {
                    boundary: RayHit { distance, side, cell: (map_x, map_y), kind: CellKind::Wall },
                });
            }
        }
    }

    let distance = perpendicular(side, side_x, side_y, delta_x, delta_y);
    Err(RayEscaped {
        boundary: RayHit { distance, side, cell: (map_x, map_y), kind: CellKind::Wall },
    })
}

#[inline]
fn perpendicular(side: Side, side_x: f64, side_y: f64, delta_x: f64, delta_y: f64) -> f64 {
    match side {
        Side::X => side_x - delta_x,
        Side::Y => side_y - delta_y,
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

//! Surface normals and slope derived from the elevation grid.
//!
//! Each cell's normal averages the face normals of four triangles fanned
//! around the cell, which removes the directional bias a single-triangle
//! scheme would introduce. Slope is `|normal . up|`: 0 is a vertical face,
//! 1 is flat ground.

use glam::Vec3;

use crate::grid::Grid;

/// Vertical exaggeration applied to [0, 1] elevations before triangulation.
const HEIGHT_SCALE: f32 = 255.0;

/// Compute per-cell unit surface normals from elevation.
///
/// Out-of-range neighbor coordinates clamp to the nearest edge index. A
/// zero-length averaged normal falls back to straight up.
pub fn normals(elevation: &Grid<f64>) -> Grid<Vec3> {
    let size = elevation.size();
    log::info!("generating normals, size={}", size);
    Grid::from_fn(size, |x, y| {
        let (xi, yi) = (x as isize, y as isize);
        let vertex = |dx: isize, dy: isize| {
            Vec3::new(
                (xi + dx) as f32,
                elevation.get_clamped(xi + dx, yi + dy) as f32 * HEIGHT_SCALE,
                (yi + dy) as f32,
            )
        };

        let v0 = vertex(0, 0);
        let v1 = vertex(1, 0);
        let v2 = vertex(0, 1);
        let v3 = vertex(1, -1);
        let v4 = vertex(-1, 1);
        let v5 = vertex(-1, 0);
        let v6 = vertex(0, -1);

        let n = (face_normal(v0, v1, v2)
            + face_normal(v0, v3, v1)
            + face_normal(v0, v2, v4)
            + face_normal(v0, v5, v6))
            / 4.0;

        if n.length_squared() > 0.0 {
            n.normalize()
        } else {
            Vec3::Y
        }
    })
}

/// Face normal of the triangle `(a, b, c)`, oriented so upward-facing
/// ground yields +Y.
fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (c - a).cross(b - a)
}

/// Derive the slope grid from unit normals as `|normal . (0, 1, 0)|`.
pub fn slopes(normals: &Grid<Vec3>) -> Grid<f64> {
    log::info!("generating slopes");
    normals.map(|n| n.dot(Vec3::Y).abs() as f64)
}

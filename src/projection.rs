//! Projecting terrain onto a cylinder around a viewpoint.
//!
//! The horizon seen from a viewpoint is the upper envelope of the terrain
//! after projecting it onto a cylinder centered at the viewpoint: the
//! horizontal coordinate of a projected point is its bearing, and the
//! vertical coordinate is the tangent of its elevation angle. A
//! front-facing triangle projects to a region whose upper boundary is an
//! x-monotone chain of two or three points, and the horizon is the envelope
//! of these chains.
//!
//! Terrain points are [`Point`]s whose `z` coordinate is the elevation.

use arrayvec::ArrayVec;

use crate::{
    geom::{orient, Orientation},
    MonotoneChain, Point,
};

/// Scaling factors for the cylindrical projection.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProjectionParams {
    /// Projected `x` coordinates are angles (in radians) times this.
    pub x_scale: f64,
    /// Projected `y` coordinates are elevation tangents times this.
    pub y_scale: f64,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        ProjectionParams {
            x_scale: 1000.0,
            y_scale: 10000.0,
        }
    }
}

impl ProjectionParams {
    /// The largest absolute value of a projected `x` coordinate.
    ///
    /// The cylinder is cut open directly behind the viewer (in the direction
    /// of positive `x`). Points on the cut don't project.
    pub fn max_x(&self) -> f64 {
        std::f64::consts::PI * self.x_scale - 1e-10
    }
}

/// Projects a terrain point onto the cylinder around `view`.
///
/// The projected point's `z` coordinate is the horizontal distance between
/// `view` and `p`.
///
/// Returns `None` if `p` is directly above or below the viewpoint, or if it
/// lies on the cut in the cylinder.
pub fn cylindrical_projection(view: Point, p: Point, params: &ProjectionParams) -> Option<Point> {
    let dist = (p.x - view.x).hypot(p.y - view.y);
    if dist == 0.0 {
        return None;
    }
    let x = (view.y - p.y).atan2(view.x - p.x) * params.x_scale;
    let max = params.max_x();
    if !(-max..=max).contains(&x) {
        return None;
    }
    let y = params.y_scale * (p.z - view.z) / dist;
    let ret = Point::with_z(x, y, dist);
    ret.is_finite().then_some(ret)
}

fn sub(a: Point, b: Point) -> [f64; 3] {
    [a.x - b.x, a.y - b.y, a.z - b.z]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Does the triangle face the viewpoint?
///
/// The triangle's vertices should be counter-clockwise when seen from above,
/// so that its normal points up.
pub fn is_front_facing(view: Point, [p0, p1, p2]: [Point; 3]) -> bool {
    let normal = cross(sub(p1, p0), sub(p2, p0));
    let dir = sub(p0, view);
    let len = dot(dir, dir).sqrt();
    len > 0.0 && dot(dir, normal) / len < 0.0
}

/// Projects a triangle and returns the upper boundary of its projection.
///
/// Returns `None` if any vertex fails to project, or if the projection is
/// degenerate (a vertical segment or a single point).
pub fn upper_boundary(
    view: Point,
    triangle: [Point; 3],
    params: &ProjectionParams,
) -> Option<MonotoneChain> {
    let mut ps = triangle
        .into_iter()
        .map(|p| cylindrical_projection(view, p, params))
        .collect::<Option<ArrayVec<Point, 3>>>()?;
    ps.sort();
    let [min, mid, max] = ps.into_inner().ok()?;

    match orient(min, max, mid) {
        Orientation::CounterClockwise if min.x == mid.x => {
            MonotoneChain::from_pair(mid, max).ok()
        }
        Orientation::CounterClockwise => MonotoneChain::from_triple(min, mid, max).ok(),
        _ if min.x < max.x => MonotoneChain::from_pair(min, max).ok(),
        _ => None,
    }
}

/// Computes the upper boundaries of all the front-facing triangles.
pub fn terrain_chains(
    view: Point,
    triangles: impl IntoIterator<Item = [Point; 3]>,
    params: &ProjectionParams,
) -> Vec<MonotoneChain> {
    let ret: Vec<_> = triangles
        .into_iter()
        .filter(|t| is_front_facing(view, *t))
        .filter_map(|t| upper_boundary(view, t, params))
        .collect();
    tracing::debug!(chains = ret.len(), "projected terrain");
    ret
}

/// Triangulates a regular grid of terrain points.
///
/// `points` are in row-major order, with `columns` points per row. Rows go
/// in the direction of increasing `y` and columns in the direction of
/// increasing `x`. Each grid cell is split into two triangles, which are
/// counter-clockwise when seen from above. A trailing partial row is
/// ignored.
pub fn grid_triangles(columns: usize, points: &[Point]) -> Vec<[Point; 3]> {
    if columns < 2 {
        return Vec::new();
    }
    let rows = points.len() / columns;
    let mut ret = Vec::with_capacity(2 * rows.saturating_sub(1) * (columns - 1));
    for r in 1..rows {
        for c in 1..columns {
            let p00 = points[(r - 1) * columns + c - 1];
            let p01 = points[(r - 1) * columns + c];
            let p10 = points[r * columns + c - 1];
            let p11 = points[r * columns + c];
            ret.push([p00, p01, p11]);
            ret.push([p00, p11, p10]);
        }
    }
    ret
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;

    fn p3(x: f64, y: f64, z: f64) -> Point {
        Point::with_z(x, y, z)
    }

    #[test]
    fn projection() {
        let view = p3(0.0, 0.0, 0.0);
        let params = ProjectionParams::default();

        assert_eq!(cylindrical_projection(view, p3(0.0, 0.0, 5.0), &params), None);
        // Directly behind us, on the cut.
        assert_eq!(cylindrical_projection(view, p3(10.0, 0.0, 0.0), &params), None);

        let p = cylindrical_projection(view, p3(-10.0, 0.0, 1.0), &params).unwrap();
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 1000.0);
        assert_eq!(p.z, 10.0);

        let p = cylindrical_projection(view, p3(0.0, -10.0, 5.0), &params).unwrap();
        assert!((p.x - FRAC_PI_2 * 1000.0).abs() < 1e-9);
        assert_eq!(p.y, 5000.0);
    }

    #[test]
    fn facing() {
        let view = p3(0.0, 0.0, 0.0);
        // Counter-clockwise from above, so the normal points up.
        let ground = [p3(-1.0, -1.0, -10.0), p3(1.0, -1.0, -10.0), p3(0.0, 1.0, -10.0)];
        assert!(is_front_facing(view, ground));
        let ceiling = ground.map(|p| p3(p.x, p.y, 10.0));
        assert!(!is_front_facing(view, ceiling));
    }

    #[test]
    fn boundaries() {
        let view = p3(0.0, 0.0, 0.0);
        let params = ProjectionParams::default();

        let peak = [p3(-10.0, -1.0, 0.0), p3(-10.0, 1.0, 0.0), p3(-10.0, 0.0, 2.0)];
        let c = upper_boundary(view, peak, &params).unwrap();
        assert_eq!(c.len(), 3);
        assert_eq!(c.points()[1].x, 0.0);
        assert_eq!(c.points()[1].y, 2000.0);

        let valley = [p3(-10.0, -1.0, 0.0), p3(-10.0, 1.0, 0.0), p3(-10.0, 0.0, -2.0)];
        let c = upper_boundary(view, valley, &params).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.first().y, 0.0);
        assert_eq!(c.last().y, 0.0);

        // Edge-on: every vertex has the same bearing.
        let edge_on = [p3(-10.0, 0.0, 0.0), p3(-20.0, 0.0, 0.0), p3(-30.0, 0.0, 3.0)];
        assert!(upper_boundary(view, edge_on, &params).is_none());
    }

    #[test]
    fn grid() {
        let points: Vec<_> = (0..3)
            .flat_map(|r| (0..4).map(move |c| p3(f64::from(c), f64::from(r), 0.0)))
            .collect();
        let tris = grid_triangles(4, &points);
        assert_eq!(tris.len(), 2 * 2 * 3);
        for [a, b, c] in tris {
            assert_eq!(orient(a, b, c), Orientation::CounterClockwise);
        }
        assert!(grid_triangles(1, &points).is_empty());
    }

    #[test]
    fn terrain() {
        // A wall to the west, facing east towards the viewer.
        let view = p3(0.0, 0.0, 0.0);
        let wall = [
            p3(-10.0, -5.0, 0.0),
            p3(-10.0, 5.0, 0.0),
            p3(-10.0, 5.0, 5.0),
            p3(-10.0, -5.0, 5.0),
        ];
        // The normals of these point towards +x.
        let tris = [[wall[0], wall[1], wall[2]], [wall[0], wall[2], wall[3]]];
        let back = tris.map(|[a, b, c]| [a, c, b]);
        let chains = terrain_chains(view, tris.into_iter().chain(back), &ProjectionParams::default());
        assert_eq!(chains.len(), 2);
    }
}

//! Utilities for generating examples, benchmarks, and test cases.

use crate::{projection::grid_triangles, MonotoneChain, Point};

// All the generators below produce strictly increasing, finite x, so this
// never drops anything.
fn chain(points: Vec<Point>) -> Option<MonotoneChain> {
    MonotoneChain::new(points).ok()
}

/// Generate `n` overlapping tents.
///
/// Tent `i` covers `[i, i + 3]`, and its peak height cycles through `1`, `2`
/// and `3`. Every tent overlaps its two neighbors on each side, so the
/// horizon alternates between tents at a steady rate.
pub fn sawtooth(n: usize) -> Vec<MonotoneChain> {
    (0..n)
        .filter_map(|i| {
            let x = i as f64;
            let h = 1.0 + (i % 3) as f64;
            chain(vec![
                Point::new(x, 0.0),
                Point::new(x + 1.5, h),
                Point::new(x + 3.0, 0.0),
            ])
        })
        .collect()
}

/// Generate `n` long zigzags that all cover `[0, len]`.
///
/// Zigzag `i` has a vertex at every integer, alternating between heights
/// `i + 1` and `-(i + 1)` (shifted by one step for odd `i`). So every pair of zigzags
/// crosses about `len` times, and the horizon is made up of pieces of
/// all of them.
pub fn zigzags(n: usize, len: usize) -> Vec<MonotoneChain> {
    (0..n)
        .filter_map(|i| {
            let amp = (i + 1) as f64;
            let points = (0..=len.max(1))
                .map(|j| {
                    let sign = if (i + j) % 2 == 0 { 1.0 } else { -1.0 };
                    Point::new(j as f64, sign * amp)
                })
                .collect();
            chain(points)
        })
        .collect()
}

/// A smooth, hilly height field.
pub fn terrain_height(x: f64, y: f64) -> f64 {
    40.0 * (x / 170.0).sin() * (y / 230.0).cos()
        + 15.0 * (x / 47.0 + y / 61.0).sin()
        + 4.0 * (x / 13.0).cos() * (y / 17.0).sin()
}

/// Generate an `n` by `n` grid of terrain points, `spacing` apart and
/// centered at the origin, and triangulate it.
///
/// Heights come from [`terrain_height`]. The triangles are counter-clockwise
/// when seen from above.
pub fn terrain_grid(n: usize, spacing: f64) -> Vec<[Point; 3]> {
    let offset = (n.saturating_sub(1)) as f64 * spacing / 2.0;
    let points: Vec<Point> = (0..n)
        .flat_map(|r| {
            (0..n).map(move |c| {
                let x = c as f64 * spacing - offset;
                let y = r as f64 * spacing - offset;
                Point::with_z(x, y, terrain_height(x, y))
            })
        })
        .collect();
    grid_triangles(n, &points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(sawtooth(10).len(), 10);
        let z = zigzags(3, 20);
        assert_eq!(z.len(), 3);
        assert!(z.iter().all(|c| c.len() == 21));
        assert_eq!(terrain_grid(5, 10.0).len(), 2 * 4 * 4);
    }
}

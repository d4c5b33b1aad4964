//! Strictly x-monotone polylines.

use kurbo::BezPath;

use crate::{
    geom::{Point, Segment, SegmentIntersection},
    Error,
};

/// An index identifying a chain during a merge.
///
/// The sweep never looks at chains by value: it puts all the chains of both
/// horizons in a slice and refers to them by their position in it. (Of
/// course, this breaks down if you mix up indices from different merges.)
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, serde::Serialize)]
pub struct ChainIdx(pub usize);

impl std::fmt::Debug for ChainIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c_{}", self.0)
    }
}

/// An immutable polyline whose `x` coordinates are strictly increasing.
///
/// A chain always has at least two points, and no two of its points share an
/// `x` coordinate. These are checked on construction, so a `MonotoneChain`
/// that exists is valid.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct MonotoneChain {
    points: Vec<Point>,
}

impl MonotoneChain {
    /// Creates a chain from a list of points, which must be finite and have
    /// strictly increasing `x` coordinates.
    pub fn new(points: Vec<Point>) -> Result<Self, Error> {
        if points.len() < 2 {
            return Err(Error::TooFewPoints { len: points.len() });
        }
        for p in &points {
            if p.x.is_nan() || p.y.is_nan() {
                return Err(Error::NaN);
            }
            if !p.is_finite() {
                return Err(Error::Infinity);
            }
        }
        if let Some(index) = points.windows(2).position(|w| w[1].x <= w[0].x) {
            return Err(Error::NotMonotone {
                index,
                x0: points[index].x,
                x1: points[index + 1].x,
            });
        }
        Ok(MonotoneChain { points })
    }

    /// Creates a chain with two points.
    pub fn from_pair(p0: Point, p1: Point) -> Result<Self, Error> {
        Self::new(vec![p0, p1])
    }

    /// Creates a chain with three points.
    pub fn from_triple(p0: Point, p1: Point, p2: Point) -> Result<Self, Error> {
        Self::new(vec![p0, p1, p2])
    }

    /// The number of points in this chain. It's always at least two.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// All the points, in increasing `x` order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The point at `index`, if there is one.
    pub fn get(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    /// The leftmost point.
    pub fn first(&self) -> &Point {
        &self.points[0]
    }

    /// The rightmost point.
    pub fn last(&self) -> &Point {
        &self.points[self.points.len() - 1]
    }

    /// The smallest `x` coordinate.
    pub fn min_x(&self) -> f64 {
        self.first().x
    }

    /// The largest `x` coordinate.
    pub fn max_x(&self) -> f64 {
        self.last().x
    }

    /// The segment starting at point `index`, if there is one.
    pub fn segment(&self, index: usize) -> Option<Segment> {
        let p0 = self.points.get(index)?;
        let p1 = self.points.get(index + 1)?;
        Some(Segment::new(*p0, *p1))
    }

    /// Iterates over the segments of this chain, from left to right.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points.windows(2).map(|w| Segment::new(w[0], w[1]))
    }

    /// Intersects the segment starting at point `index` with the vertical line at `x`.
    ///
    /// The vertical line is represented by a probe segment spanning the
    /// segment's `y` range, plus a margin on either side. The margin is at
    /// least as large as the segment's own `y` range (and at least one), so the
    /// probe always brackets the segment.
    ///
    /// Returns `None` if there is no segment at `index`, or if `x` is outside of
    /// the segment's horizontal range. This is an expected outcome at the ends
    /// of a chain, not an error. The returned point has exactly `x` as its
    /// horizontal coordinate, and if `x` is one of the segment's endpoints then
    /// the returned point is that endpoint.
    pub fn split_segment(&self, index: usize, x: f64) -> Option<Point> {
        let seg = self.segment(index)?;
        let margin = (seg.max_y() - seg.min_y()).max(1.0);
        let probe = Segment::new(
            Point::new(x, seg.min_y() - margin),
            Point::new(x, seg.max_y() + margin),
        );
        match seg.intersect(&probe) {
            SegmentIntersection::Touch(p) => Some(Point::new(x, p.y)),
            SegmentIntersection::Proper(_) => {
                // The crossing was computed in floating point, but we already
                // know its abscissa, and interpolation is the more accurate
                // way to get its ordinate.
                seg.y_at(x).map(|y| Point::new(x, y))
            }
            SegmentIntersection::None | SegmentIntersection::Collinear => None,
        }
    }

    /// The height of this chain at horizontal position `x`.
    ///
    /// Returns `None` if `x` is outside the chain's horizontal range.
    pub fn y_at(&self, x: f64) -> Option<f64> {
        if x < self.min_x() || x > self.max_x() {
            return None;
        }
        // The index of the first point strictly to the right of `x`.
        let idx = self.points.partition_point(|p| p.x <= x);
        if idx == self.points.len() {
            return Some(self.last().y);
        }
        self.segment(idx - 1)?.y_at(x)
    }

    /// Is this chain the left neighbor of `other` in some longer monotone polyline?
    ///
    /// That is, does our last point coincide with `other`'s first point?
    pub fn is_left_sibling_of(&self, other: &MonotoneChain) -> bool {
        self.last() == other.first()
    }

    /// Converts this chain to an open `kurbo` path.
    pub fn to_bez_path(&self) -> BezPath {
        let mut ret = BezPath::new();
        ret.move_to(self.first().to_kurbo());
        for p in &self.points[1..] {
            ret.line_to(p.to_kurbo());
        }
        ret
    }
}

impl TryFrom<Vec<Point>> for MonotoneChain {
    type Error = Error;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        MonotoneChain::new(points)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn chain(ps: &[(f64, f64)]) -> MonotoneChain {
        MonotoneChain::new(ps.iter().map(|&q| q.into()).collect()).unwrap()
    }

    #[test]
    fn construction_errors() {
        assert_matches!(
            MonotoneChain::new(vec![p(0.0, 0.0)]),
            Err(Error::TooFewPoints { len: 1 })
        );
        assert_matches!(
            MonotoneChain::new(vec![]),
            Err(Error::TooFewPoints { len: 0 })
        );
        assert_matches!(
            MonotoneChain::from_triple(p(0.0, 0.0), p(1.0, 0.0), p(1.0, 3.0)),
            Err(Error::NotMonotone { index: 1, .. })
        );
        assert_matches!(
            MonotoneChain::from_pair(p(2.0, 0.0), p(1.0, 0.0)),
            Err(Error::NotMonotone { index: 0, .. })
        );
        assert_matches!(
            MonotoneChain::from_pair(p(0.0, f64::NAN), p(1.0, 0.0)),
            Err(Error::NaN)
        );
        assert_matches!(
            MonotoneChain::from_pair(p(0.0, 0.0), p(f64::INFINITY, 0.0)),
            Err(Error::Infinity)
        );
    }

    #[test]
    fn accessors() {
        let c = chain(&[(0.0, 5.0), (7.0, 12.0), (14.0, 5.0)]);
        assert_eq!(c.len(), 3);
        assert_eq!(c.min_x(), 0.0);
        assert_eq!(c.max_x(), 14.0);
        assert_eq!(*c.first(), p(0.0, 5.0));
        assert_eq!(*c.last(), p(14.0, 5.0));
        assert_eq!(c.get(1), Some(&p(7.0, 12.0)));
        assert_eq!(c.get(3), None);
        assert_eq!(c.segments().count(), 2);
        assert!(c.segment(2).is_none());
    }

    #[test]
    fn split() {
        let c = chain(&[(0.0, 0.0), (10.0, 100.0), (20.0, 0.0)]);
        assert_eq!(c.split_segment(0, 5.0), Some(p(5.0, 50.0)));
        assert_eq!(c.split_segment(1, 15.0), Some(p(15.0, 50.0)));
        // Endpoints come back exactly.
        assert_eq!(c.split_segment(0, 10.0), Some(p(10.0, 100.0)));
        assert_eq!(c.split_segment(1, 20.0), Some(p(20.0, 0.0)));
        // Outside the segment, or past the end of the chain.
        assert_eq!(c.split_segment(0, 15.0), None);
        assert_eq!(c.split_segment(2, 20.0), None);
        assert_eq!(c.split_segment(7, 1.0), None);
    }

    #[test]
    fn split_flat_segment() {
        let c = chain(&[(0.0, 3.0), (10.0, 3.0)]);
        assert_eq!(c.split_segment(0, 4.0), Some(p(4.0, 3.0)));
    }

    #[test]
    fn y_at() {
        let c = chain(&[(0.0, 0.0), (10.0, 100.0), (20.0, 0.0)]);
        assert_eq!(c.y_at(0.0), Some(0.0));
        assert_eq!(c.y_at(10.0), Some(100.0));
        assert_eq!(c.y_at(20.0), Some(0.0));
        assert_eq!(c.y_at(15.0), Some(50.0));
        assert_eq!(c.y_at(-1.0), None);
        assert_eq!(c.y_at(21.0), None);
    }

    #[test]
    fn siblings() {
        let a = chain(&[(0.0, 0.0), (1.0, 1.0)]);
        let b = chain(&[(1.0, 1.0), (2.0, 0.0)]);
        let c = chain(&[(1.0, 2.0), (2.0, 0.0)]);
        assert!(a.is_left_sibling_of(&b));
        assert!(!b.is_left_sibling_of(&a));
        assert!(!a.is_left_sibling_of(&c));
    }

    proptest! {
    #[test]
    fn split_agrees_with_interpolation(
        x0 in -100.0..0.0f64,
        x1 in 1.0..100.0f64,
        y0 in -100.0..100.0f64,
        y1 in -100.0..100.0f64,
        t in 0.0..=1.0f64,
    ) {
        let c = chain(&[(x0, y0), (x1, y1)]);
        let x = (x0 + t * (x1 - x0)).clamp(x0, x1);
        let split = c.split_segment(0, x);
        prop_assert!(split.is_some());
        let split = split.unwrap();
        prop_assert_eq!(split.x, x);
        let expected = c.y_at(x).unwrap();
        prop_assert!((split.y - expected).abs() <= 1e-9 * (1.0 + expected.abs()));
    }
    }
}

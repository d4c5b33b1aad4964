//! Geometric primitives, like points and lines.

use crate::num::CheapOrderedFloat;

/// A two-dimensional point in projected space.
///
/// `x` is the (scaled) horizontal angle and `y` the (scaled) elevation. Points
/// are sorted by `x` and then by `y`, for the convenience of our sweep-line
/// algorithm (which moves in increasing `x`).
///
/// A point can also carry a `z` value. It is ignored by comparisons and by
/// every geometric predicate: it's just along for the ride, so that callers
/// can remember (for example) how far away a projected point was.
#[derive(Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component. Larger values are up.
    pub y: f64,
    /// Extra data that doesn't participate in the geometry.
    #[serde(default)]
    pub z: f64,
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Point {}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (
            CheapOrderedFloat::from(self.x),
            CheapOrderedFloat::from(self.y),
        )
            .cmp(&(
                CheapOrderedFloat::from(other.x),
                CheapOrderedFloat::from(other.y),
            ))
    }
}

impl PartialOrd for Point {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl Point {
    /// Create a new point with a zero `z` value.
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y, z: 0.0 }
    }

    /// Create a new point that carries a `z` value.
    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Point { x, y, z }
    }

    /// Are both coordinates finite?
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Converts to a `kurbo` point, dropping `z`.
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }

    fn to_robust(self) -> robust::Coord<f64> {
        robust::Coord {
            x: self.x,
            y: self.y,
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Self::new(p.x, p.y)
    }
}

/// The orientation of three points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// The third point is to the right of the line through the first two.
    ///
    /// If the line goes from left to right, this means "below".
    Clockwise,
    /// The three points are exactly collinear.
    Collinear,
    /// The third point is to the left of the line through the first two.
    ///
    /// If the line goes from left to right, this means "above".
    CounterClockwise,
}

/// Computes the orientation of `c` relative to the directed line from `a` to `b`.
///
/// This uses adaptive-precision arithmetic, so the answer is exact for all
/// finite inputs.
pub fn orient(a: Point, b: Point, c: Point) -> Orientation {
    let det = robust::orient2d(a.to_robust(), b.to_robust(), c.to_robust());
    if det > 0.0 {
        Orientation::CounterClockwise
    } else if det < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// How two line segments intersect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SegmentIntersection {
    /// The segments are disjoint.
    None,
    /// The segments lie on a common line and overlap (possibly in a single point).
    Collinear,
    /// The segments cross at a point in the interior of both.
    ///
    /// The point is computed in floating point, and then clamped to the
    /// bounding boxes of both segments.
    Proper(Point),
    /// The segments meet at a point that is an endpoint of at least one of them.
    ///
    /// The point is exactly that endpoint.
    Touch(Point),
}

/// A straight line segment.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// The start point.
    pub p0: Point,
    /// The end point.
    pub p1: Point,
}

impl std::fmt::Debug for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} -- {:?}", self.p0, self.p1)
    }
}

impl Segment {
    /// Create a new segment.
    pub fn new(p0: Point, p1: Point) -> Self {
        Segment { p0, p1 }
    }

    /// The smallest horizontal coordinate of this segment.
    pub fn min_x(&self) -> f64 {
        self.p0.x.min(self.p1.x)
    }

    /// The largest horizontal coordinate of this segment.
    pub fn max_x(&self) -> f64 {
        self.p0.x.max(self.p1.x)
    }

    /// The smallest vertical coordinate of this segment.
    pub fn min_y(&self) -> f64 {
        self.p0.y.min(self.p1.y)
    }

    /// The largest vertical coordinate of this segment.
    pub fn max_y(&self) -> f64 {
        self.p0.y.max(self.p1.y)
    }

    /// Does the bounding box of this segment meet the bounding box of `other`?
    fn boxes_meet(&self, other: &Segment) -> bool {
        self.min_x() <= other.max_x()
            && other.min_x() <= self.max_x()
            && self.min_y() <= other.max_y()
            && other.min_y() <= self.max_y()
    }

    /// Classifies the intersection between this segment and `other`.
    ///
    /// The classification only depends on exact orientation tests. Floating-point
    /// error can only affect the location of a [`SegmentIntersection::Proper`] point.
    pub fn intersect(&self, other: &Segment) -> SegmentIntersection {
        use Orientation::Collinear;

        if !self.boxes_meet(other) {
            return SegmentIntersection::None;
        }

        let (p0, p1) = (self.p0, self.p1);
        let (q0, q1) = (other.p0, other.p1);

        let pq0 = orient(p0, p1, q0);
        let pq1 = orient(p0, p1, q1);
        if pq0 == pq1 && pq0 != Collinear {
            return SegmentIntersection::None;
        }

        let qp0 = orient(q0, q1, p0);
        let qp1 = orient(q0, q1, p1);
        if qp0 == qp1 && qp0 != Collinear {
            return SegmentIntersection::None;
        }

        if pq0 == Collinear && pq1 == Collinear {
            // The bounding boxes meet, so collinear segments share at least one point.
            return SegmentIntersection::Collinear;
        }

        if pq0 == Collinear || pq1 == Collinear || qp0 == Collinear || qp1 == Collinear {
            let p = if p0 == q0 || p0 == q1 {
                p0
            } else if p1 == q0 || p1 == q1 {
                p1
            } else if pq0 == Collinear {
                q0
            } else if pq1 == Collinear {
                q1
            } else if qp0 == Collinear {
                p0
            } else {
                p1
            };
            return SegmentIntersection::Touch(p);
        }

        SegmentIntersection::Proper(self.crossing_point(other))
    }

    // Only meaningful if the two segments cross properly (and so aren't parallel).
    fn crossing_point(&self, other: &Segment) -> Point {
        let rx = self.p1.x - self.p0.x;
        let ry = self.p1.y - self.p0.y;
        let sx = other.p1.x - other.p0.x;
        let sy = other.p1.y - other.p0.y;
        let denom = rx * sy - ry * sx;
        debug_assert!(denom != 0.0);

        let t = ((other.p0.x - self.p0.x) * sy - (other.p0.y - self.p0.y) * sx) / denom;
        let x = self.p0.x + t * rx;
        let y = self.p0.y + t * ry;

        // Rounding can push the computed point slightly outside the segments.
        // Pull it back into the region where they can actually meet.
        let x_lo = self.min_x().max(other.min_x());
        let x_hi = self.max_x().min(other.max_x());
        let y_lo = self.min_y().max(other.min_y());
        let y_hi = self.max_y().min(other.max_y());
        Point::new(x.clamp(x_lo, x_hi), y.clamp(y_lo, y_hi))
    }

    /// The `y` coordinate of this segment at horizontal position `x`.
    ///
    /// Returns `None` if `x` is outside the horizontal extent of this segment,
    /// or if the segment is vertical.
    pub fn y_at(&self, x: f64) -> Option<f64> {
        if x < self.min_x() || x > self.max_x() || self.p0.x == self.p1.x {
            return None;
        }
        if x == self.p0.x {
            return Some(self.p0.y);
        }
        if x == self.p1.x {
            return Some(self.p1.y);
        }
        let t = (x - self.p0.x) / (self.p1.x - self.p0.x);
        Some((1.0 - t) * self.p0.y + t * self.p1.y)
    }
}

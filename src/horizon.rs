//! Horizons, and merging them.

use kurbo::BezPath;

use crate::{
    chain::{ChainIdx, MonotoneChain},
    geom::Point,
    sweep::{EventKind, Scheduler, Status},
    Error, InvariantViolation,
};

/// An upper envelope, represented as a left-to-right sequence of chains.
///
/// The chains don't overlap horizontally: each chain ends at or before the
/// point where the next one starts. Where a chain ends at exactly the same
/// `x` as the next one starts, they might share an endpoint (in which case
/// they're "siblings" and the envelope is continuous there) or there might
/// be a vertical jump between them.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Horizon {
    chains: Vec<MonotoneChain>,
}

impl Horizon {
    /// Creates an empty horizon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a horizon consisting of a single chain.
    pub fn from_chain(chain: MonotoneChain) -> Self {
        Horizon {
            chains: vec![chain],
        }
    }

    /// Creates a horizon from a sequence of chains, which must be sorted
    /// and non-overlapping.
    pub fn from_chains(chains: impl IntoIterator<Item = MonotoneChain>) -> Result<Self, Error> {
        let mut ret = Horizon::new();
        for c in chains {
            ret.add(c)?;
        }
        Ok(ret)
    }

    /// Appends a chain on the right.
    ///
    /// Fails if the new chain starts to the left of where the current last
    /// chain ends.
    pub fn add(&mut self, chain: MonotoneChain) -> Result<(), Error> {
        if let Some(last) = self.chains.last() {
            if last.max_x() > chain.min_x() {
                let v = InvariantViolation::Overlap {
                    prev_max_x: last.max_x(),
                    min_x: chain.min_x(),
                };
                tracing::error!(violation = ?v, "horizon chains overlap");
                return Err(v.into());
            }
        }
        self.chains.push(chain);
        self.check_invariants();
        Ok(())
    }

    /// The number of chains.
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Does this horizon have no chains?
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// The chains, from left to right.
    pub fn chains(&self) -> &[MonotoneChain] {
        &self.chains
    }

    /// Iterates over the chains, from left to right.
    pub fn iter(&self) -> std::slice::Iter<'_, MonotoneChain> {
        self.chains.iter()
    }

    /// Consumes this horizon, returning its chains.
    pub fn into_chains(self) -> Vec<MonotoneChain> {
        self.chains
    }

    /// The total number of points in all the chains.
    pub fn vertex_count(&self) -> usize {
        self.chains.iter().map(|c| c.len()).sum()
    }

    /// Are the chains sorted and non-overlapping?
    ///
    /// Horizons are checked as they're built, so this should always be true.
    pub fn is_valid(&self) -> bool {
        self.chains
            .windows(2)
            .all(|w| w[0].max_x() <= w[1].min_x())
    }

    /// The leftmost `x` coordinate covered by this horizon.
    pub fn min_x(&self) -> Option<f64> {
        self.chains.first().map(|c| c.min_x())
    }

    /// The rightmost `x` coordinate covered by this horizon.
    pub fn max_x(&self) -> Option<f64> {
        self.chains.last().map(|c| c.max_x())
    }

    /// The height of this horizon at `x`.
    ///
    /// If `x` is at a vertical jump, this is the height at the top of the jump.
    /// Returns `None` if no chain covers `x`.
    pub fn height_at(&self, x: f64) -> Option<f64> {
        let start = self.chains.partition_point(|c| c.max_x() < x);
        self.chains[start..]
            .iter()
            .take_while(|c| c.min_x() <= x)
            .filter_map(|c| c.y_at(x))
            .reduce(f64::max)
    }

    /// Computes the upper envelope of this horizon and another one.
    ///
    /// This is a single left-to-right sweep over the vertices of both
    /// horizons, so it takes time `O(n log n + k)`, where `n` is the total
    /// number of vertices and `k` the number of crossings.
    pub fn merge(&self, other: &Horizon) -> Result<Horizon, Error> {
        if other.is_empty() {
            return Ok(self.clone());
        }
        if self.is_empty() {
            return Ok(other.clone());
        }

        let chains: Vec<&MonotoneChain> = self.chains.iter().chain(&other.chains).collect();
        let mut sweep = Scheduler::new(Status::new(&chains));
        for (i, c) in chains.iter().enumerate() {
            let idx = ChainIdx(i);
            let last = c.len() - 1;
            sweep.add_event(c.min_x(), EventKind::Start(idx));
            for (j, p) in c.points().iter().enumerate().take(last).skip(1) {
                sweep.add_event(p.x, EventKind::Inner(idx, j));
            }
            sweep.add_event(c.max_x(), EventKind::Stop(idx, last));
        }
        let events = sweep.len();
        sweep.process()?;
        let ret = sweep.into_status().into_horizon()?;

        debug_assert!(ret.is_valid());
        tracing::debug!(
            left = self.len(),
            right = other.len(),
            events,
            output = ret.len(),
            vertices = ret.vertex_count(),
            "merged horizons"
        );
        Ok(ret)
    }

    /// Flattens this horizon into a single polyline.
    ///
    /// Siblings share an endpoint, and it only appears once. Vertical jumps
    /// become vertical segments, and gaps become straight segments, so if
    /// this horizon isn't continuous then the result isn't a faithful
    /// representation. See [`Horizon::to_multi_line_string`].
    pub fn to_line_string(&self) -> Vec<Point> {
        let mut ret = Vec::with_capacity(self.vertex_count());
        let mut prev: Option<&MonotoneChain> = None;
        for c in &self.chains {
            let skip = prev.is_some_and(|p| p.is_left_sibling_of(c));
            ret.extend_from_slice(&c.points()[usize::from(skip)..]);
            prev = Some(c);
        }
        ret
    }

    /// Flattens this horizon into one polyline per chain.
    pub fn to_multi_line_string(&self) -> Vec<Vec<Point>> {
        self.chains.iter().map(|c| c.points().to_vec()).collect()
    }

    /// Converts this horizon to a `kurbo` path.
    ///
    /// Siblings are joined into a single subpath. Every other chain starts a
    /// new subpath.
    pub fn to_bez_path(&self) -> BezPath {
        let mut ret = BezPath::new();
        let mut prev: Option<&MonotoneChain> = None;
        for c in &self.chains {
            if prev.is_some_and(|p| p.is_left_sibling_of(c)) {
                for p in &c.points()[1..] {
                    ret.line_to(p.to_kurbo());
                }
            } else {
                ret.extend(c.to_bez_path());
            }
            prev = Some(c);
        }
        ret
    }

    #[cfg(feature = "slow-asserts")]
    fn check_invariants(&self) {
        assert!(self.is_valid());
        for c in &self.chains {
            assert!(MonotoneChain::new(c.points().to_vec()).is_ok());
        }
    }

    #[cfg(not(feature = "slow-asserts"))]
    fn check_invariants(&self) {}

    /// Draws this horizon as an SVG document.
    #[cfg(feature = "debug-svg")]
    pub fn dump_svg(&self) -> svg::Document {
        let (Some(min_x), Some(max_x)) = (self.min_x(), self.max_x()) else {
            return svg::Document::new();
        };
        let points = self.chains.iter().flat_map(|c| c.points());
        let min_y = points.clone().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = points.map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        let w = (max_x - min_x).max(1.0);
        let h = (max_y - min_y).max(1.0);
        let stroke = w.max(h) / 500.0;

        let mut document = svg::Document::new().set(
            "viewBox",
            (min_x - w / 20.0, -max_y - h / 20.0, w * 1.1, h * 1.1),
        );
        for c in &self.chains {
            let mut data = svg::node::element::path::Data::new();
            // SVG's y axis points down.
            data = data.move_to((c.first().x, -c.first().y));
            for p in &c.points()[1..] {
                data = data.line_to((p.x, -p.y));
            }
            let path = svg::node::element::Path::new()
                .set("fill", "none")
                .set("stroke", "black")
                .set("stroke-width", stroke)
                .set("d", data);
            document = document.add(path);
        }
        document
    }
}

impl<'a> IntoIterator for &'a Horizon {
    type Item = &'a MonotoneChain;
    type IntoIter = std::slice::Iter<'a, MonotoneChain>;

    fn into_iter(self) -> Self::IntoIter {
        self.chains.iter()
    }
}

//! The merge state machine.

use crate::{
    chain::{ChainIdx, MonotoneChain},
    geom::{orient, Orientation, Point, Segment, SegmentIntersection},
    horizon::Horizon,
    Error, InvariantViolation,
};

use super::{Event, EventKind, SweepStatus};

/// A chain that is currently under the sweep-line, and the index of its
/// last vertex that the sweep-line has reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Active {
    chain: ChainIdx,
    cursor: usize,
}

impl Active {
    fn new(chain: ChainIdx) -> Self {
        Active { chain, cursor: 0 }
    }
}

/// How many chains are under the sweep-line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusState {
    /// No chains.
    Empty,
    /// Just one chain, which is on top.
    Single,
    /// Two chains, one on top and one hidden (or just touching) below.
    Double,
}

/// The status of a merge sweep.
///
/// There are at most two active chains: the "upper" one is visible and the
/// "lower" one is hidden beneath it. (Each of the two horizons being merged
/// has at most one chain covering any `x`, so that's all we need.) As the
/// sweep-line moves, the visible parts of the chains are accumulated into a
/// result polyline, and finished polylines are added to the output horizon.
#[derive(Clone, Debug)]
pub struct Status<'a> {
    chains: &'a [&'a MonotoneChain],
    upper: Option<Active>,
    lower: Option<Active>,
    result: Vec<Point>,
    horizon: Horizon,
}

impl<'a> Status<'a> {
    /// Creates an empty status over a collection of chains.
    ///
    /// Events refer to chains by their index in `chains`.
    pub fn new(chains: &'a [&'a MonotoneChain]) -> Self {
        Status {
            chains,
            upper: None,
            lower: None,
            result: Vec::new(),
            horizon: Horizon::new(),
        }
    }

    /// How many chains are currently active.
    pub fn state(&self) -> StatusState {
        match (self.upper, self.lower) {
            (None, _) => StatusState::Empty,
            (Some(_), None) => StatusState::Single,
            (Some(_), Some(_)) => StatusState::Double,
        }
    }

    /// The visible chain, if there is one.
    pub fn upper(&self) -> Option<ChainIdx> {
        self.upper.map(|a| a.chain)
    }

    /// The hidden chain, if there is one.
    pub fn lower(&self) -> Option<ChainIdx> {
        self.lower.map(|a| a.chain)
    }

    /// The horizon that has been finished so far.
    pub fn horizon(&self) -> &Horizon {
        &self.horizon
    }

    /// Consumes the status, returning the output horizon.
    ///
    /// This should only be called after all events have been processed.
    pub fn into_horizon(mut self) -> Result<Horizon, Error> {
        if self.upper.is_some() || self.lower.is_some() {
            return Err(self.violation(InvariantViolation::Unfinished));
        }
        if !self.result.is_empty() {
            self.finish()?;
        }
        Ok(self.horizon)
    }

    fn violation(&self, v: InvariantViolation) -> Error {
        tracing::error!(
            violation = ?v,
            upper = ?self.upper,
            lower = ?self.lower,
            last = ?self.result.last(),
            "merge status invariant violated"
        );
        Error::Invariant(v)
    }

    fn chain(&self, idx: ChainIdx) -> Result<&'a MonotoneChain, Error> {
        match self.chains.get(idx.0) {
            Some(c) => Ok(*c),
            None => Err(self.violation(InvariantViolation::UnknownChain(idx))),
        }
    }

    fn vertex(&self, a: Active) -> Result<Point, Error> {
        match self.chain(a.chain)?.get(a.cursor) {
            Some(p) => Ok(*p),
            None => Err(self.violation(InvariantViolation::BadVertex {
                chain: a.chain,
                index: a.cursor,
            })),
        }
    }

    /// The segment of an active chain that is currently under the sweep-line.
    ///
    /// Returns `None` if the chain has already reached its last point.
    fn segment(&self, a: Active) -> Result<Option<Segment>, Error> {
        Ok(self.chain(a.chain)?.segment(a.cursor))
    }

    fn swap(&mut self) {
        std::mem::swap(&mut self.upper, &mut self.lower);
    }

    /// Appends a visible point to the result.
    fn emit(&mut self, p: Point) -> Result<(), Error> {
        match self.result.last() {
            Some(last) if p.x < last.x => {
                return Err(self.violation(InvariantViolation::BackwardsEmission {
                    last_x: last.x,
                    x: p.x,
                }));
            }
            Some(last) if p.x == last.x => {
                if p.y != last.y {
                    // A vertical jump: the visible part is discontinuous here.
                    self.finish()?;
                    self.result.push(p);
                }
            }
            _ => self.result.push(p),
        }
        Ok(())
    }

    /// Turns the accumulated result into an output chain.
    fn finish(&mut self) -> Result<(), Error> {
        let points = std::mem::take(&mut self.result);
        if points.len() >= 2 {
            let chain = MonotoneChain::new(points)?;
            self.horizon.add(chain)?;
        }
        Ok(())
    }

    fn start(&mut self, c: ChainIdx) -> Result<(), Error> {
        if self.lower.is_some() {
            return Err(self.violation(InvariantViolation::StatusFull));
        }
        let chain = self.chain(c)?;
        let p = *chain.first();

        let Some(upper) = self.upper else {
            self.upper = Some(Active::new(c));
            return self.emit(p);
        };
        let Some(seg) = self.segment(upper)? else {
            // An upper chain that has reached its last point should already
            // have been stopped.
            return Err(self.violation(InvariantViolation::BadVertex {
                chain: upper.chain,
                index: upper.cursor + 1,
            }));
        };

        match orient(seg.p0, seg.p1, p) {
            Orientation::CounterClockwise => {
                if p.x > seg.p0.x {
                    if let Some(split) = self.chain(upper.chain)?.split_segment(upper.cursor, p.x)
                    {
                        self.emit(split)?;
                    }
                }
                self.lower = self.upper.replace(Active::new(c));
                self.emit(p)?;
            }
            Orientation::Collinear => {
                // The new chain starts on the upper segment, so whether it's
                // visible depends on where it goes next.
                let next = chain.points()[1];
                if orient(seg.p0, seg.p1, next) == Orientation::CounterClockwise {
                    self.emit(p)?;
                    self.lower = self.upper.replace(Active::new(c));
                } else {
                    self.lower = Some(Active::new(c));
                }
            }
            Orientation::Clockwise => {
                self.lower = Some(Active::new(c));
            }
        }

        self.intersect()
    }

    fn next(&mut self, c: ChainIdx, index: usize) -> Result<(), Error> {
        match (self.upper, self.lower) {
            (Some(mut upper), _) if upper.chain == c => {
                upper.cursor = index;
                self.upper = Some(upper);
                let p = self.vertex(upper)?;
                self.emit(p)?;
            }
            (_, Some(mut lower)) if lower.chain == c => {
                lower.cursor = index;
                self.lower = Some(lower);
            }
            _ => return Err(self.violation(InvariantViolation::UnknownChain(c))),
        }
        self.intersect()
    }

    fn stop(&mut self, c: ChainIdx, index: usize) -> Result<(), Error> {
        match (self.upper, self.lower) {
            (Some(mut upper), _) if upper.chain == c => {
                upper.cursor = index;
                let p = self.vertex(upper)?;
                self.emit(p)?;
                self.upper = self.lower.take();

                match self.upper {
                    Some(new_upper) => {
                        // Drop down to the chain that was hidden, unless the
                        // stopped chain ended right on top of it.
                        if let Some(seg) = self.segment(new_upper)? {
                            if orient(seg.p0, seg.p1, p) != Orientation::Collinear {
                                if let Some(split) =
                                    self.chain(new_upper.chain)?.split_segment(new_upper.cursor, p.x)
                                {
                                    self.emit(split)?;
                                }
                            }
                        }
                    }
                    None => self.finish()?,
                }
            }
            (_, Some(lower)) if lower.chain == c => {
                self.lower = None;
            }
            (None, None) => return Err(self.violation(InvariantViolation::EmptyStatus)),
            _ => return Err(self.violation(InvariantViolation::UnknownChain(c))),
        }
        Ok(())
    }

    /// Checks whether the two active chains meet before their next vertices.
    fn intersect(&mut self) -> Result<(), Error> {
        let (upper, lower) = match (self.upper, self.lower) {
            (Some(u), Some(l)) => (u, l),
            (Some(_), None) => return Ok(()),
            (None, _) => return Err(self.violation(InvariantViolation::EmptyStatus)),
        };
        let (Some(u), Some(l)) = (self.segment(upper)?, self.segment(lower)?) else {
            return Ok(());
        };

        match u.intersect(&l) {
            SegmentIntersection::Proper(ip) => {
                self.emit(ip)?;
                self.swap();
            }
            SegmentIntersection::Touch(p) => {
                // Touches at the far end get handled when the sweep-line
                // reaches the vertex there.
                if p != u.p1
                    && p != l.p1
                    && orient(u.p0, u.p1, l.p1) == Orientation::CounterClockwise
                {
                    self.emit(p)?;
                    self.swap();
                }
            }
            SegmentIntersection::Collinear | SegmentIntersection::None => {}
        }
        Ok(())
    }
}

impl SweepStatus for Status<'_> {
    type Error = Error;

    fn apply(&mut self, event: &Event) -> Result<(), Error> {
        match event.kind {
            EventKind::Start(c) => self.start(c)?,
            EventKind::Inner(c, index) => self.next(c, index)?,
            EventKind::Stop(c, index) => self.stop(c, index)?,
        }
        tracing::trace!(
            x = event.time,
            kind = ?event.kind,
            state = ?self.state(),
            upper = ?self.upper(),
            lower = ?self.lower(),
            "applied event"
        );
        Ok(())
    }
}

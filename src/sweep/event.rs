use crate::{chain::ChainIdx, num::CheapOrderedFloat};

/// What happens to a chain when the sweep-line reaches an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum EventKind {
    /// The chain begins (at its first point).
    Start(ChainIdx),
    /// The sweep-line reaches the interior vertex with the given index.
    Inner(ChainIdx, usize),
    /// The chain ends (at the vertex with the given index, which is its last).
    Stop(ChainIdx, usize),
}

impl EventKind {
    /// The tie-breaking priority of this kind of event. Higher goes first.
    ///
    /// At a common `x` coordinate, interior vertices are handled first, then
    /// chain ends, and then chain starts. In particular, a chain that ends
    /// at `x` leaves the sweep-line before a chain starting at `x` enters it,
    /// so there are never more than two chains active during a merge.
    pub fn priority(&self) -> u8 {
        match self {
            EventKind::Inner(..) => 3,
            EventKind::Stop(..) => 2,
            EventKind::Start(..) => 1,
        }
    }

    /// The chain that this event is about.
    pub fn chain(&self) -> ChainIdx {
        match self {
            EventKind::Start(c) | EventKind::Inner(c, _) | EventKind::Stop(c, _) => *c,
        }
    }
}

/// A scheduled event.
///
/// Events are ordered by time (i.e. horizontal position), then by decreasing
/// [priority](EventKind::priority), and finally by the order in which they
/// were scheduled, so that the sweep is deterministic.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Event {
    /// The horizontal position of the event.
    pub time: f64,
    /// What happens at this event.
    pub kind: EventKind,
    pub(crate) seq: u64,
}

impl Event {
    pub(crate) fn new(time: f64, kind: EventKind, seq: u64) -> Self {
        Event { time, kind, seq }
    }

    fn key(&self) -> (CheapOrderedFloat, std::cmp::Reverse<u8>, u64) {
        (
            CheapOrderedFloat::from(self.time),
            std::cmp::Reverse(self.kind.priority()),
            self.seq,
        )
    }
}

impl Eq for Event {}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priorities() {
        let c = ChainIdx(0);
        let start = Event::new(1.0, EventKind::Start(c), 0);
        let inner = Event::new(1.0, EventKind::Inner(c, 1), 1);
        let stop = Event::new(1.0, EventKind::Stop(c, 2), 2);
        assert!(inner < stop);
        assert!(stop < start);
        assert!(inner < start);

        // Time beats priority.
        let early_start = Event::new(0.5, EventKind::Start(c), 3);
        assert!(early_start < inner);

        // Insertion order breaks the remaining ties.
        let other_inner = Event::new(1.0, EventKind::Inner(ChainIdx(1), 1), 4);
        assert!(inner < other_inner);
    }
}

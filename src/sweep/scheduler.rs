use std::{cmp::Reverse, collections::BinaryHeap};

use super::{Event, EventKind};

/// The state that a [`Scheduler`] drives.
///
/// The scheduler knows nothing about what the events mean: it just hands
/// them, in order, to its status.
pub trait SweepStatus {
    /// The error that aborts a sweep.
    type Error;

    /// Updates the status to reflect that the sweep-line has reached `event`.
    fn apply(&mut self, event: &Event) -> Result<(), Self::Error>;
}

/// A time-ordered event queue, together with the status it updates.
///
/// The sweep is single-pass: events are handed to the status in order, and
/// once an event has been applied it is never revisited.
#[derive(Clone, Debug)]
pub struct Scheduler<S> {
    queue: BinaryHeap<Reverse<Event>>,
    status: S,
    next_seq: u64,
}

impl<S: SweepStatus> Scheduler<S> {
    /// Creates a scheduler with no pending events.
    pub fn new(status: S) -> Self {
        Scheduler {
            queue: BinaryHeap::new(),
            status,
            next_seq: 0,
        }
    }

    /// Schedules an event at horizontal position `time`.
    pub fn add_event(&mut self, time: f64, kind: EventKind) {
        debug_assert!(time.is_finite());
        self.queue
            .push(Reverse(Event::new(time, kind, self.next_seq)));
        self.next_seq += 1;
    }

    /// The number of pending events.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Are there no pending events?
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Removes and returns the next event, without applying it.
    pub fn pop_event(&mut self) -> Option<Event> {
        self.queue.pop().map(|Reverse(ev)| ev)
    }

    /// Runs the sweep until there are no more events.
    ///
    /// Stops at (and returns) the first error reported by the status. The
    /// event that failed, and any later ones, are not applied.
    pub fn process(&mut self) -> Result<(), S::Error> {
        while let Some(ev) = self.pop_event() {
            self.status.apply(&ev)?;
        }
        Ok(())
    }

    /// The status.
    pub fn status(&self) -> &S {
        &self.status
    }

    /// Consumes the scheduler, returning its status.
    pub fn into_status(self) -> S {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainIdx;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<EventKind>,
        fail_at: Option<usize>,
    }

    impl SweepStatus for Recorder {
        type Error = usize;

        fn apply(&mut self, event: &Event) -> Result<(), usize> {
            if self.fail_at == Some(self.seen.len()) {
                return Err(self.seen.len());
            }
            self.seen.push(event.kind);
            Ok(())
        }
    }

    #[test]
    fn processes_in_order() {
        let a = ChainIdx(0);
        let b = ChainIdx(1);
        let mut sched = Scheduler::new(Recorder::default());
        sched.add_event(2.0, EventKind::Start(b));
        sched.add_event(0.0, EventKind::Start(a));
        sched.add_event(2.0, EventKind::Stop(a, 2));
        sched.add_event(1.0, EventKind::Inner(a, 1));
        sched.add_event(2.0, EventKind::Inner(b, 1));
        assert_eq!(sched.len(), 5);

        sched.process().unwrap();
        assert!(sched.is_empty());
        assert_eq!(
            sched.into_status().seen,
            vec![
                EventKind::Start(a),
                EventKind::Inner(a, 1),
                EventKind::Inner(b, 1),
                EventKind::Stop(a, 2),
                EventKind::Start(b),
            ]
        );
    }

    #[test]
    fn stops_at_first_error() {
        let a = ChainIdx(0);
        let mut sched = Scheduler::new(Recorder {
            seen: Vec::new(),
            fail_at: Some(1),
        });
        sched.add_event(0.0, EventKind::Start(a));
        sched.add_event(1.0, EventKind::Inner(a, 1));
        sched.add_event(2.0, EventKind::Stop(a, 2));

        assert_eq!(sched.process(), Err(1));
        assert_eq!(sched.status().seen, vec![EventKind::Start(a)]);
        // The failing event was consumed, the rest are still pending.
        assert_eq!(sched.len(), 1);
    }
}

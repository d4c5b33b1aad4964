//! The sweep-line machinery behind [`Horizon::merge`](crate::Horizon::merge).
//!
//! A merge schedules one event per chain vertex in a [`Scheduler`], which
//! hands them (in increasing `x` order) to a [`Status`]. The status tracks
//! the (at most two) chains that are currently under the sweep-line, and
//! emits the visible parts of them.

mod event;
mod scheduler;
mod status;

pub use event::{Event, EventKind};
pub use scheduler::{Scheduler, SweepStatus};
pub use status::{Status, StatusState};

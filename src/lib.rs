#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;
mod chain;
pub mod geom;
mod horizon;
mod num;
pub mod projection;
pub mod sweep;

#[cfg(feature = "generators")]
pub mod generators;

pub use chain::{ChainIdx, MonotoneChain};
pub use geom::{Point, Segment};
pub use horizon::Horizon;
pub use num::CheapOrderedFloat;
pub use projection::ProjectionParams;

/// With the `rayon` feature, sub-problems with at least this many chains
/// are computed in parallel.
pub const PARALLEL_CUTOFF: usize = 64;

/// Some internal consistency check failed during a merge.
///
/// These indicate a bug (or numerical trouble that we didn't anticipate),
/// not a problem with the input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InvariantViolation {
    /// A chain started while two chains were already active.
    StatusFull,
    /// An event referred to a chain that isn't in the merge.
    UnknownChain(ChainIdx),
    /// An event referred to a vertex that its chain doesn't have.
    BadVertex {
        /// The chain.
        chain: ChainIdx,
        /// The vertex index.
        index: usize,
    },
    /// A chain stopped while no chains were active.
    EmptyStatus,
    /// The sweep ran out of events with chains still active.
    Unfinished,
    /// A point was emitted to the left of the previous one.
    BackwardsEmission {
        /// The `x` coordinate of the previously emitted point.
        last_x: f64,
        /// The `x` coordinate of the offending point.
        x: f64,
    },
    /// A chain was added to a horizon, overlapping the previous chain.
    Overlap {
        /// Where the previous chain ends.
        prev_max_x: f64,
        /// Where the new chain starts.
        min_x: f64,
    },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvariantViolation::StatusFull => {
                write!(f, "a chain started while two chains were active")
            }
            InvariantViolation::UnknownChain(c) => write!(f, "unknown chain {c:?}"),
            InvariantViolation::BadVertex { chain, index } => {
                write!(f, "chain {chain:?} has no vertex {index}")
            }
            InvariantViolation::EmptyStatus => write!(f, "no chains were active"),
            InvariantViolation::Unfinished => write!(f, "the sweep ended with active chains"),
            InvariantViolation::BackwardsEmission { last_x, x } => {
                write!(f, "emitted x = {x} after x = {last_x}")
            }
            InvariantViolation::Overlap { prev_max_x, min_x } => write!(
                f,
                "a chain starting at x = {min_x} overlaps one ending at x = {prev_max_x}"
            ),
        }
    }
}

/// The input points were faulty, or a merge went wrong.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Error {
    /// At least one of the inputs was infinite.
    Infinity,
    /// At least one of the inputs was not a number.
    NaN,
    /// A chain needs at least two points.
    TooFewPoints {
        /// How many points there were.
        len: usize,
    },
    /// A chain's `x` coordinates weren't strictly increasing.
    NotMonotone {
        /// The index of the point after which `x` failed to increase.
        index: usize,
        /// The `x` coordinate at `index`.
        x0: f64,
        /// The `x` coordinate at `index + 1`.
        x1: f64,
    },
    /// An internal invariant was violated.
    Invariant(InvariantViolation),
}

impl From<InvariantViolation> for Error {
    fn from(v: InvariantViolation) -> Self {
        Error::Invariant(v)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Infinity => write!(f, "one of the inputs was infinite"),
            Error::NaN => write!(f, "one of the inputs had a NaN"),
            Error::TooFewPoints { len } => {
                write!(f, "a chain needs at least two points, but got {len}")
            }
            Error::NotMonotone { index, x0, x1 } => write!(
                f,
                "chain is not x-monotone: x = {x1} at index {} follows x = {x0}",
                index + 1
            ),
            Error::Invariant(v) => write!(f, "internal invariant violated: {v}"),
        }
    }
}

impl std::error::Error for Error {}

/// Computes the upper envelope of a collection of chains.
///
/// The chains are sorted by their leftmost `x` coordinate and then merged
/// by divide and conquer. Sorting first means that neighboring sub-problems
/// cover neighboring horizontal ranges, which keeps the merges small.
pub fn compute_horizon(chains: impl IntoIterator<Item = MonotoneChain>) -> Result<Horizon, Error> {
    let mut chains: Vec<_> = chains.into_iter().collect();
    chains.sort_by_key(|c| CheapOrderedFloat::from(c.min_x()));

    let ret = if chains.is_empty() {
        Horizon::new()
    } else {
        compute_sorted(&chains)?
    };
    tracing::debug!(
        input = chains.len(),
        output = ret.len(),
        vertices = ret.vertex_count(),
        "computed horizon"
    );

    #[cfg(feature = "debug-svg")]
    {
        if let Err(e) = svg::save("horizon.svg", &ret.dump_svg()) {
            tracing::warn!(error = %e, "failed to write horizon.svg");
        }
    }

    Ok(ret)
}

// `chains` is non-empty.
fn compute_sorted(chains: &[MonotoneChain]) -> Result<Horizon, Error> {
    if let [chain] = chains {
        return Ok(Horizon::from_chain(chain.clone()));
    }
    let (left, right) = chains.split_at(chains.len().div_ceil(2));

    #[cfg(feature = "rayon")]
    let (left, right) = if chains.len() >= PARALLEL_CUTOFF {
        rayon::join(|| compute_sorted(left), || compute_sorted(right))
    } else {
        (compute_sorted(left), compute_sorted(right))
    };
    #[cfg(not(feature = "rayon"))]
    let (left, right) = (compute_sorted(left), compute_sorted(right));

    left?.merge(&right?)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn chain(ps: &[(f64, f64)]) -> MonotoneChain {
        MonotoneChain::new(ps.iter().map(|&q| q.into()).collect()).unwrap()
    }

    #[test]
    fn empty() {
        let h = compute_horizon(Vec::new()).unwrap();
        assert!(h.is_empty());
    }

    #[test]
    fn single() {
        let c = chain(&[(0.0, 0.0), (1.0, 2.0), (3.0, 1.0)]);
        let h = compute_horizon([c.clone()]).unwrap();
        assert_eq!(h, Horizon::from_chain(c));
    }

    #[test]
    fn unsorted_input() {
        // A row of little tents, given right-to-left, with a big tent over
        // the middle ones.
        let mut chains: Vec<_> = (0..10)
            .rev()
            .map(|i| {
                let x = 2.0 * f64::from(i);
                chain(&[(x, 0.0), (x + 1.0, 1.0), (x + 2.0, 0.0)])
            })
            .collect();
        chains.push(chain(&[(5.0, 0.0), (10.0, 10.0), (15.0, 0.0)]));

        let h = compute_horizon(chains).unwrap();
        assert!(h.is_valid());
        assert_eq!(h.min_x(), Some(0.0));
        assert_eq!(h.max_x(), Some(20.0));
        assert_eq!(h.height_at(1.0), Some(1.0));
        assert_eq!(h.height_at(10.0), Some(10.0));
        assert_eq!(h.height_at(19.0), Some(1.0));
        let y = h.height_at(12.5).unwrap();
        assert!((y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn arbitrary_chains() {
        arbtest::arbtest(|u| {
            let chains = crate::arbitrary::monotone_chains(u)?;
            let h = compute_horizon(chains.clone()).unwrap();
            assert!(h.is_valid());
            for c in &chains {
                for p in c.points() {
                    let y = h.height_at(p.x).unwrap();
                    assert!(y >= p.y - 1e-6 * (1.0 + p.y.abs()), "{y} is below {p:?}");
                }
            }
            Ok(())
        });
    }

    #[test]
    fn display() {
        let e = MonotoneChain::new(vec![Point::new(0.0, 0.0)]).unwrap_err();
        assert_eq!(e.to_string(), "a chain needs at least two points, but got 1");
        let e: Error = InvariantViolation::StatusFull.into();
        assert_matches!(e, Error::Invariant(InvariantViolation::StatusFull));
        assert_eq!(
            e.to_string(),
            "internal invariant violated: a chain started while two chains were active"
        );
    }
}

//! Utilities for fuzz and/or property testing using `arbitrary`.

use arbitrary::Unstructured;

use crate::{Horizon, MonotoneChain, Point};

/// Generate an arbitrary float in some range.
pub fn float_in_range(
    start: f64,
    end: f64,
    u: &mut Unstructured<'_>,
) -> Result<f64, arbitrary::Error> {
    let num: u32 = u.arbitrary()?;
    let t = num as f64 / u32::MAX as f64;
    Ok((1.0 - t) * start + t * end)
}

/// Generate a float in some range, but give it a chance to be exactly equal to another float.
///
/// Exact coincidences are where the sweep has to make its hardest decisions,
/// and they almost never happen by chance.
fn another_float_in_range(
    orig: &[f64],
    start: f64,
    end: f64,
    u: &mut Unstructured<'_>,
) -> Result<f64, arbitrary::Error> {
    if !orig.is_empty() && u.ratio(1, 4)? {
        let x = *u.choose(orig)?;
        Ok(x.clamp(start, end))
    } else {
        float_in_range(start, end, u)
    }
}

/// Generate an arbitrary chain with `x` coordinates in `[min_x, max_x]`.
///
/// With some probability, coordinates are copied from `snap_to`.
pub fn monotone_chain_in_range(
    min_x: f64,
    max_x: f64,
    snap_to: &[Point],
    u: &mut Unstructured<'_>,
) -> Result<MonotoneChain, arbitrary::Error> {
    let xs: Vec<f64> = snap_to.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = snap_to.iter().map(|p| p.y).collect();
    let len = u.int_in_range(2..=8)?;
    let mut points = Vec::with_capacity(len);
    for _ in 0..len {
        let x = another_float_in_range(&xs, min_x, max_x, u)?;
        let y = another_float_in_range(&ys, -1e3, 1e3, u)?;
        points.push(Point::new(x, y));
    }
    points.sort();
    points.dedup_by(|p, q| p.x == q.x);
    if points.len() < 2 {
        points = vec![Point::new(min_x, 0.0), Point::new(max_x, 0.0)];
    }
    MonotoneChain::new(points).map_err(|_| arbitrary::Error::IncorrectFormat)
}

/// Generate an arbitrary chain.
pub fn monotone_chain(u: &mut Unstructured<'_>) -> Result<MonotoneChain, arbitrary::Error> {
    monotone_chain_in_range(-1e3, 1e3, &[], u)
}

/// Generate a collection of arbitrary chains, which will likely overlap and
/// sometimes share coordinates.
pub fn monotone_chains(u: &mut Unstructured<'_>) -> Result<Vec<MonotoneChain>, arbitrary::Error> {
    let len = u.arbitrary_len::<[u32; 4]>()?.min(32);
    let mut ret: Vec<MonotoneChain> = Vec::with_capacity(len);
    let mut seen = Vec::new();
    for _ in 0..len {
        let c = monotone_chain_in_range(-1e3, 1e3, &seen, u)?;
        seen.extend_from_slice(c.points());
        ret.push(c);
    }
    Ok(ret)
}

/// Generate an arbitrary horizon.
///
/// The horizon's chains are sorted and non-overlapping, and they sometimes
/// touch or share endpoints.
pub fn horizon(u: &mut Unstructured<'_>) -> Result<Horizon, arbitrary::Error> {
    let len = u.int_in_range(0..=6)?;
    let mut ret = Horizon::new();
    let mut x = float_in_range(-1e3, 0.0, u)?;
    let mut last: Option<Point> = None;
    for _ in 0..len {
        let width = float_in_range(1.0, 200.0, u)?;
        let mut c = monotone_chain_in_range(x, x + width, &[], u)?;
        if let Some(last) = last {
            if u.arbitrary()? {
                // Make it a sibling of the previous chain.
                let mut points = c.points().to_vec();
                points[0] = last;
                c = MonotoneChain::new(points).map_err(|_| arbitrary::Error::IncorrectFormat)?;
            }
        }
        x = c.max_x();
        last = Some(*c.last());
        ret.add(c).map_err(|_| arbitrary::Error::IncorrectFormat)?;
        if u.arbitrary()? {
            x += float_in_range(0.0, 50.0, u)?;
        }
    }
    Ok(ret)
}

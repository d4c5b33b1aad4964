#![no_main]

use arbitrary::Unstructured;

use horizonsweeper::{arbitrary::horizon, Horizon};
use libfuzzer_sys::fuzz_target;

fn check(a: &Horizon, b: &Horizon) {
    let merged = a.merge(b).unwrap();
    assert!(merged.is_valid());

    let xs = a
        .iter()
        .chain(b.iter())
        .flat_map(|c| c.points().iter().map(|p| p.x));
    for x in xs {
        let expected = match (a.height_at(x), b.height_at(x)) {
            (Some(ya), Some(yb)) => Some(ya.max(yb)),
            (ya, yb) => ya.or(yb),
        };
        let actual = merged.height_at(x);
        match (expected, actual) {
            (Some(e), Some(m)) => assert!((e - m).abs() <= 1e-6 * (1.0 + e.abs()), "{e} vs {m}"),
            (e, m) => assert_eq!(e.is_some(), m.is_some()),
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    if let (Ok(a), Ok(b)) = (horizon(&mut u), horizon(&mut u)) {
        check(&a, &b);
    }
});

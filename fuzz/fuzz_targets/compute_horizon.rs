#![no_main]

use arbitrary::Unstructured;

use horizonsweeper::{arbitrary::monotone_chains, compute_horizon};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(chains) = monotone_chains(&mut u) else {
        return;
    };
    let horizon = compute_horizon(chains.clone()).unwrap();
    assert!(horizon.is_valid());
    assert_eq!(horizon.is_empty(), chains.is_empty());

    for c in &chains {
        for p in c.points() {
            let h = horizon.height_at(p.x).unwrap();
            assert!(h >= p.y - 1e-6 * (1.0 + p.y.abs()), "{h} below {p:?}");
        }
    }
});

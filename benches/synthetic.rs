use criterion::{black_box, criterion_group, criterion_main, Criterion};

use horizonsweeper::{
    compute_horizon,
    generators::{sawtooth, terrain_grid, zigzags},
    projection::terrain_chains,
    Horizon, Point, ProjectionParams,
};

fn sawtooth_horizon(c: &mut Criterion) {
    let chains = sawtooth(10_000);
    c.bench_function("sawtooth", |b| {
        b.iter(|| black_box(compute_horizon(chains.clone()).unwrap()))
    });
}

fn zigzag_merge(c: &mut Criterion) {
    let mut chains = zigzags(2, 10_000).into_iter();
    let a = Horizon::from_chain(chains.next().unwrap());
    let b = Horizon::from_chain(chains.next().unwrap());
    c.bench_function("zigzag merge", |bench| {
        bench.iter(|| black_box(a.merge(&b).unwrap()))
    });
}

fn terrain(c: &mut Criterion) {
    let triangles = terrain_grid(200, 5.0);
    let view = Point::with_z(0.0, 0.0, 60.0);
    let params = ProjectionParams::default();

    c.bench_function("terrain projection", |b| {
        b.iter(|| black_box(terrain_chains(view, triangles.iter().copied(), &params)))
    });

    let chains = terrain_chains(view, triangles.iter().copied(), &params);
    c.bench_function("terrain horizon", |b| {
        b.iter(|| black_box(compute_horizon(chains.clone()).unwrap()))
    });
}

criterion_group!(benches, sawtooth_horizon, zigzag_merge, terrain);
criterion_main!(benches);

use horizonsweeper::{
    compute_horizon,
    generators::{terrain_grid, terrain_height},
    projection::{cylindrical_projection, is_front_facing, terrain_chains, upper_boundary},
    Horizon, Point, ProjectionParams,
};

fn setup(n: usize) -> (Point, Vec<[Point; 3]>) {
    let view = Point::with_z(0.25, 0.25, terrain_height(0.0, 0.0) + 1.8);
    (view, terrain_grid(n, 10.0))
}

#[test]
fn horizon_covers_terrain() {
    let (view, triangles) = setup(30);
    let params = ProjectionParams::default();
    let chains = terrain_chains(view, triangles.iter().copied(), &params);
    assert!(!chains.is_empty());

    let horizon = compute_horizon(chains.clone()).unwrap();
    assert!(horizon.is_valid());
    assert!(horizon.min_x().unwrap() >= -params.max_x());
    assert!(horizon.max_x().unwrap() <= params.max_x());

    // Every vertex of a visible triangle is on or below the horizon.
    let visible = triangles
        .iter()
        .filter(|t| is_front_facing(view, **t) && upper_boundary(view, **t, &params).is_some());
    for t in visible {
        for p in t {
            let Some(q) = cylindrical_projection(view, *p, &params) else {
                continue;
            };
            let h = horizon.height_at(q.x).unwrap();
            assert!(h >= q.y - 1e-6 * (1.0 + q.y.abs()), "{h} below {q:?}");
        }
    }
}

#[test]
fn order_of_merging_is_irrelevant() {
    let (view, triangles) = setup(16);
    let chains = terrain_chains(view, triangles, &ProjectionParams::default());

    let all_at_once = compute_horizon(chains.clone()).unwrap();
    let one_by_one = chains.iter().fold(Horizon::new(), |acc, c| {
        acc.merge(&Horizon::from_chain(c.clone())).unwrap()
    });

    let xs = chains.iter().flat_map(|c| c.points().iter().map(|p| p.x));
    for x in xs {
        let a = all_at_once.height_at(x).unwrap();
        let b = one_by_one.height_at(x).unwrap();
        assert!((a - b).abs() <= 1e-6 * (1.0 + a.abs()), "x = {x}: {a} vs {b}");
    }
}

#[test]
fn flattening() {
    let (view, triangles) = setup(20);
    let chains = terrain_chains(view, triangles, &ProjectionParams::default());
    let horizon = compute_horizon(chains).unwrap();

    let line = horizon.to_line_string();
    assert!(line.windows(2).all(|w| w[0].x <= w[1].x));
    assert!(line.windows(2).all(|w| w[0] != w[1]));
    assert!(line.len() <= horizon.vertex_count());

    let multi = horizon.to_multi_line_string();
    assert_eq!(multi.len(), horizon.len());
    assert_eq!(
        multi.iter().map(Vec::len).sum::<usize>(),
        horizon.vertex_count()
    );
}

use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use saferouting_lib::{Coordinate, Edge, Graph, Node, Router};
use std::hint::black_box;

const GRID_SIDE: i64 = 60;
const SPACING: f64 = 0.0005;

/// Square street grid with two-way edges between orthogonal neighbours.
static GRID: Lazy<Graph> = Lazy::new(|| {
    let id = |row: i64, col: i64| row * GRID_SIDE + col;
    let nodes = (0..GRID_SIDE).flat_map(|row| {
        (0..GRID_SIDE).map(move |col| Node {
            id: id(row, col),
            position: Coordinate::new(col as f64 * SPACING, row as f64 * SPACING),
        })
    });

    let mut edges = Vec::new();
    for row in 0..GRID_SIDE {
        for col in 0..GRID_SIDE {
            let weight = 0.05 + ((row * 7 + col * 13) % 5) as f64 * 0.01;
            for (next_row, next_col) in [(row + 1, col), (row, col + 1)] {
                if next_row < GRID_SIDE && next_col < GRID_SIDE {
                    let (here, there) = (id(row, col), id(next_row, next_col));
                    edges.push((here, Edge { target: there, weight }));
                    edges.push((there, Edge { target: here, weight }));
                }
            }
        }
    }
    Graph::from_parts(nodes, edges)
});

static CORNERS: Lazy<(Coordinate, Coordinate)> = Lazy::new(|| {
    let far = (GRID_SIDE - 1) as f64 * SPACING;
    (Coordinate::new(0.0, 0.0), Coordinate::new(far, far))
});

fn benchmark_pathfinding(c: &mut Criterion) {
    let (from, to) = *CORNERS;

    c.bench_function("grid_corner_to_corner_cold", |b| {
        b.iter(|| {
            let mut router = Router::new(GRID.clone(), None, None).expect("router builds");
            let route = router.get_path(from, to).expect("route exists");
            black_box(route.len())
        });
    });

    c.bench_function("grid_corner_to_corner_cached", |b| {
        let mut router = Router::new(GRID.clone(), None, None).expect("router builds");
        router.get_path(from, to).expect("warm-up route");
        b.iter(|| {
            let route = router.get_path(from, to).expect("route exists");
            black_box(route.cost)
        });
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);

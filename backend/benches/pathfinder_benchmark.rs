use std::collections::HashMap;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use airnav::algorithms::{
    aggregate_congestion, build_graph, set_random_congestion, shortest_path, CheckpointSet,
    RandomCongestion,
};
use airnav::models::{Location, LocationId, NewLocation, Path, PathId, Wall, WallId};

/// Square grid of `side * side` locations, 10 units apart, 4-connected.
fn grid(side: i64) -> (HashMap<LocationId, Location>, Vec<Path>) {
    let id = |row: i64, col: i64| row * side + col;
    let mut locations = HashMap::new();
    let mut paths = Vec::new();

    for row in 0..side {
        for col in 0..side {
            let location_id = LocationId(id(row, col));
            let location = NewLocation::new(
                format!("L{}", location_id),
                "junction",
                col as f64 * 10.0,
                row as f64 * 10.0,
            )
            .into_location(location_id);
            locations.insert(location_id, location);

            for (r, c) in [(row, col + 1), (row + 1, col)] {
                if r < side && c < side {
                    paths.push(Path {
                        id: PathId(paths.len() as i64 + 1),
                        source_id: location_id,
                        destination_id: LocationId(id(r, c)),
                        distance: 10.0,
                        congestion: 1,
                    });
                }
            }
        }
    }
    (locations, paths)
}

/// Horizontal walls with a gap at alternating ends, forcing a zig-zag.
fn baffles(side: i64) -> Vec<Wall> {
    let width = (side - 1) as f64 * 10.0;
    (1..side)
        .step_by(2)
        .enumerate()
        .map(|(i, row)| {
            let y = row as f64 * 10.0 - 5.0;
            let (x1, x2) = if i % 2 == 0 {
                (-5.0, width - 5.0)
            } else {
                (5.0, width + 5.0)
            };
            Wall {
                id: WallId(i as i64 + 1),
                x1,
                y1: y,
                x2,
                y2: y,
            }
        })
        .collect()
}

fn bench_open_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("pathfinder_open_grid");

    for side in [10i64, 30, 50] {
        let (locations, paths) = grid(side);
        let graph = build_graph(&paths);
        let target = LocationId(side * side - 1);
        group.bench_with_input(BenchmarkId::from_parameter(side * side), &side, |b, _| {
            b.iter(|| {
                black_box(shortest_path(
                    &graph,
                    &[],
                    &locations,
                    black_box(LocationId(0)),
                    black_box(target),
                ))
            });
        });
    }

    group.finish();
}

fn bench_walled_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("pathfinder_walled_grid");

    for side in [10i64, 30] {
        let (locations, paths) = grid(side);
        let graph = build_graph(&paths);
        let walls = baffles(side);
        let target = LocationId(side * side - 1);
        group.bench_with_input(BenchmarkId::from_parameter(side * side), &side, |b, _| {
            b.iter(|| {
                black_box(shortest_path(
                    &graph,
                    &walls,
                    &locations,
                    black_box(LocationId(0)),
                    black_box(target),
                ))
            });
        });
    }

    group.finish();
}

fn bench_graph_build(c: &mut Criterion) {
    let (_, paths) = grid(50);
    c.bench_function("build_graph_2500", |b| {
        b.iter(|| black_box(build_graph(black_box(&paths))))
    });
}

fn bench_congestion_refresh(c: &mut Criterion) {
    let (_, paths) = grid(30);
    let checkpoints: CheckpointSet = (0..30i64).collect();
    let mut source = RandomCongestion::new(7);

    c.bench_function("congestion_refresh_900", |b| {
        b.iter(|| {
            let updated = set_random_congestion(paths.clone(), &mut source);
            black_box(aggregate_congestion(checkpoints.select(&updated)))
        })
    });
}

criterion_group!(
    benches,
    bench_open_grid,
    bench_walled_grid,
    bench_graph_build,
    bench_congestion_refresh
);
criterion_main!(benches);

//! Benchmark the bucket search against the reference A*.

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use dialgrid_core::{BitGrid, GridBackend, GridMap, Point};
use dialgrid_paths::{AstarSearch, OctilePather, Search, TreeQueue};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

/// Random map with the given obstacle density plus a fixed query list.
fn scenario(size: u32, density: f64) -> (GridMap, Vec<(Point, Point)>) {
    let mut rng = StdRng::seed_from_u64(size as u64);
    let mut map = GridMap::open(size, size);
    for p in map.range() {
        if rng.random_bool(density) {
            map.set(p, false);
        }
    }
    let mut open = || loop {
        let p = Point::new(
            rng.random_range(0..size as i32),
            rng.random_range(0..size as i32),
        );
        if map.get(p) {
            return p;
        }
    };
    let queries = (0..32).map(|_| (open(), open())).collect();
    (map, queries)
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("octile_queries");
    for size in [64u32, 256] {
        let (map, queries) = scenario(size, 0.2);
        let grid: Arc<BitGrid> = Arc::new(map.to_grid().unwrap());

        group.bench_with_input(BenchmarkId::new("bucket_heap", size), &queries, |b, qs| {
            let mut search: Search = Search::new(grid.clone());
            b.iter(|| {
                for &(s, g) in qs {
                    black_box(search.find_path(black_box(s), black_box(g)));
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("bucket_tree", size), &queries, |b, qs| {
            let mut search: Search<BitGrid, TreeQueue> = Search::new(grid.clone());
            b.iter(|| {
                for &(s, g) in qs {
                    black_box(search.find_path(black_box(s), black_box(g)));
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("reference_astar", size), &queries, |b, qs| {
            let pather = OctilePather::new(grid.as_ref());
            let mut astar = AstarSearch::new(grid.range());
            b.iter(|| {
                for &(s, g) in qs {
                    black_box(astar.path(&pather, black_box(s), black_box(g)));
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_queries);
criterion_main!(benches);

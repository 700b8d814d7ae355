//! Bucket search against the reference A* on seeded random grids.

use std::sync::Arc;

use dialgrid_core::{BitGrid, ByteGrid, GridBackend, GridMap, Point};
use dialgrid_paths::{
    AstarSearch, HeapQueue, OctilePather, Search, TreeQueue, path_length, validate_path,
};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

fn random_map(rng: &mut StdRng, width: u32, height: u32, density: f64) -> GridMap {
    let mut map = GridMap::open(width, height);
    for p in map.range() {
        if rng.random_bool(density) {
            map.set(p, false);
        }
    }
    map
}

fn random_open(rng: &mut StdRng, map: &GridMap) -> Point {
    loop {
        let p = Point::new(
            rng.random_range(0..map.width() as i32),
            rng.random_range(0..map.height() as i32),
        );
        if map.get(p) {
            return p;
        }
    }
}

fn is_single_step(a: Point, b: Point) -> bool {
    let d = (b - a).abs();
    d.x <= 1 && d.y <= 1 && d != Point::ZERO
}

#[test]
fn matches_reference_astar() {
    env_logger::try_init().ok();
    let mut rng = StdRng::seed_from_u64(7);
    for round in 0..12 {
        let map = random_map(&mut rng, 40, 30, 0.1 + 0.03 * round as f64);
        let grid: Arc<BitGrid> = Arc::new(map.to_grid().unwrap());
        let mut search: Search = Search::new(grid.clone());
        let pather = OctilePather::new(grid.as_ref());
        let mut astar = AstarSearch::new(grid.range());
        for _ in 0..40 {
            let from = random_open(&mut rng, &map);
            let to = random_open(&mut rng, &map);
            let path = search.find_path(from, to);
            let reference = astar.path(&pather, from, to);
            match reference {
                None => assert!(path.is_empty(), "round {round}: {from} -> {to} should fail"),
                Some(_) if from == to => assert!(path.is_empty()),
                Some(r) => {
                    assert!(!path.is_empty(), "round {round}: {from} -> {to} missed");
                    let (got, want) = (path_length(&path), path_length(&r));
                    assert!((got - want).abs() < 1e-6, "round {round}: {from} -> {to}: {got} vs {want}");
                    assert_eq!(path.first(), Some(&from));
                    assert_eq!(path.last(), Some(&to));
                }
            }
        }
    }
}

#[test]
fn paths_are_valid_single_steps() {
    let mut rng = StdRng::seed_from_u64(11);
    let map = random_map(&mut rng, 64, 64, 0.3);
    let grid: Arc<BitGrid> = Arc::new(map.to_grid().unwrap());
    let mut search: Search = Search::new(grid.clone());
    for _ in 0..200 {
        let from = random_open(&mut rng, &map);
        let to = random_open(&mut rng, &map);
        let path = search.find_path(from, to);
        assert_eq!(validate_path(grid.as_ref(), &path), Ok(()), "{from} -> {to}");
        assert!(path.windows(2).all(|w| is_single_step(w[0], w[1])));
        for p in &path {
            assert!(search.node(*p).is_some_and(|n| n.is_live(search.search_id())));
        }
    }
}

#[test]
fn deterministic_across_drivers() {
    let mut rng = StdRng::seed_from_u64(3);
    let map = random_map(&mut rng, 50, 50, 0.25);
    let grid: Arc<BitGrid> = Arc::new(map.to_grid().unwrap());
    let mut a: Search = Search::new(grid.clone());
    let mut b: Search = Search::new(grid);
    let queries: Vec<(Point, Point)> = (0..100)
        .map(|_| (random_open(&mut rng, &map), random_open(&mut rng, &map)))
        .collect();
    let first: Vec<Vec<Point>> = queries.iter().map(|&(s, g)| a.find_path(s, g)).collect();
    // Same driver again, and a fresh driver in reverse order.
    for (q, expected) in queries.iter().zip(&first) {
        assert_eq!(&a.find_path(q.0, q.1), expected);
    }
    for (q, expected) in queries.iter().zip(&first).rev() {
        assert_eq!(&b.find_path(q.0, q.1), expected);
    }
}

#[test]
fn queues_and_backends_agree() {
    let mut rng = StdRng::seed_from_u64(99);
    let map = random_map(&mut rng, 70, 45, 0.2);
    let mut heap: Search<BitGrid, HeapQueue> = Search::new(Arc::new(map.to_grid().unwrap()));
    let mut tree: Search<BitGrid, TreeQueue> = Search::new(Arc::new(map.to_grid().unwrap()));
    let mut bytes: Search<ByteGrid, TreeQueue> = Search::new(Arc::new(map.to_grid().unwrap()));
    for _ in 0..150 {
        let from = random_open(&mut rng, &map);
        let to = random_open(&mut rng, &map);
        let h = heap.find_path(from, to);
        let t = tree.find_path(from, to);
        let b = bytes.find_path(from, to);
        assert_eq!(h.is_empty(), t.is_empty());
        assert_eq!(h.is_empty(), b.is_empty());
        assert!((path_length(&h) - path_length(&t)).abs() < 1e-6);
        assert!((path_length(&h) - path_length(&b)).abs() < 1e-6);
    }
}

#[test]
fn maze_corridors() {
    // Serpentine corridor: the only route walks every row.
    let rows = [
        "S........",
        "########.",
        ".........",
        ".########",
        "........G",
    ];
    let map = GridMap::from_rows(&rows).unwrap();
    let mut search: Search = Search::new(Arc::new(map.to_grid().unwrap()));
    let path = search.find_path(Point::new(0, 0), Point::new(8, 4));
    assert_eq!(validate_path(search.grid().as_ref(), &path), Ok(()));
    assert_eq!(path.first(), Some(&Point::new(0, 0)));
    assert_eq!(path.last(), Some(&Point::new(8, 4)));
    let pather = OctilePather::new(search.grid().as_ref());
    let mut astar = AstarSearch::new(search.grid().range());
    let reference = astar.path(&pather, Point::new(0, 0), Point::new(8, 4)).unwrap();
    assert!((path_length(&path) - path_length(&reference)).abs() < 1e-9);
    assert!(search.stats().buckets > 0);
}

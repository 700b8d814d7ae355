//! Scenario runner.
//!
//! Each query is timed, written as one CSV row and sanity-checked: waypoints
//! outside the grid and segments that are not cardinal or ordinal are logged
//! as warnings. In check mode the path is also validated against the grid and
//! echoed as a single line:
//!
//! ```text
//! sx sy gx gy valid|invalid-N size x0 y0 x1 y1 ... length
//! ```

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;

use dialgrid_core::{GridBackend, Point};
use dialgrid_paths::{
    AstarSearch, BucketQueue, OctilePather, Search, SearchStats, path_length, validate_path,
};
use serde::{Deserialize, Serialize};

use crate::scenario::Experiment;

pub const CSV_HEADER: &str =
    "map,scen,experiment_id,path_size,path_length,ref_length,time_cost,20steps_cost,max_step_time";

/// Allowed disagreement between two path lengths.
const LENGTH_EPSILON: f64 = 1e-6;

/// Anything that answers shortest-path queries. An empty path means no path.
pub trait Planner {
    fn plan(&mut self, start: Point, goal: Point) -> Vec<Point>;

    /// Counters for the last call to [`plan`](Self::plan).
    fn stats(&self) -> SearchStats {
        SearchStats::default()
    }
}

impl<G: GridBackend, Q: BucketQueue> Planner for Search<G, Q> {
    fn plan(&mut self, start: Point, goal: Point) -> Vec<Point> {
        self.find_path(start, goal)
    }

    fn stats(&self) -> SearchStats {
        Search::stats(self)
    }
}

/// The reference A* behind the [`Planner`] interface, returning empty paths
/// for trivial queries like the bucket search does.
#[derive(Debug)]
pub struct ReferencePlanner<G> {
    grid: Arc<G>,
    astar: AstarSearch,
}

impl<G: GridBackend> ReferencePlanner<G> {
    pub fn new(grid: Arc<G>) -> Self {
        let astar = AstarSearch::new(grid.range());
        Self { grid, astar }
    }
}

impl<G: GridBackend> Planner for ReferencePlanner<G> {
    fn plan(&mut self, start: Point, goal: Point) -> Vec<Point> {
        let pather = OctilePather::new(self.grid.as_ref());
        match self.astar.path(&pather, start, goal) {
            Some(path) if path.len() > 1 => path,
            _ => Vec::new(),
        }
    }

    fn stats(&self) -> SearchStats {
        SearchStats {
            expanded: self.astar.expanded(),
            ..SearchStats::default()
        }
    }
}

/// Totals over one scenario run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub map: String,
    pub scenario: String,
    pub experiments: usize,
    /// Queries answered with a path, plus trivial ones.
    pub solved: usize,
    /// Queries skipped because an endpoint lies outside the grid.
    pub skipped: usize,
    /// Paths rejected by the validator (check mode only).
    pub invalid: usize,
    /// Queries whose length disagreed with the reference A*.
    pub reference_mismatches: usize,
    pub total_length: f64,
    pub total_time_secs: f64,
    pub max_time_secs: f64,
    pub stats: SearchStats,
}

/// Runs scenario queries against one grid.
#[derive(Debug)]
pub struct Runner<G: GridBackend> {
    grid: Arc<G>,
    map_name: String,
    scen_name: String,
    check: bool,
    reference: Option<ReferencePlanner<G>>,
}

impl<G: GridBackend> Runner<G> {
    /// `map_name` and `scen_name` fill the first two CSV columns.
    pub fn new(grid: Arc<G>, map_name: impl Into<String>, scen_name: impl Into<String>) -> Self {
        Self {
            grid,
            map_name: map_name.into(),
            scen_name: scen_name.into(),
            check: false,
            reference: None,
        }
    }

    /// Validate every path and write one check line per query.
    pub fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    /// Re-run every query on the reference A* and compare lengths.
    pub fn with_reference(mut self, reference: bool) -> Self {
        self.reference = reference.then(|| ReferencePlanner::new(self.grid.clone()));
        self
    }

    /// Run `experiments` through `planner`, writing the CSV (header first)
    /// to `csv` and check lines to `checks`.
    pub fn run<P, W, C>(
        &mut self,
        planner: &mut P,
        experiments: &[Experiment],
        csv: &mut W,
        checks: &mut C,
    ) -> io::Result<Summary>
    where
        P: Planner + ?Sized,
        W: Write,
        C: Write,
    {
        let mut summary = Summary {
            map: self.map_name.clone(),
            scenario: self.scen_name.clone(),
            experiments: experiments.len(),
            ..Summary::default()
        };
        writeln!(csv, "{CSV_HEADER}")?;
        let range = self.grid.range();

        for (id, e) in experiments.iter().enumerate() {
            if !(range.contains(e.start) && range.contains(e.goal)) {
                log::warn!(
                    "scenario {} query {}: endpoint outside {}, skipped",
                    self.scen_name,
                    id,
                    range
                );
                summary.skipped += 1;
                continue;
            }
            let path = self.timed(planner, e, id, csv, &mut summary)?;
            self.report_bounds(id, &path);
            if let Some(reference) = self.reference.as_mut() {
                let expected = path_length(&reference.plan(e.start, e.goal));
                let got = path_length(&path);
                if (expected - got).abs() > LENGTH_EPSILON {
                    log::warn!(
                        "query {}: {} -> {} has length {:.6}, reference {:.6}",
                        id,
                        e.start,
                        e.goal,
                        got,
                        expected
                    );
                    summary.reference_mismatches += 1;
                }
            }
            if self.check {
                let valid = self.write_check(checks, e, &path)?;
                summary.invalid += usize::from(!valid);
            }
        }
        log::info!(
            "{}: {} of {} queries solved, {:.6}s total",
            self.scen_name,
            summary.solved,
            summary.experiments,
            summary.total_time_secs
        );
        Ok(summary)
    }

    /// Plan one query and write its CSV row.
    fn timed<P, W>(
        &self,
        planner: &mut P,
        e: &Experiment,
        id: usize,
        csv: &mut W,
        summary: &mut Summary,
    ) -> io::Result<Vec<Point>>
    where
        P: Planner + ?Sized,
        W: Write,
    {
        // Planners return the whole path in one call, so the total time, the
        // time to the first 20 units of path and the longest single call are
        // the same measurement.
        let t0 = Instant::now();
        let path = planner.plan(e.start, e.goal);
        let elapsed = t0.elapsed();
        let length = path_length(&path);

        writeln!(
            csv,
            "{},{},{},{},{:.9},{:.9},{:.9},{:.9},{:.9}",
            self.map_name,
            self.scen_name,
            id,
            path.len(),
            length,
            e.distance,
            elapsed.as_secs_f64(),
            elapsed.as_secs_f64(),
            elapsed.as_secs_f64()
        )?;

        let stats = planner.stats();
        summary.stats.expanded += stats.expanded;
        summary.stats.generated += stats.generated;
        summary.stats.buckets += stats.buckets;
        summary.solved += usize::from(!path.is_empty() || e.start == e.goal);
        summary.total_length += length;
        summary.total_time_secs += elapsed.as_secs_f64();
        summary.max_time_secs = summary.max_time_secs.max(elapsed.as_secs_f64());
        log::trace!(
            "query {}: {} waypoints, length {:.5}, {:?}",
            id,
            path.len(),
            length,
            stats
        );
        Ok(path)
    }

    fn report_bounds(&self, id: usize, path: &[Point]) {
        let range = self.grid.range();
        for (i, p) in path.iter().enumerate() {
            if !range.contains(*p) {
                log::warn!("query {id} point {i} out of bounds {p}");
            }
        }
        for (i, w) in path.windows(2).enumerate() {
            if !(w[1] - w[0]).is_octile() {
                log::warn!(
                    "query {id} segment {i} must be cardinal or ordinal: {} - {}",
                    w[0],
                    w[1]
                );
            }
        }
    }

    /// Write the check line for one query; returns whether the path is valid.
    fn write_check<C: Write>(&self, out: &mut C, e: &Experiment, path: &[Point]) -> io::Result<bool> {
        let result = validate_path(self.grid.as_ref(), path);
        write!(out, "{} {} {} {}", e.start.x, e.start.y, e.goal.x, e.goal.y)?;
        match result {
            Ok(()) => write!(out, " valid")?,
            Err(err) => {
                log::warn!("query {} -> {}: {}", e.start, e.goal, err);
                write!(out, " invalid-{}", err.index())?;
            }
        }
        write!(out, " {}", path.len())?;
        for p in path {
            write!(out, " {} {}", p.x, p.y)?;
        }
        writeln!(out, " {:.5}", path_length(path))?;
        Ok(result.is_ok())
    }
}

#[cfg(test)]
mod tests {
    use dialgrid_core::{BitGrid, GridMap};
    use dialgrid_paths::HeapQueue;

    use super::*;

    fn grid() -> Arc<BitGrid> {
        let map = GridMap::from_rows(&["....", ".##.", "....", "#..."]).unwrap();
        Arc::new(map.to_grid().unwrap())
    }

    fn query(start: (i32, i32), goal: (i32, i32), distance: f64) -> Experiment {
        Experiment {
            bucket: 0,
            map: "test.map".to_string(),
            map_size: Some((4, 4)),
            start: start.into(),
            goal: goal.into(),
            distance,
        }
    }

    /// Answers every query with a fixed path.
    struct Fixed(Vec<Point>);

    impl Planner for Fixed {
        fn plan(&mut self, _: Point, _: Point) -> Vec<Point> {
            self.0.clone()
        }
    }

    #[test]
    fn writes_one_row_per_query() {
        let g = grid();
        let mut search: Search<BitGrid, HeapQueue> = Search::new(g.clone());
        let mut runner = Runner::new(g, "test.map", "test.scen").with_reference(true);
        let queries = [
            query((0, 0), (3, 0), 3.0),
            // Both diagonals out of (0, 2) and into (3, 0) cut a blocked corner.
            query((0, 2), (3, 0), 5.0),
            query((2, 3), (2, 3), 0.0),
        ];
        let (mut csv, mut checks) = (Vec::new(), Vec::new());
        let summary = runner.run(&mut search, &queries, &mut csv, &mut checks).unwrap();

        let csv = String::from_utf8(csv).unwrap();
        let rows: Vec<&str> = csv.lines().collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], CSV_HEADER);
        let cols: Vec<&str> = rows[1].split(',').collect();
        assert_eq!(cols.len(), 9);
        assert_eq!(&cols[..4], &["test.map", "test.scen", "0", "4"]);
        assert_eq!(cols[4], "3.000000000");
        assert!(rows[3].starts_with("test.map,test.scen,2,0,0.000000000,"));
        assert!(checks.is_empty());

        assert_eq!(summary.experiments, 3);
        assert_eq!(summary.solved, 3);
        assert_eq!(summary.reference_mismatches, 0);
        assert!((summary.total_length - 8.0).abs() < 1e-9);
        assert!(summary.stats.expanded > 0);
    }

    #[test]
    fn check_lines_report_validity() {
        let g = grid();
        let mut runner = Runner::new(g.clone(), "m", "s").with_check(true);
        let queries = [query((0, 0), (2, 0), 2.0)];
        let mut good = Fixed(vec![Point::new(0, 0), Point::new(1, 0), Point::new(2, 0)]);
        let mut out = Vec::new();
        let summary = runner.run(&mut good, &queries, &mut io::sink(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0 0 2 0 valid 3 0 0 1 0 2 0 2.00000\n");
        assert_eq!(summary.invalid, 0);

        // Cuts through the blocked (1, 1).
        let mut bad = Fixed(vec![Point::new(0, 0), Point::new(1, 1), Point::new(2, 0)]);
        let mut out = Vec::new();
        let summary = runner.run(&mut bad, &queries, &mut io::sink(), &mut out).unwrap();
        let line = String::from_utf8(out).unwrap();
        assert!(line.starts_with("0 0 2 0 invalid-1 3 "), "{line}");
        assert_eq!(summary.invalid, 1);
    }

    #[test]
    fn reference_mismatch_is_counted() {
        let g = grid();
        let mut runner = Runner::new(g, "m", "s").with_reference(true);
        // Steps back once before reaching the goal.
        let mut detour = Fixed(vec![
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(2, 0),
        ]);
        let queries = [query((0, 0), (2, 0), 2.0)];
        let summary = runner.run(&mut detour, &queries, &mut io::sink(), &mut io::sink()).unwrap();
        assert_eq!(summary.reference_mismatches, 1);
    }

    #[test]
    fn outside_endpoints_are_skipped() {
        let g = grid();
        let mut search: Search = Search::new(g.clone());
        let mut runner = Runner::new(g, "m", "s");
        let queries = [query((0, 0), (9, 9), 0.0), query((0, 0), (0, 2), 2.0)];
        let mut csv = Vec::new();
        let summary = runner.run(&mut search, &queries, &mut csv, &mut io::sink()).unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.solved, 1);
        assert_eq!(String::from_utf8(csv).unwrap().lines().count(), 2);
    }
}

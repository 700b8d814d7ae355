//! Path validation against a grid.
//!
//! A valid path has every waypoint on an open cell, and every segment runs
//! along one of the eight octile directions without crossing a blocked cell
//! or squeezing diagonally between two blocked corners. Segments may span
//! several cells.

use dialgrid_core::{GridBackend, Point};
use thiserror::Error;

/// Why a path failed validation. Waypoints are checked before segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidPath {
    #[error("waypoint {index} at {point} is not traversable")]
    BlockedWaypoint { index: usize, point: Point },
    #[error("segment {index} from {from} to {to} is not a cardinal or ordinal line")]
    NotOctile { index: usize, from: Point, to: Point },
    #[error("segment {index} from {from} to {to} crosses a blocked cell")]
    BlockedSegment { index: usize, from: Point, to: Point },
}

impl InvalidPath {
    /// Index of the offending waypoint, or of the first waypoint of the
    /// offending segment.
    pub fn index(&self) -> usize {
        match *self {
            InvalidPath::BlockedWaypoint { index, .. }
            | InvalidPath::NotOctile { index, .. }
            | InvalidPath::BlockedSegment { index, .. } => index,
        }
    }
}

/// Check `path` against `grid`. Empty and single-point paths are valid
/// whenever their waypoints are.
pub fn validate_path<G: GridBackend + ?Sized>(grid: &G, path: &[Point]) -> Result<(), InvalidPath> {
    if let Some((index, &point)) = path.iter().enumerate().find(|(_, p)| !grid.traversable(**p)) {
        return Err(InvalidPath::BlockedWaypoint { index, point });
    }
    for (index, w) in path.windows(2).enumerate() {
        let (from, to) = (w[0], w[1]);
        let d = to - from;
        if !d.is_octile() {
            return Err(InvalidPath::NotOctile { index, from, to });
        }
        if !segment_clear(grid, from, to) {
            return Err(InvalidPath::BlockedSegment { index, from, to });
        }
    }
    Ok(())
}

fn segment_clear<G: GridBackend + ?Sized>(grid: &G, from: Point, to: Point) -> bool {
    let step = (to - from).signum();
    let open = |p: Point| grid.traversable(p);
    let mut p = from;
    while p != to {
        if !open(p) {
            return false;
        }
        if step.x != 0 && step.y != 0 && !(open(p.shift(step.x, 0)) && open(p.shift(0, step.y))) {
            return false;
        }
        p = p + step;
    }
    open(to)
}

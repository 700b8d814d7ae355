use dialgrid_core::Point;

use crate::distance::Dist;

/// Successor enumeration for a graph over grid cells.
pub trait Pather {
    /// Push the successors of `p` onto `out`, which arrives empty.
    fn neighbors(&self, p: Point, out: &mut Vec<Point>);
}

/// Adds positive edge weights in fixed-point units.
pub trait WeightedPather: Pather {
    fn cost(&self, from: Point, to: Point) -> Dist;
}

/// Adds a heuristic that never overestimates the remaining cost.
pub trait AstarPather: WeightedPather {
    fn estimate(&self, from: Point, to: Point) -> Dist;
}
